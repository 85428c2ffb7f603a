use std::sync::Arc;
use std::time::Instant;

use arboard::Clipboard;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::action::Action;
use crate::chat::{self, ChatReply, ChatWidget};
use crate::command::{filtered_commands, CommandParser};
use crate::config::Config;
use crate::content::{listed_tags, ProjectCategory, PROFILE, SKILLS};
use crate::error::RelayError;
use crate::gemini::Completer;
use crate::mail::{self, ContactForm, Field, FormStatus, Relay};
use crate::router::{Router, View};
use crate::scene::network::{NetworkOptions, NeuralNetwork};
use crate::scene::particles::ParticleField;
use crate::scene::starfield::StarField;
use crate::scene::{FrameLoop, Pointer, Renderer, Viewport};
use crate::theme::ThemeController;
use crate::ui::{self, Regions};
use crate::ui_state::{Focus, UIState};

/// Number of filter chips on the projects view: "All" plus each category.
pub const FILTER_CHIPS: usize = ProjectCategory::ALL.len() + 1;

/// Live background renderers. A slot is `Some` exactly while its view is
/// mounted.
#[derive(Default)]
pub struct Scenes {
    pub stars: Option<FrameLoop<StarField>>,
    pub hero: Option<FrameLoop<NeuralNetwork>>,
    pub about: Option<FrameLoop<NeuralNetwork>>,
    pub field: Option<FrameLoop<ParticleField>>,
}

impl Scenes {
    pub fn live(&self) -> usize {
        [
            self.stars.is_some(),
            self.hero.is_some(),
            self.about.is_some(),
            self.field.is_some(),
        ]
        .iter()
        .filter(|live| **live)
        .count()
    }
}

fn set_mounted<R: Renderer>(
    slot: &mut Option<FrameLoop<R>>,
    wanted: bool,
    now: Instant,
    make: impl FnOnce() -> R,
) {
    if wanted && slot.is_none() {
        *slot = Some(FrameLoop::mount(make(), now));
    } else if !wanted {
        if let Some(mut frame_loop) = slot.take() {
            frame_loop.cancel();
            debug!(frames = frame_loop.frames(), "scene cancelled");
        }
    }
}

/// Screen regions each scene paints into.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneAreas {
    pub hero: Rect,
    pub about: Rect,
    pub field: Rect,
}

pub struct App {
    pub config: Config,
    pub router: Router,
    pub theme: ThemeController,
    pub chat: ChatWidget,
    pub contact: ContactForm,
    /// Active project filter, shared by the home matrix and the archive.
    pub filter: Option<String>,
    pub ui: UIState,
    pub scenes: Scenes,
    pub pointer: Pointer,
    pub size: Rect,
    pub now: Instant,
    pub animation_tick: u64,
    pub should_quit: bool,
    completer: Arc<dyn Completer>,
    relay: Arc<dyn Relay>,
    chat_tx: UnboundedSender<ChatReply>,
    chat_rx: UnboundedReceiver<ChatReply>,
    mail_tx: UnboundedSender<Result<(), RelayError>>,
    mail_rx: UnboundedReceiver<Result<(), RelayError>>,
}

impl App {
    pub fn new(
        config: Config,
        router: Router,
        theme: ThemeController,
        completer: Arc<dyn Completer>,
        relay: Arc<dyn Relay>,
        size: Rect,
        now: Instant,
    ) -> Self {
        let (chat_tx, chat_rx) = unbounded_channel();
        let (mail_tx, mail_rx) = unbounded_channel();
        let mut app = Self {
            config,
            router,
            theme,
            chat: ChatWidget::new(),
            contact: ContactForm::new(),
            filter: None,
            ui: UIState::new(),
            scenes: Scenes::default(),
            pointer: Pointer::default(),
            size,
            now,
            animation_tick: 0,
            should_quit: false,
            completer,
            relay,
            chat_tx,
            chat_rx,
            mail_tx,
            mail_rx,
        };
        app.sync_scenes(now);
        app
    }

    pub fn regions(&self) -> Regions {
        ui::regions(self.size, self.chat.open, self.config.chat_width)
    }

    pub fn scene_areas(&self) -> SceneAreas {
        let main = self.regions().main;
        SceneAreas {
            hero: ui::hero_area(main, self.config.hero_height),
            about: ui::about_scene_area(main),
            field: main,
        }
    }

    /// View shown once any pending transition lands.
    fn destination(&self) -> View {
        self.router.target().unwrap_or(self.router.active_view())
    }

    /// Mount the renderers the active view needs and cancel the rest.
    fn sync_scenes(&mut self, now: Instant) {
        let view = self.router.active_view();
        let areas = self.scene_areas();
        let density = self.config.hero_density;
        let home = view == View::Home;

        set_mounted(&mut self.scenes.stars, home, now, || {
            StarField::new(Viewport::for_area(areas.hero))
        });
        set_mounted(&mut self.scenes.hero, home, now, || {
            NeuralNetwork::new(
                NetworkOptions {
                    density,
                    ..Default::default()
                },
                Viewport::for_area(areas.hero),
            )
        });
        set_mounted(&mut self.scenes.about, view == View::About, now, || {
            NeuralNetwork::new(NetworkOptions::default(), Viewport::for_area(areas.about))
        });
        set_mounted(&mut self.scenes.field, !home, now, || {
            ParticleField::new(Viewport::for_area(areas.field))
        });
        self.pointer.leave();
        debug!(?view, live = self.scenes.live(), "scenes synced");
    }

    /// Push current region sizes into every mounted renderer.
    fn relayout(&mut self) {
        let areas = self.scene_areas();
        if let Some(l) = self.scenes.stars.as_mut() {
            l.resize(Viewport::for_area(areas.hero));
        }
        if let Some(l) = self.scenes.hero.as_mut() {
            l.resize(Viewport::for_area(areas.hero));
        }
        if let Some(l) = self.scenes.about.as_mut() {
            l.resize(Viewport::for_area(areas.about));
        }
        if let Some(l) = self.scenes.field.as_mut() {
            l.resize(Viewport::for_area(areas.field));
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.size = Rect::new(0, 0, width, height);
        self.relayout();
    }

    /// One frame: land due transitions, collect async results, step scenes.
    pub fn tick(&mut self, now: Instant) {
        self.now = now;
        self.animation_tick = self.animation_tick.wrapping_add(1);

        if let Some(view) = self.router.tick(now) {
            self.ui.content_scroll = 0;
            self.ui.selection = 0;
            if self.ui.focus == Focus::Contact && view != View::Contact {
                self.ui.focus = Focus::Content;
            }
            self.sync_scenes(now);
        }

        while let Ok(reply) = self.chat_rx.try_recv() {
            self.chat.resolve(reply);
        }
        while let Ok(outcome) = self.mail_rx.try_recv() {
            match self.contact.finish(outcome) {
                Some(alert) => self.ui.alert = Some(alert.to_string()),
                None => self.ui.set_status("Message sent"),
            }
        }

        let theme = self.theme.theme();
        let pointer = self.pointer;
        if let Some(l) = self.scenes.stars.as_mut() {
            l.frame(now, theme, pointer);
        }
        if let Some(l) = self.scenes.hero.as_mut() {
            l.frame(now, theme, pointer);
        }
        if let Some(l) = self.scenes.about.as_mut() {
            l.frame(now, theme, pointer);
        }
        if let Some(l) = self.scenes.field.as_mut() {
            l.frame(now, theme, pointer);
        }

        self.ui.age_status(self.config.status_timeout_ticks);
    }

    pub fn navigate(&mut self, view: View, now: Instant) {
        self.router.go(view, now);
    }

    /// Select a project filter and head to the archive.
    pub fn select_filter(&mut self, filter: &str, now: Instant) {
        info!(filter, "project filter selected");
        self.filter = Some(filter.to_string());
        self.router.go(View::Projects, now);
    }

    /// Clear the filter without navigating.
    pub fn reset_filter(&mut self) {
        self.filter = None;
    }

    pub fn apply_action(&mut self, action: Action, now: Instant) {
        match action {
            Action::Help => self.ui.show_help = true,
            Action::Goto(view) => self.navigate(view, now),
            Action::ToggleTheme => self.theme.toggle(),
            Action::Filter(Some(tag)) => self.select_filter(&tag, now),
            Action::Filter(None) => self.reset_filter(),
            Action::Quit => self.should_quit = true,
        }
    }

    pub fn open_chat(&mut self) {
        if !self.chat.open {
            self.toggle_chat();
        }
        self.ui.focus = Focus::Chat;
    }

    pub fn close_chat(&mut self) {
        if self.chat.open {
            self.toggle_chat();
        }
    }

    /// Show or hide the chat panel and resize the scenes around it.
    pub fn toggle_chat(&mut self) {
        self.chat.toggle();
        if self.chat.open {
            self.ui.focus = Focus::Chat;
        } else {
            self.ui.focus = Focus::Content;
            self.ui.command_selection = None;
        }
        self.relayout();
    }

    /// Put the WhatsApp link on the clipboard, or at least on screen.
    fn share_whatsapp(&mut self) {
        let url = PROFILE.whatsapp.chat_url();
        let copied = Clipboard::new()
            .and_then(|mut clipboard| clipboard.set_text(url.clone()))
            .is_ok();
        if copied {
            self.ui.set_status(format!("Copied WhatsApp link: {}", url));
        } else {
            self.ui.set_status(format!("WhatsApp: {}", url));
        }
    }

    pub fn showing_command_popup(&self) -> bool {
        !filtered_commands(&self.chat.input).is_empty()
    }

    /// Send the chat input: slash commands run locally, anything else goes
    /// to the completer.
    pub fn submit_chat(&mut self, now: Instant) {
        if CommandParser::is_command(&self.chat.input) {
            let input = std::mem::take(&mut self.chat.input);
            match CommandParser::parse(&input) {
                Ok(action) => self.apply_action(action, now),
                Err(msg) => self.ui.set_status(msg),
            }
            return;
        }
        // Empty input sends the highlighted example; blank input is a no-op.
        let request = if self.chat.input.is_empty() && self.chat.messages().is_empty() {
            self.chat.send_example()
        } else {
            self.chat.submit_input()
        };
        if let Some(request) = request {
            debug!(id = request.id, "chat request dispatched");
            chat::dispatch(self.completer.clone(), request, self.chat_tx.clone());
        }
    }

    pub fn submit_contact(&mut self) {
        match self.contact.submit() {
            Some(params) => {
                self.ui.set_status("Sending...");
                mail::dispatch(self.relay.clone(), params, self.mail_tx.clone());
            }
            None => {
                if let Some(field) = self.contact.missing() {
                    self.ui.set_status(format!("{} is required", field.label()));
                }
            }
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        match self.ui.focus {
            Focus::Chat => {
                let filtered: String = text
                    .chars()
                    .filter(|c| *c != '\r')
                    .map(|c| if c == '\n' { ' ' } else { c })
                    .collect();
                self.chat.input.push_str(&filtered);
                self.ui.command_selection = None;
            }
            Focus::Contact => self.contact.input_str(text),
            Focus::Content => {}
        }
    }

    fn paste_clipboard(&mut self) {
        if let Ok(mut clipboard) = Clipboard::new() {
            if let Ok(text) = clipboard.get_text() {
                self.handle_paste(&text);
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        // Overlays swallow the key that closes them.
        if self.ui.alert.take().is_some() {
            return;
        }
        if self.ui.show_help {
            self.ui.show_help = false;
            return;
        }

        match self.ui.focus {
            Focus::Content => self.handle_content_key(key, now),
            Focus::Chat => self.handle_chat_key(key, now),
            Focus::Contact => self.handle_contact_key(key),
        }
    }

    fn cycle_selection(&mut self, forward: bool) {
        let len = match self.router.active_view() {
            View::Home => SKILLS.len(),
            // Category chips, then every tag on the listed cards.
            View::Projects => FILTER_CHIPS + listed_tags(self.filter.as_deref()).len(),
            _ => return,
        };
        let current = self.ui.selection.min(len - 1);
        self.ui.selection = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
    }

    fn activate_selection(&mut self, now: Instant) {
        match self.router.active_view() {
            View::Home => {
                if let Some(skill) = SKILLS.get(self.ui.selection) {
                    self.select_filter(skill.filter, now);
                }
            }
            View::Projects => match self.ui.selection {
                0 => self.reset_filter(),
                i if i < FILTER_CHIPS => {
                    if let Some(category) = ProjectCategory::ALL.get(i - 1) {
                        self.select_filter(category.label(), now);
                    }
                }
                i => {
                    let tags = listed_tags(self.filter.as_deref());
                    if let Some(tag) = tags.get(i - FILTER_CHIPS) {
                        self.select_filter(tag, now);
                        self.ui.selection = 0;
                    }
                }
            },
            View::Contact => {
                if self.contact.status == FormStatus::Success {
                    self.contact.reset();
                }
                self.ui.focus = Focus::Contact;
            }
            _ => {}
        }
    }

    fn handle_content_key(&mut self, key: KeyEvent, now: Instant) {
        let step = self.config.scroll_step;
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Left | KeyCode::Char('h') => self.navigate(self.destination().prev(), now),
            KeyCode::Right | KeyCode::Char('l') => self.navigate(self.destination().next(), now),
            KeyCode::Char(c @ '1'..='6') => {
                let idx = c as usize - '1' as usize;
                self.navigate(View::ALL[idx], now);
            }
            KeyCode::Char('t') => self.theme.toggle(),
            KeyCode::Char('c') => self.toggle_chat(),
            KeyCode::Char('w') => self.share_whatsapp(),
            KeyCode::Char('/') => {
                self.open_chat();
                self.chat.input = "/".to_string();
            }
            KeyCode::Char('r') => self.reset_filter(),
            KeyCode::Char('i') if self.router.active_view() == View::Contact => {
                self.ui.focus = Focus::Contact;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.ui.content_scroll = self.ui.content_scroll.saturating_sub(step);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.ui.content_scroll = self.ui.content_scroll.saturating_add(step);
            }
            KeyCode::PageUp => {
                self.ui.content_scroll = self.ui.content_scroll.saturating_sub(step * 5);
            }
            KeyCode::PageDown => {
                self.ui.content_scroll = self.ui.content_scroll.saturating_add(step * 5);
            }
            KeyCode::Tab => self.cycle_selection(true),
            KeyCode::BackTab => self.cycle_selection(false),
            KeyCode::Enter => self.activate_selection(now),
            _ => {}
        }
    }

    fn apply_command_selection(&mut self) {
        if let Some(idx) = self.ui.command_selection.take() {
            if let Some((cmd, _)) = filtered_commands(&self.chat.input).get(idx) {
                self.chat.input = format!("{} ", cmd);
            }
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let popup = self.showing_command_popup();
        let idle = self.chat.input.is_empty() && self.chat.messages().is_empty();
        match key.code {
            KeyCode::Esc => {
                if self.ui.command_selection.is_some() {
                    self.ui.command_selection = None;
                } else {
                    self.ui.focus = Focus::Content;
                }
            }
            KeyCode::Enter | KeyCode::Tab if popup && self.ui.command_selection.is_some() => {
                self.apply_command_selection();
            }
            KeyCode::Enter => self.submit_chat(now),
            KeyCode::Tab => self.ui.focus = Focus::Content,
            KeyCode::Backspace => {
                self.chat.input.pop();
                self.ui.command_selection = None;
            }
            KeyCode::Char('v') if ctrl => self.paste_clipboard(),
            KeyCode::Char(c) if !ctrl => {
                self.chat.input.push(c);
                self.ui.command_selection = None;
            }
            KeyCode::Up if popup => {
                let len = filtered_commands(&self.chat.input).len();
                self.ui.command_selection = match self.ui.command_selection {
                    None => Some(len - 1),
                    Some(0) => None,
                    Some(n) => Some(n - 1),
                };
            }
            KeyCode::Down if popup => {
                let len = filtered_commands(&self.chat.input).len();
                self.ui.command_selection = match self.ui.command_selection {
                    None => Some(0),
                    Some(n) if n + 1 >= len => None,
                    Some(n) => Some(n + 1),
                };
            }
            KeyCode::Up if idle => self.chat.prev_example(),
            KeyCode::Down if idle => self.chat.next_example(),
            KeyCode::Up => self.chat.scroll_up(self.config.scroll_step),
            KeyCode::Down => self.chat.scroll_down(self.config.scroll_step),
            _ => {}
        }
    }

    fn handle_contact_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.ui.focus = Focus::Content,
            KeyCode::Enter if self.contact.status == FormStatus::Success => self.contact.reset(),
            KeyCode::Enter if self.contact.focus == Field::Message => self.submit_contact(),
            KeyCode::Enter | KeyCode::Tab | KeyCode::Down => self.contact.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.contact.prev_field(),
            KeyCode::Backspace => self.contact.backspace(),
            KeyCode::Char('s') if ctrl => self.submit_contact(),
            KeyCode::Char('v') if ctrl => self.paste_clipboard(),
            KeyCode::Char(c) if !ctrl => self.contact.input_char(c),
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let regions = self.regions();
        let inside = |area: Rect| {
            mouse.column >= area.x
                && mouse.column < area.x + area.width
                && mouse.row >= area.y
                && mouse.row < area.y + area.height
        };
        match mouse.kind {
            MouseEventKind::Moved => {
                let areas = self.scene_areas();
                let target = match self.router.active_view() {
                    View::Home => Some(areas.hero),
                    View::About => Some(areas.about),
                    _ => None,
                };
                match target {
                    Some(area) if inside(area) => self.pointer.track(mouse.column, mouse.row, area),
                    _ => self.pointer.leave(),
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(view) = ui::nav_hit(regions.nav, mouse.column, mouse.row) {
                    self.navigate(view, now);
                } else if regions.chat.is_some_and(inside) {
                    self.ui.focus = Focus::Chat;
                } else if inside(regions.main) {
                    self.ui.focus = if self.router.active_view() == View::Contact {
                        Focus::Contact
                    } else {
                        Focus::Content
                    };
                }
            }
            MouseEventKind::ScrollUp => {
                if regions.chat.is_some_and(inside) {
                    self.chat.scroll_up(self.config.scroll_step);
                } else {
                    self.ui.content_scroll = self.ui.content_scroll.saturating_sub(self.config.scroll_step);
                }
            }
            MouseEventKind::ScrollDown => {
                if regions.chat.is_some_and(inside) {
                    self.chat.scroll_down(self.config.scroll_step);
                } else {
                    self.ui.content_scroll = self.ui.content_scroll.saturating_add(self.config.scroll_step);
                }
            }
            _ => {}
        }
    }
}
