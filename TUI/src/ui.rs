use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::chat::Role;
use crate::command::filtered_commands;
use crate::config::COMMANDS;
use crate::app::FILTER_CHIPS;
use crate::content::{
    filter_projects, tag_description, Project, ProjectCategory, EXAMPLE_PROMPTS, EXPERIENCES, PROFILE,
    SERVICES, SKILLS,
};
use crate::mail::{Field, FormStatus};
use crate::router::View;
use crate::scene::canvas::render_layers;
use crate::scene::Layer;
use crate::theme::Palette;
use crate::ui_state::Focus;

const BRAND: &str = " SNEHAL.DEV ";
const NAV_GAP: &str = " ";
const SHUTTER_LABEL: &str = "Synchronizing";
/// Narrowest main area that still shares the row with the chat panel.
const MIN_MAIN_WIDTH: u16 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub nav: Rect,
    pub main: Rect,
    pub chat: Option<Rect>,
    pub footer: Rect,
}

pub fn regions(area: Rect, chat_open: bool, chat_width: u16) -> Regions {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Nav
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Footer
        ])
        .split(area);
    let body = rows[1];

    let (main, chat) = if !chat_open {
        (body, None)
    } else if body.width >= chat_width + MIN_MAIN_WIDTH {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(chat_width)])
            .split(body);
        (cols[0], Some(cols[1]))
    } else {
        // Too narrow to share: the chat takes the whole body.
        (Rect { width: 0, ..body }, Some(body))
    };

    Regions {
        nav: rows[0],
        main,
        chat,
        footer: rows[2],
    }
}

/// Top band of the home view that hosts the starfield and network.
pub fn hero_area(main: Rect, height: u16) -> Rect {
    Rect {
        height: height.min(main.height),
        ..main
    }
}

/// Right half of the about view.
pub fn about_scene_area(main: Rect) -> Rect {
    let left = main.width / 2;
    Rect {
        x: main.x + left,
        width: main.width - left,
        ..main
    }
}

fn nav_label(index: usize, view: View) -> String {
    format!(" {} {} ", index + 1, view.label())
}

/// Tab under a click in the nav bar.
pub fn nav_hit(nav: Rect, column: u16, row: u16) -> Option<View> {
    if row != nav.y + 1 {
        return None;
    }
    // Border plus one cell of padding, then the brand.
    let mut x = nav.x + 2 + BRAND.width() as u16 + NAV_GAP.width() as u16;
    for (i, view) in View::ALL.into_iter().enumerate() {
        let w = nav_label(i, view).width() as u16;
        if column >= x && column < x + w {
            return Some(view);
        }
        x += w + NAV_GAP.width() as u16;
    }
    None
}

/// Greedy word wrap measured in display columns.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for raw in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0;
        for word in raw.split_whitespace() {
            let w = word.width();
            if line_width > 0 && line_width + 1 + w > width {
                out.push(std::mem::take(&mut line));
                line_width = 0;
            }
            if line_width > 0 {
                line.push(' ');
                line_width += 1;
            }
            line.push_str(word);
            line_width += w;
        }
        out.push(line);
    }
    out
}

fn level_bar(level: u8, width: usize) -> String {
    let filled = (level as usize * width + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled.min(width)))
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Fill the whole frame with the palette background.
pub fn draw_backdrop(frame: &mut Frame, p: &Palette) {
    let bg = Block::default().style(Style::default().bg(p.background).fg(p.text));
    frame.render_widget(bg, frame.area());
}

pub fn draw(frame: &mut Frame, app: &App) {
    let p = app.theme.theme().palette();
    draw_backdrop(frame, &p);

    let regions = regions(frame.area(), app.chat.open, app.config.chat_width);

    draw_nav(frame, app, &p, regions.nav);
    draw_main(frame, app, &p, regions.main);
    if app.router.is_transitioning() {
        frame
            .buffer_mut()
            .set_style(regions.main, Style::default().add_modifier(Modifier::DIM));
        draw_shutter(frame, app, &p, regions.main);
    }
    if let Some(chat) = regions.chat {
        draw_chat(frame, app, &p, chat);
    }
    draw_footer(frame, app, &p, regions.footer);

    if app.ui.show_help {
        draw_help(frame, &p);
    }
    if let Some(alert) = &app.ui.alert {
        draw_alert(frame, &p, alert);
    }
}

fn draw_nav(frame: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(p.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let current = app.router.target().unwrap_or(app.router.active_view());
    let mut spans = vec![
        Span::raw(" "),
        Span::styled(BRAND, Style::default().fg(p.accent).add_modifier(Modifier::BOLD)),
        Span::raw(NAV_GAP),
    ];
    for (i, view) in View::ALL.into_iter().enumerate() {
        let style = if view == current {
            Style::default().fg(p.background).bg(p.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(p.text_secondary)
        };
        spans.push(Span::styled(nav_label(i, view), style));
        spans.push(Span::raw(NAV_GAP));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);

    let indicator = if app.theme.root().has_dark() { "◐ dark " } else { "◑ light " };
    frame.render_widget(
        Paragraph::new(Span::styled(indicator, Style::default().fg(p.text_muted)))
            .alignment(Alignment::Right),
        inner,
    );
}

fn draw_main(frame: &mut Frame, app: &App, p: &Palette, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let view = app.router.active_view();
    let canvas_bg = p.canvas_background;

    if let Some(field) = &app.scenes.field {
        render_layers(frame, area, canvas_bg, &[field as &dyn Layer]);
    }

    match view {
        View::Home => draw_home(frame, app, p, area),
        View::About => draw_about(frame, app, p, area),
        View::Services => draw_text_view(frame, app, area, services_lines(p)),
        View::Projects => draw_text_view(frame, app, area, projects_lines(app, p)),
        View::Journey => draw_text_view(frame, app, area, journey_lines(p)),
        View::Contact => draw_contact(frame, app, p, area),
    }
}

/// Scrollable text body with two cells of horizontal padding.
fn draw_text_view(frame: &mut Frame, app: &App, area: Rect, lines: Vec<Line<'static>>) {
    let padded = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: area.height.saturating_sub(1),
    };
    let scroll = app.ui.content_scroll.min(lines.len().saturating_sub(1)) as u16;
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).scroll((scroll, 0));
    frame.render_widget(paragraph, padded);
}

fn heading(text: &str, p: &Palette) -> Line<'static> {
    Line::from(Span::styled(
        text.to_uppercase(),
        Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
    ))
}

fn tag_spans(tags: &[&str], p: &Palette) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for tag in tags {
        spans.push(Span::styled(format!("[{}]", tag), Style::default().fg(p.accent_alt)));
        spans.push(Span::raw(" "));
    }
    spans
}

/// Highlight state for the tags on one project card.
#[derive(Default, Clone, Copy)]
struct TagMarks<'a> {
    /// Index into this card's tags of the keyboard selection.
    selected: Option<usize>,
    /// Active project filter; matching tags are drawn filled.
    filter: Option<&'a str>,
}

fn project_lines(project: &Project, p: &Palette, marks: TagMarks, lines: &mut Vec<Line<'static>>) {
    let mut title = vec![
        Span::styled("▸ ", Style::default().fg(p.accent)),
        Span::styled(project.title, Style::default().fg(p.text).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  {}", project.category.label()),
            Style::default().fg(p.text_muted),
        ),
    ];
    if project.link.is_some() {
        title.push(Span::styled("  ↗", Style::default().fg(p.text_muted)));
    }
    lines.push(Line::from(title));
    lines.push(Line::from(Span::styled(
        format!("  {}", project.description),
        Style::default().fg(p.text_secondary),
    )));
    let mut tags = vec![Span::raw("  ")];
    for (i, tag) in project.tags.iter().enumerate() {
        let active = marks.filter.is_some_and(|f| f.eq_ignore_ascii_case(tag));
        let mut style = if active {
            Style::default().fg(p.background).bg(p.accent_alt)
        } else {
            Style::default().fg(p.accent_alt)
        };
        if marks.selected == Some(i) {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        tags.push(Span::styled(format!("[{}]", tag), style));
        tags.push(Span::raw(" "));
    }
    lines.push(Line::from(tags));
    if let Some(tag) = marks.selected.and_then(|i| project.tags.get(i)) {
        lines.push(Line::from(Span::styled(
            format!("  {}: {}", tag, tag_description(tag)),
            Style::default().fg(p.text_secondary).add_modifier(Modifier::ITALIC),
        )));
    }
    lines.push(Line::from(""));
}

fn draw_home(frame: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let hero = hero_area(area, app.config.hero_height);
    let mut layers: Vec<&dyn Layer> = Vec::new();
    if let Some(stars) = &app.scenes.stars {
        layers.push(stars);
    }
    if let Some(network) = &app.scenes.hero {
        layers.push(network);
    }
    render_layers(frame, hero, p.canvas_background, &layers);

    let title = vec![
        Line::from(Span::styled(
            PROFILE.name.to_uppercase(),
            Style::default().fg(p.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(PROFILE.title, Style::default().fg(p.accent))),
        Line::from(Span::styled(PROFILE.tagline, Style::default().fg(p.text_secondary))),
    ];
    let title_area = centered(hero, hero.width, 3);
    frame.render_widget(Paragraph::new(title).alignment(Alignment::Center), title_area);

    let body = Rect {
        y: hero.y + hero.height,
        height: area.height - hero.height,
        ..area
    };
    if body.height == 0 {
        return;
    }
    frame.render_widget(Clear, body);
    frame.render_widget(Block::default().style(Style::default().bg(p.background)), body);

    let mut lines = vec![heading("Capability Matrix", p)];
    for (i, skill) in SKILLS.iter().enumerate() {
        let selected = i == app.ui.selection && app.ui.focus == Focus::Content;
        let marker = if selected { "▶ " } else { "  " };
        let name_style = if selected {
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(p.text)
        };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(p.accent)),
            Span::styled(format!("{:<22}", skill.name), name_style),
            Span::styled(level_bar(skill.level, 20), Style::default().fg(p.accent_alt)),
            Span::styled(format!(" {:>3}%", skill.level), Style::default().fg(p.text_muted)),
            Span::styled(
                format!("  {}", skill.category.label()),
                Style::default().fg(p.text_muted),
            ),
        ]));
        if selected {
            lines.push(Line::from(Span::styled(
                format!("    {}", skill.relevance),
                Style::default().fg(p.text_secondary).add_modifier(Modifier::ITALIC),
            )));
        }
    }
    lines.push(Line::from(""));

    lines.push(heading("Featured Work", p));
    for project in filter_projects(None, Some(2)) {
        project_lines(project, p, TagMarks::default(), &mut lines);
    }
    lines.push(Line::from(Span::styled(
        "Tab select · Enter view matching work · c ask the AI assistant",
        Style::default().fg(p.text_muted),
    )));
    draw_text_view(frame, app, body, lines);
}

fn draw_about(frame: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let scene = about_scene_area(area);
    if let Some(network) = &app.scenes.about {
        render_layers(frame, scene, p.canvas_background, &[network as &dyn Layer]);
    }
    let text_area = Rect {
        width: area.width - scene.width,
        ..area
    };

    let mut lines = vec![heading("About", p), Line::from("")];
    for paragraph in PROFILE.summary {
        lines.push(Line::from(Span::styled(*paragraph, Style::default().fg(p.text_secondary))));
        lines.push(Line::from(""));
    }
    lines.push(heading("Services", p));
    for service in SERVICES {
        lines.push(Line::from(Span::styled(
            format!("• {}", service.title),
            Style::default().fg(p.text),
        )));
    }
    lines.push(Line::from(""));
    lines.extend(channel_lines(p));
    draw_text_view(frame, app, text_area, lines);
}

fn services_lines(p: &Palette) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Services", p), Line::from("")];
    for (i, service) in SERVICES.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("{:02} ", i + 1), Style::default().fg(p.text_muted)),
            Span::styled(service.title, Style::default().fg(p.text).add_modifier(Modifier::BOLD)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("   {}", service.description),
            Style::default().fg(p.text_secondary),
        )));
        let mut tags = vec![Span::raw("   ")];
        tags.extend(tag_spans(service.tags, p));
        lines.push(Line::from(tags));
        lines.push(Line::from(""));
    }
    lines
}

fn projects_lines(app: &App, p: &Palette) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Project Archive", p)];

    let mut chips = Vec::new();
    let labels = std::iter::once("All").chain(ProjectCategory::ALL.into_iter().map(ProjectCategory::label));
    for (i, label) in labels.enumerate() {
        let active = match &app.filter {
            None => i == 0,
            Some(f) => i > 0 && f.eq_ignore_ascii_case(label),
        };
        let mut style = if active {
            Style::default().fg(p.background).bg(p.accent)
        } else {
            Style::default().fg(p.text_secondary)
        };
        if i == app.ui.selection && app.ui.focus == Focus::Content {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        chips.push(Span::styled(format!(" {} ", label), style));
        chips.push(Span::raw(" "));
    }
    lines.push(Line::from(chips));

    if let Some(filter) = &app.filter {
        lines.push(Line::from(vec![
            Span::styled(format!("Filtered by \"{}\" ", filter), Style::default().fg(p.text_muted)),
            Span::styled("(r to reset)", Style::default().fg(p.text_muted).add_modifier(Modifier::ITALIC)),
        ]));
    }
    lines.push(Line::from(""));

    let projects = filter_projects(app.filter.as_deref(), None);
    if projects.is_empty() {
        lines.push(Line::from(Span::styled(
            "No projects match this filter.",
            Style::default().fg(p.warning),
        )));
    }
    // Selections past the chips walk the tags card by card.
    let mut tag_cursor = (app.ui.focus == Focus::Content)
        .then(|| app.ui.selection.checked_sub(FILTER_CHIPS))
        .flatten();
    for project in projects {
        let selected = tag_cursor.filter(|i| *i < project.tags.len());
        tag_cursor = tag_cursor.and_then(|i| i.checked_sub(project.tags.len()));
        let marks = TagMarks {
            selected,
            filter: app.filter.as_deref(),
        };
        project_lines(project, p, marks, &mut lines);
    }
    lines.push(Line::from(Span::styled(
        "Tab select chip or tag · Enter filter · r reset",
        Style::default().fg(p.text_muted),
    )));
    lines
}

fn journey_lines(p: &Palette) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Journey", p), Line::from("")];
    for (i, exp) in EXPERIENCES.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled("● ", Style::default().fg(p.accent)),
            Span::styled(exp.position, Style::default().fg(p.text).add_modifier(Modifier::BOLD)),
            Span::styled(format!(" @ {}", exp.company), Style::default().fg(p.accent_alt)),
        ]));
        lines.push(Line::from(Span::styled(
            format!("│ {}", exp.period),
            Style::default().fg(p.text_muted),
        )));
        for item in exp.responsibilities {
            lines.push(Line::from(Span::styled(
                format!("│   - {}", item),
                Style::default().fg(p.text_secondary),
            )));
        }
        let mut tags = vec![Span::styled("│   ", Style::default().fg(p.text_muted))];
        tags.extend(tag_spans(exp.skills, p));
        lines.push(Line::from(tags));
        if i + 1 < EXPERIENCES.len() {
            lines.push(Line::from(Span::styled("│", Style::default().fg(p.text_muted))));
        }
    }
    lines
}

fn draw_contact(frame: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let form = &app.contact;
    let focused = app.ui.focus == Focus::Contact;
    let mut lines = vec![
        heading("Contact", p),
        Line::from(Span::styled(
            "Have a project in mind? Send a message.",
            Style::default().fg(p.text_secondary),
        )),
        Line::from(""),
    ];
    lines.extend(channel_lines(p));
    lines.push(Line::from(""));

    if form.status == FormStatus::Success {
        lines.push(Line::from(Span::styled(
            "✓ Message sent. Thanks for reaching out!",
            Style::default().fg(p.success).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            "Press Enter to send another message.",
            Style::default().fg(p.text_muted),
        )));
        draw_text_view(frame, app, area, lines);
        return;
    }

    let cursor = if app.animation_tick % 30 < 15 { "|" } else { " " };
    for field in Field::ALL {
        let active = focused && form.focus == field;
        let label_style = if active {
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(p.text_muted)
        };
        let required = if field.required() { "*" } else { "" };
        lines.push(Line::from(Span::styled(
            format!("{}{}", field.label(), required),
            label_style,
        )));
        let value = form.value(field);
        let mut rows: Vec<String> = value.split('\n').map(str::to_string).collect();
        if active {
            if let Some(last) = rows.last_mut() {
                last.push_str(cursor);
            }
        }
        for row in rows {
            lines.push(Line::from(vec![
                Span::styled("│ ", Style::default().fg(if active { p.accent } else { p.border })),
                Span::styled(row, Style::default().fg(p.text)),
            ]));
        }
        lines.push(Line::from(""));
    }

    let (label, style) = match form.status {
        FormStatus::Submitting => ("[ Sending... ]", Style::default().fg(p.text_muted)),
        _ => (
            "[ Send Message ]",
            Style::default().fg(p.background).bg(p.accent).add_modifier(Modifier::BOLD),
        ),
    };
    lines.push(Line::from(Span::styled(label, style)));
    lines.push(Line::from(""));
    let hint = if focused {
        "Tab next field · Enter on Message or Ctrl+S send · Esc leave form"
    } else {
        "Enter or i to fill in the form"
    };
    lines.push(Line::from(Span::styled(hint, Style::default().fg(p.text_muted))));
    draw_text_view(frame, app, area, lines);
}

/// Direct ways to reach out besides the form.
fn channel_lines(p: &Palette) -> Vec<Line<'static>> {
    let link = Style::default().fg(p.accent).add_modifier(Modifier::UNDERLINED);
    vec![
        Line::from(vec![
            Span::styled("WhatsApp ", Style::default().fg(p.text_muted)),
            Span::styled(PROFILE.whatsapp.short_url(), link),
            Span::styled("  (w copies a chat link)", Style::default().fg(p.text_muted)),
        ]),
        Line::from(vec![
            Span::styled("LinkedIn ", Style::default().fg(p.text_muted)),
            Span::styled(PROFILE.linkedin, link),
        ]),
    ]
}

fn draw_shutter(frame: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let Some(progress) = app.router.progress(app.now) else {
        return;
    };
    // Closes over the first half, holds shut for the second.
    let covered = (progress * 2.0).min(1.0);
    let width = (area.width as f64 * covered).round() as u16;
    if width == 0 {
        return;
    }
    let shutter = Rect {
        x: area.x + area.width - width,
        width,
        ..area
    };
    frame.render_widget(Clear, shutter);
    frame.render_widget(
        Block::default()
            .borders(Borders::LEFT)
            .border_style(Style::default().fg(p.accent))
            .style(Style::default().bg(p.shutter)),
        shutter,
    );
    if shutter.width as usize > SHUTTER_LABEL.len() + 2 {
        let label = centered(shutter, SHUTTER_LABEL.len() as u16, 1);
        frame.render_widget(
            Paragraph::new(Span::styled(
                SHUTTER_LABEL,
                Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
            )),
            label,
        );
    }
}

fn draw_chat(frame: &mut Frame, app: &App, p: &Palette, area: Rect) {
    frame.render_widget(Clear, area);
    let border = if app.ui.focus == Focus::Chat { p.accent } else { p.border };
    let block = Block::default()
        .title(Span::styled(
            " AI Assistant ",
            Style::default().fg(p.text).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(p.panel));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Messages
            Constraint::Length(1), // Typing indicator
            Constraint::Length(3), // Input
        ])
        .split(inner);

    if app.chat.messages().is_empty() {
        draw_example_prompts(frame, app, p, rows[0]);
    } else {
        draw_messages(frame, app, p, rows[0]);
    }

    if app.chat.is_typing() {
        let dots = ".".repeat((app.animation_tick / 20 % 4) as usize);
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" thinking{}", dots),
                Style::default().fg(p.text_muted).add_modifier(Modifier::ITALIC),
            )),
            rows[1],
        );
    }

    draw_input(frame, app, p, rows[2]);
    if app.ui.focus == Focus::Chat {
        draw_command_popup(frame, app, p, inner, rows[2]);
    }
}

fn draw_example_prompts(frame: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let width = area.width.saturating_sub(4) as usize;
    let mut lines = vec![
        Line::from(Span::styled(
            format!(" Ask about {}'s work.", PROFILE.name),
            Style::default().fg(p.text_secondary),
        )),
        Line::from(""),
    ];
    for (i, prompt) in EXAMPLE_PROMPTS.iter().enumerate() {
        let selected = i == app.chat.prompt_cursor;
        let style = if selected {
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(p.text_muted)
        };
        for (j, row) in wrap_text(prompt, width).into_iter().enumerate() {
            let marker = match (j, selected) {
                (0, true) => " ▶ ",
                _ => "   ",
            };
            lines.push(Line::from(Span::styled(format!("{}{}", marker, row), style)));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " ↑↓ pick · Enter ask · / commands",
        Style::default().fg(p.text_muted),
    )));
    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_messages(frame: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let width = area.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = Vec::new();
    for message in app.chat.messages() {
        let (who, color) = match message.role {
            Role::User => ("You", p.accent),
            Role::Assistant => ("AI", p.accent_alt),
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {}", who), Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!(" {}", message.timestamp.format("%H:%M")),
                Style::default().fg(p.text_muted),
            ),
        ]));
        for row in wrap_text(&message.text, width) {
            lines.push(Line::from(Span::styled(format!(" {}", row), Style::default().fg(p.text))));
        }
        lines.push(Line::from(""));
    }

    // Anchor to the bottom; `scroll` counts lines up from there.
    let height = area.height as usize;
    let max_scroll = lines.len().saturating_sub(height);
    let scroll = app.chat.scroll.min(max_scroll);
    let start = lines.len().saturating_sub(height + scroll);
    let visible: Vec<Line> = lines.into_iter().skip(start).take(height).collect();
    frame.render_widget(Paragraph::new(visible), area);
}

fn draw_input(frame: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let focused = app.ui.focus == Focus::Chat;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if focused { p.accent } else { p.border }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cursor = if focused && app.animation_tick % 30 < 15 { "|" } else { " " };
    // Keep the tail of long input visible.
    let room = (inner.width as usize).saturating_sub(4);
    let mut shown = app.chat.input.as_str();
    while shown.width() > room {
        let mut chars = shown.chars();
        chars.next();
        shown = chars.as_str();
    }
    frame.render_widget(
        Paragraph::new(format!(" > {}{}", shown, cursor)).style(Style::default().fg(p.text)),
        inner,
    );
}

fn draw_command_popup(frame: &mut Frame, app: &App, p: &Palette, chat_area: Rect, input: Rect) {
    let filtered = filtered_commands(&app.chat.input);
    if filtered.is_empty() {
        return;
    }

    // +1 for the "your input" row, +2 for borders
    let height = (filtered.len() + 3) as u16;
    let popup = Rect {
        x: chat_area.x,
        y: input.y.saturating_sub(height).max(chat_area.y),
        width: chat_area.width,
        height: height.min(input.y.saturating_sub(chat_area.y)),
    };
    if popup.height < 3 {
        return;
    }
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .title(Span::styled(
            " Commands ",
            Style::default().fg(p.accent_alt).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(p.accent_alt))
        .style(Style::default().bg(p.panel));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let selected = app.ui.command_selection;
    let row_style = |on: bool| {
        if on {
            Style::default().fg(p.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(p.text_secondary)
        }
    };
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("{} {} ", if selected.is_none() { ">" } else { " " }, app.chat.input),
            row_style(selected.is_none()),
        ),
        Span::styled("(your input)", Style::default().fg(p.text_muted).add_modifier(Modifier::ITALIC)),
    ])];
    for (i, (cmd, desc)) in filtered.iter().enumerate() {
        let on = selected == Some(i);
        lines.push(Line::from(vec![
            Span::styled(format!("{} {} ", if on { ">" } else { " " }, cmd), row_style(on)),
            Span::styled(format!("- {}", desc), Style::default().fg(p.text_muted)),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_footer(frame: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let line = match &app.ui.status_message {
        Some(msg) => Line::from(Span::styled(format!(" {}", msg), Style::default().fg(p.warning))),
        None => {
            let hints: &[(&str, &str)] = match app.ui.focus {
                Focus::Content => &[
                    ("←→", "views"),
                    ("1-6", "jump"),
                    ("t", "theme"),
                    ("c", "chat"),
                    ("w", "whatsapp"),
                    ("/", "commands"),
                    ("q", "quit"),
                ],
                Focus::Chat => &[("Enter", "send"), ("↑↓", "scroll"), ("Tab", "content"), ("Esc", "back")],
                Focus::Contact => &[("Tab", "next"), ("Ctrl+S", "send"), ("Esc", "back")],
            };
            let mut spans = vec![Span::raw(" ")];
            for (key, what) in hints {
                spans.push(Span::styled(*key, Style::default().fg(p.accent).add_modifier(Modifier::BOLD)));
                spans.push(Span::styled(format!(" {}  ", what), Style::default().fg(p.text_muted)));
            }
            Line::from(spans)
        }
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_help(frame: &mut Frame, p: &Palette) {
    let area = centered(frame.area(), 72, (COMMANDS.len() + 4) as u16);
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(Span::styled(" Help ", Style::default().fg(p.accent).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(p.accent))
        .style(Style::default().bg(p.panel));
    let mut lines: Vec<Line> = COMMANDS
        .iter()
        .map(|(cmd, desc)| {
            Line::from(vec![
                Span::styled(format!(" {:<9}", cmd), Style::default().fg(p.accent)),
                Span::styled(*desc, Style::default().fg(p.text_secondary)),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Press any key to close", Style::default().fg(p.text_muted))));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_alert(frame: &mut Frame, p: &Palette, message: &str) {
    let width = 56.min(frame.area().width);
    let text = wrap_text(message, width.saturating_sub(4) as usize);
    let area = centered(frame.area(), width, text.len() as u16 + 4);
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(Span::styled(" Alert ", Style::default().fg(p.warning).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(p.warning))
        .style(Style::default().bg(p.panel));
    let mut lines: Vec<Line> = text
        .into_iter()
        .map(|row| Line::from(Span::styled(format!(" {}", row), Style::default().fg(p.text))))
        .collect();
    lines.push(Line::from(Span::styled(" Press any key", Style::default().fg(p.text_muted))));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
