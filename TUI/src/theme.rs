//! Dark/light preference, its persistence, and the colors it implies.
//!
//! The theme is never read from a global: `ThemeController` owns the value and
//! the root presentation class, and callers pass `Theme` (or its `Palette`)
//! down to whatever needs to be recolored.

use std::fs;
use std::path::PathBuf;

use ratatui::style::Color;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::scene::Rgba;

/// File name of the persisted preference inside the data directory.
pub const THEME_KEY: &str = "folio-theme";

/// Theme the controller starts in when nothing is stored.
pub const DEFAULT_THEME: Theme = Theme::Dark;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn parse(value: &str) -> Option<Theme> {
        match value.trim() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette::DARK,
            Theme::Light => Palette::LIGHT,
        }
    }
}

/// Durable key-value slot holding the theme string.
pub trait ThemeStore {
    fn load(&self) -> Result<Option<Theme>, StoreError>;
    fn save(&mut self, theme: Theme) -> Result<(), StoreError>;
}

/// Stores the preference as a plain `"dark"` / `"light"` file.
pub struct FileThemeStore {
    path: Option<PathBuf>,
}

impl FileThemeStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Store rooted in the platform data directory, if there is one.
    pub fn in_data_dir() -> Self {
        let path = dirs::data_dir().map(|d| d.join("folio").join(THEME_KEY));
        Self { path }
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Result<Option<Theme>, StoreError> {
        let path = self.path.as_ref().ok_or(StoreError::Unavailable)?;
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Theme::parse(&raw)
            .map(Some)
            .ok_or_else(|| StoreError::Invalid(raw.trim().to_string()))
    }

    fn save(&mut self, theme: Theme) -> Result<(), StoreError> {
        let path = self.path.as_ref().ok_or(StoreError::Unavailable)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, theme.as_str())?;
        Ok(())
    }
}

/// In-memory store, used when persistence is disabled.
#[derive(Default)]
pub struct MemoryThemeStore {
    pub value: Option<String>,
    pub fail: bool,
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Result<Option<Theme>, StoreError> {
        if self.fail {
            return Err(StoreError::Unavailable);
        }
        match &self.value {
            None => Ok(None),
            Some(raw) => Theme::parse(raw)
                .map(Some)
                .ok_or_else(|| StoreError::Invalid(raw.clone())),
        }
    }

    fn save(&mut self, theme: Theme) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Unavailable);
        }
        self.value = Some(theme.as_str().to_string());
        Ok(())
    }
}

/// Presentation classes on the document root. Only `dark` exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RootClasses {
    dark: bool,
}

impl RootClasses {
    pub fn has_dark(&self) -> bool {
        self.dark
    }

    fn set_dark(&mut self, on: bool) {
        self.dark = on;
    }
}

/// Decide the root class before the first frame is drawn: a stored value
/// wins, otherwise the platform preference. Storage errors count as unset.
pub fn bootstrap(store: &dyn ThemeStore, platform_prefers_dark: bool) -> RootClasses {
    let stored = store.load().unwrap_or_else(|e| {
        warn!(error = %e, "theme bootstrap could not read storage");
        None
    });
    let dark = match stored {
        Some(theme) => theme.is_dark(),
        None => platform_prefers_dark,
    };
    RootClasses { dark }
}

/// Reads the `COLORFGBG` convention ("fg;bg"): background indices 0-6 and 8
/// are dark. Unknown means dark.
pub fn platform_prefers_dark() -> bool {
    prefers_dark_from(std::env::var("COLORFGBG").ok().as_deref())
}

fn prefers_dark_from(colorfgbg: Option<&str>) -> bool {
    let Some(bg) = colorfgbg.and_then(|v| v.rsplit(';').next()) else {
        return true;
    };
    match bg.trim().parse::<u8>() {
        Ok(idx) => idx <= 6 || idx == 8,
        Err(_) => true,
    }
}

pub struct ThemeController {
    theme: Theme,
    root: RootClasses,
    store: Box<dyn ThemeStore>,
}

impl ThemeController {
    /// Restores the persisted preference, falling back to `default`.
    pub fn new(store: Box<dyn ThemeStore>, default: Theme) -> Self {
        let theme = match store.load() {
            Ok(Some(theme)) => theme,
            Ok(None) => default,
            Err(e) => {
                warn!(error = %e, "theme storage unavailable, using default");
                default
            }
        };
        let mut controller = Self {
            theme,
            root: RootClasses::default(),
            store,
        };
        controller.apply();
        controller
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn root(&self) -> RootClasses {
        self.root
    }

    pub fn toggle(&mut self) {
        self.theme = self.theme.toggled();
        info!(theme = self.theme.as_str(), "theme changed");
        self.apply();
    }

    fn apply(&mut self) {
        if let Err(e) = self.store.save(self.theme) {
            warn!(error = %e, "failed to persist theme");
        }
        self.root.set_dark(self.theme.is_dark());
    }
}

/// Every theme-dependent color in one place.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub panel: Color,
    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,
    pub accent: Color,
    pub accent_alt: Color,
    pub border: Color,
    pub border_accent: Color,
    pub warning: Color,
    pub success: Color,
    pub shutter: Color,

    pub canvas_background: Rgba,
    pub particles: [Rgba; 3],
    pub trail_alpha: f64,
    pub particle_alpha: f64,
    pub link_alpha: f64,
    pub edge: Rgba,
    pub pulse: Rgba,
    pub glow_inner: Rgba,
    pub glow_outer: Rgba,
    pub node_core: Rgba,
}

impl Palette {
    pub const DARK: Palette = Palette {
        background: Color::Rgb(2, 2, 5),
        panel: Color::Rgb(10, 10, 15),
        text: Color::Rgb(240, 240, 245),
        text_secondary: Color::Rgb(180, 180, 190),
        text_muted: Color::Rgb(105, 116, 133),
        accent: Color::Rgb(59, 130, 246),
        accent_alt: Color::Rgb(139, 92, 246),
        border: Color::Rgb(45, 50, 60),
        border_accent: Color::Rgb(70, 85, 110),
        warning: Color::Rgb(204, 92, 68),
        success: Color::Rgb(131, 179, 102),
        shutter: Color::Rgb(10, 10, 15),

        canvas_background: Rgba::rgb(2, 2, 5),
        particles: [
            Rgba::rgb(0x3b, 0x82, 0xf6),
            Rgba::rgb(0x8b, 0x5c, 0xf6),
            Rgba::rgb(0xd9, 0x46, 0xef),
        ],
        trail_alpha: 0.3,
        particle_alpha: 0.6,
        link_alpha: 0.15,
        edge: Rgba::rgb(96, 165, 250),
        pulse: Rgba::rgb(0x60, 0xa5, 0xfa),
        glow_inner: Rgba::new(96, 165, 250, 0.5),
        glow_outer: Rgba::new(139, 92, 246, 0.0),
        node_core: Rgba::rgb(255, 255, 255),
    };

    pub const LIGHT: Palette = Palette {
        background: Color::Rgb(248, 250, 252),
        panel: Color::Rgb(255, 255, 255),
        text: Color::Rgb(15, 23, 42),
        text_secondary: Color::Rgb(71, 85, 105),
        text_muted: Color::Rgb(148, 163, 184),
        accent: Color::Rgb(37, 99, 235),
        accent_alt: Color::Rgb(124, 58, 237),
        border: Color::Rgb(226, 232, 240),
        border_accent: Color::Rgb(148, 163, 184),
        warning: Color::Rgb(220, 38, 38),
        success: Color::Rgb(22, 163, 74),
        shutter: Color::Rgb(255, 255, 255),

        canvas_background: Rgba::rgb(248, 250, 252),
        particles: [
            Rgba::rgb(0x25, 0x63, 0xeb),
            Rgba::rgb(0x7c, 0x3a, 0xed),
            Rgba::rgb(0xdb, 0x27, 0x77),
        ],
        trail_alpha: 0.15,
        particle_alpha: 0.3,
        link_alpha: 0.08,
        edge: Rgba::rgb(37, 99, 235),
        pulse: Rgba::rgb(0x25, 0x63, 0xeb),
        glow_inner: Rgba::new(37, 99, 235, 0.4),
        glow_outer: Rgba::new(124, 58, 237, 0.0),
        node_core: Rgba::rgb(0x1e, 0x3a, 0x8a),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Shares its slot with the test so writes stay observable after the
    /// controller takes ownership.
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryThemeStore>>);

    impl ThemeStore for SharedStore {
        fn load(&self) -> Result<Option<Theme>, StoreError> {
            self.0.borrow().load()
        }

        fn save(&mut self, theme: Theme) -> Result<(), StoreError> {
            self.0.borrow_mut().save(theme)
        }
    }

    #[test]
    fn test_defaults_to_dark_when_unset() {
        let store = SharedStore::default();
        let controller = ThemeController::new(Box::new(store.clone()), Theme::Dark);

        assert_eq!(controller.theme(), Theme::Dark);
        assert!(controller.root().has_dark());
        assert_eq!(store.0.borrow().value.as_deref(), Some("dark"));
    }

    #[test]
    fn test_restores_persisted_value() {
        let store = SharedStore::default();
        store.0.borrow_mut().value = Some("light".to_string());
        let controller = ThemeController::new(Box::new(store), Theme::Dark);

        assert_eq!(controller.theme(), Theme::Light);
        assert!(!controller.root().has_dark());
    }

    #[test]
    fn test_toggle_persists_and_flips_root_class() {
        let store = SharedStore::default();
        let mut controller = ThemeController::new(Box::new(store.clone()), Theme::Dark);

        controller.toggle();
        assert_eq!(store.0.borrow().value.as_deref(), Some("light"));
        assert!(!controller.root().has_dark());

        controller.toggle();
        assert_eq!(store.0.borrow().value.as_deref(), Some("dark"));
        assert!(controller.root().has_dark());
    }

    #[test]
    fn test_storage_failure_is_swallowed() {
        let store = MemoryThemeStore {
            value: None,
            fail: true,
        };
        let mut controller = ThemeController::new(Box::new(store), Theme::Light);
        assert_eq!(controller.theme(), Theme::Light);

        controller.toggle();
        assert_eq!(controller.theme(), Theme::Dark);
        assert!(controller.root().has_dark());
    }

    #[test]
    fn test_garbage_in_storage_falls_back_to_default() {
        let store = MemoryThemeStore {
            value: Some("sepia".to_string()),
            fail: false,
        };
        let controller = ThemeController::new(Box::new(store), Theme::Dark);
        assert_eq!(controller.theme(), Theme::Dark);
    }

    #[test]
    fn test_bootstrap_prefers_stored_value() {
        let store = MemoryThemeStore {
            value: Some("light".to_string()),
            fail: false,
        };
        assert!(!bootstrap(&store, true).has_dark());

        let empty = MemoryThemeStore::default();
        assert!(bootstrap(&empty, true).has_dark());
        assert!(!bootstrap(&empty, false).has_dark());

        let broken = MemoryThemeStore {
            value: None,
            fail: true,
        };
        assert!(!bootstrap(&broken, false).has_dark());
    }

    #[test]
    fn test_platform_preference_only_shapes_first_frame() {
        let store = SharedStore::default();
        assert!(!bootstrap(&store, false).has_dark());

        let controller = ThemeController::new(Box::new(store.clone()), DEFAULT_THEME);
        assert_eq!(controller.theme(), Theme::Dark);
        assert_eq!(store.0.borrow().value.as_deref(), Some("dark"));
    }

    #[test]
    fn test_colorfgbg_detection() {
        assert!(prefers_dark_from(None));
        assert!(prefers_dark_from(Some("15;0")));
        assert!(!prefers_dark_from(Some("0;15")));
        assert!(!prefers_dark_from(Some("0;default;7")));
        assert!(prefers_dark_from(Some("garbage")));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("folio-theme-{}", std::process::id()));
        let path = dir.join(THEME_KEY);
        let mut store = FileThemeStore::new(path.clone());

        assert_eq!(store.load().unwrap(), None);
        store.save(Theme::Light).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "light");
        assert_eq!(store.load().unwrap(), Some(Theme::Light));

        let _ = fs::remove_dir_all(dir);
    }
}
