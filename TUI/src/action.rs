use crate::router::View;

/// User actions that can be triggered by commands or UI events.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Show help message
    Help,
    /// Navigate to a view
    Goto(View),
    /// Flip dark/light
    ToggleTheme,
    /// Set or clear the project filter
    Filter(Option<String>),
    /// Quit application
    Quit,
}
