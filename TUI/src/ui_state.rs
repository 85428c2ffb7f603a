/// Which panel receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Content,
    Chat,
    Contact,
}

#[derive(Debug, Default)]
pub struct UIState {
    pub focus: Focus,

    // Transient footer message and its age in ticks
    pub status_message: Option<String>,
    pub status_ticks: u64,

    // Blocking alert; any key dismisses it
    pub alert: Option<String>,

    // Lines scrolled in the main view, reset on every view swap
    pub content_scroll: usize,

    // Highlighted skill (home) or category chip (projects)
    pub selection: usize,

    // Command popup state: None = typed input, Some(n) = nth filtered command
    pub command_selection: Option<usize>,

    pub show_help: bool,
}

impl UIState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_ticks = 0;
    }

    /// Age the status message; clears it after `timeout` ticks.
    pub fn age_status(&mut self, timeout: u64) {
        if self.status_message.is_some() {
            self.status_ticks += 1;
            if self.status_ticks >= timeout {
                self.status_message = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_expires() {
        let mut state = UIState::new();
        state.set_status("hi");
        state.age_status(2);
        assert!(state.status_message.is_some());
        state.age_status(2);
        assert!(state.status_message.is_none());
    }
}
