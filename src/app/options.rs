#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOptions {
    /// Hide choice fields that offer exactly one option.
    pub suppress_single_choice: bool,
    pub wrap_width: usize,
    pub show_help: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            suppress_single_choice: true,
            wrap_width: 72,
            show_help: true,
        }
    }
}

impl FormOptions {
    pub fn with_single_choice_suppression(mut self, enabled: bool) -> Self {
        self.suppress_single_choice = enabled;
        self
    }

    pub fn with_wrap_width(mut self, width: usize) -> Self {
        self.wrap_width = width;
        self
    }

    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }
}
