#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    message: String,
}

pub const READY_STATUS: &str = "Ready. Edit fields and save to apply changes.";

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY_STATUS.to_string(),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ready(&mut self) {
        self.message = READY_STATUS.to_string();
    }

    pub fn editing(&mut self, label: &str) {
        self.message = format!("Editing {label}");
    }

    pub fn saving(&mut self) {
        self.message = "Saving…".to_string();
    }

    pub fn saved(&mut self) {
        self.message = "Changes saved".to_string();
    }

    pub fn issues_remaining(&mut self, count: usize) {
        self.message = format!("{count} issue(s) remaining");
    }

    pub fn save_failed(&mut self, reason: &str) {
        self.message = format!("Unable to save: {reason}");
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
