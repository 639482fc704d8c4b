//! Text output sink

/// Where the transcript and on-screen details are written
pub trait Screen: Send + Sync {
    /// Write one line
    fn show(&self, line: &str);
}

/// Screen writing to standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutScreen;

impl Screen for StdoutScreen {
    fn show(&self, line: &str) {
        println!("{line}");
    }
}
