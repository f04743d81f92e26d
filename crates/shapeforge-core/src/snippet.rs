//! Snippet viewer state and clipboard feedback
//!
//! Time is passed in as elapsed `Duration` since some fixed origin so the
//! same logic runs against Bevy's clock, a browser clock, or a test.

use std::time::Duration;
use thiserror::Error;

use crate::codegen::{GeneratedSnippet, Variant};

/// How long the "copied" indicator stays visible
pub const COPIED_FEEDBACK: Duration = Duration::from_secs(2);

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("Clipboard write failed: {0}")]
    WriteFailed(String),
}

/// Write-only access to the platform clipboard
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, Clone)]
pub struct SnippetViewer {
    snippet: GeneratedSnippet,
    active: Variant,
    copied_until: Option<Duration>,
    open: bool,
}

impl SnippetViewer {
    pub fn new(snippet: GeneratedSnippet) -> Self {
        Self {
            snippet,
            active: Variant::React,
            copied_until: None,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    pub fn toggle_open(&mut self) {
        self.open = !self.open;
    }

    pub fn active(&self) -> Variant {
        self.active
    }

    pub fn select(&mut self, variant: Variant) {
        self.active = variant;
    }

    /// Replace the displayed snippet, keeping the selected tab
    pub fn regenerate(&mut self, snippet: GeneratedSnippet) {
        self.snippet = snippet;
    }

    pub fn snippet(&self) -> &GeneratedSnippet {
        &self.snippet
    }

    pub fn active_text(&self) -> &str {
        self.snippet.get(self.active)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.active_text().lines()
    }

    /// Copy the whole active snippet
    pub fn copy_active(&mut self, clipboard: &mut dyn Clipboard, now: Duration) {
        let text = self.active_text().to_string();
        self.copy(clipboard, &text, now);
    }

    /// Copy one line of the active snippet; out-of-range indices are ignored
    pub fn copy_line(&mut self, clipboard: &mut dyn Clipboard, index: usize, now: Duration) {
        let Some(line) = self.lines().nth(index).map(str::to_string) else {
            tracing::debug!(index, "Line out of range, nothing copied");
            return;
        };
        self.copy(clipboard, &line, now);
    }

    fn copy(&mut self, clipboard: &mut dyn Clipboard, text: &str, now: Duration) {
        if let Err(e) = clipboard.write_text(text) {
            tracing::warn!("Copy failed: {}", e);
        }
        // Restarted on every copy, never stacked
        self.copied_until = Some(now + COPIED_FEEDBACK);
    }

    /// Whether the "copied" indicator is showing at `now`
    pub fn is_copied(&self, now: Duration) -> bool {
        self.copied_until.is_some_and(|until| now < until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::generate;
    use crate::geometry::ShapeReference;
    use crate::settings::Settings;

    #[derive(Default)]
    struct RecordingClipboard {
        writes: Vec<String>,
        fail: bool,
    }

    impl Clipboard for RecordingClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::WriteFailed("denied".to_string()));
            }
            self.writes.push(text.to_string());
            Ok(())
        }
    }

    fn viewer() -> SnippetViewer {
        SnippetViewer::new(generate(
            &Settings::default(),
            &ShapeReference::primitive("sphere"),
            None,
        ))
    }

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn test_tabs_switch_text() {
        let mut viewer = viewer();
        assert_eq!(viewer.active(), Variant::React);
        viewer.select(Variant::Vanilla);
        assert!(viewer.active_text().contains("SphereGeometry(1.5, 32, 32)"));
    }

    #[test]
    fn test_copy_active_writes_text_and_flags() {
        let mut viewer = viewer();
        let mut clipboard = RecordingClipboard::default();

        viewer.copy_active(&mut clipboard, secs(10.0));

        assert_eq!(clipboard.writes.len(), 1);
        assert_eq!(clipboard.writes[0], viewer.active_text());
        assert!(viewer.is_copied(secs(11.9)));
        assert!(!viewer.is_copied(secs(12.0)));
    }

    #[test]
    fn test_repeated_copy_restarts_timer() {
        let mut viewer = viewer();
        let mut clipboard = RecordingClipboard::default();

        viewer.copy_active(&mut clipboard, secs(0.0));
        viewer.copy_line(&mut clipboard, 0, secs(1.5));

        assert!(viewer.is_copied(secs(3.0)));
        assert!(!viewer.is_copied(secs(3.5)));
        assert_eq!(clipboard.writes[1], viewer.lines().next().unwrap());
    }

    #[test]
    fn test_copy_line_out_of_range() {
        let mut viewer = viewer();
        let mut clipboard = RecordingClipboard::default();
        viewer.copy_line(&mut clipboard, 100_000, secs(0.0));
        assert!(clipboard.writes.is_empty());
        assert!(!viewer.is_copied(secs(0.0)));
    }

    #[test]
    fn test_clipboard_failure_is_ignored() {
        let mut viewer = viewer();
        let mut clipboard = RecordingClipboard {
            fail: true,
            ..Default::default()
        };
        viewer.copy_active(&mut clipboard, secs(0.0));
        assert!(clipboard.writes.is_empty());
    }
}
