use anyhow::Result;
use arboard::Clipboard;

/// Destination for copy actions. The system implementation talks to the OS
/// clipboard; tests substitute an in-memory sink.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// OS clipboard via arboard. The handle is opened per copy, matching how
/// short-lived yank operations behave best across platforms.
#[derive(Default)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }
}
