//! Copying raw connection links.

use parking_lot::Mutex;

use crate::error::ClipboardError;

/// A text clipboard.
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents with `text`.
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Process-local clipboard.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents, if anything was written.
    pub fn read_text(&self) -> Option<String> {
        self.contents.lock().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        *self.contents.lock() = Some(text.to_string());
        Ok(())
    }
}

/// How a copy attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Written by the primary clipboard.
    Copied,
    /// The primary clipboard failed; the fallback succeeded.
    CopiedWithFallback,
    /// Both failed. Only logged.
    Failed,
}

impl CopyOutcome {
    /// Whether the "copied" toast should be shown.
    pub fn show_toast(&self) -> bool {
        !matches!(self, CopyOutcome::Failed)
    }
}

/// Copies `link` to `primary`, falling back to `fallback` on failure.
pub fn copy_link(primary: &dyn Clipboard, fallback: &dyn Clipboard, link: &str) -> CopyOutcome {
    match primary.write_text(link) {
        Ok(()) => CopyOutcome::Copied,
        Err(e) => {
            tracing::warn!(error = %e, "Clipboard write failed, trying fallback");
            match fallback.write_text(link) {
                Ok(()) => CopyOutcome::CopiedWithFallback,
                Err(e) => {
                    tracing::error!(error = %e, "Fallback copy failed");
                    CopyOutcome::Failed
                }
            }
        }
    }
}
