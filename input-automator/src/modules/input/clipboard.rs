//! 剪贴板注入模块
//!
//! 使用 arboard 写入系统剪贴板

use automator_core::{AutomatorError, Clipboard, Result};

/// 系统剪贴板
///
/// 首次写入时才打开剪贴板句柄，并在整个会话中保持，
/// 某些平台（X11）上句柄释放后剪贴板内容会随之消失。
#[derive(Default)]
pub struct ArboardClipboard {
    clipboard: Option<arboard::Clipboard>,
}

impl std::fmt::Debug for ArboardClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArboardClipboard")
            .field("opened", &self.clipboard.is_some())
            .finish()
    }
}

impl ArboardClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard> {
        if self.clipboard.is_none() {
            let clipboard = arboard::Clipboard::new()
                .map_err(|e| AutomatorError::ClipboardFailed(e.to_string()))?;
            self.clipboard = Some(clipboard);
        }
        self.clipboard
            .as_mut()
            .ok_or_else(|| AutomatorError::ClipboardFailed("clipboard not opened".to_string()))
    }
}

impl Clipboard for ArboardClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.handle()?
            .set_text(text)
            .map_err(|e| AutomatorError::ClipboardFailed(e.to_string()))
    }
}
