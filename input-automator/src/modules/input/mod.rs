//! 输入模块
//!
//! 提供键盘、鼠标模拟和剪贴板写入

pub mod clipboard;
pub mod keyboard;
pub mod mouse;

pub use clipboard::ArboardClipboard;
pub use keyboard::EnigoInjector;
