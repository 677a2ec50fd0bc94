//! 平台能力接口
//!
//! 注入器、剪贴板、全局按键事件源都由平台层实现，核心只通过这些 trait 调用。

use crate::error::Result;
use crate::key::{KeyCode, MouseButton};
use auto_impl::auto_impl;
use std::sync::Arc;

/// 输入注入器
///
/// 每个调用都是同步的，失败时返回 `InjectionFailed`，核心不做重试。
#[auto_impl(&mut, Box)]
pub trait Injector {
    fn press_key(&mut self, key: KeyCode) -> Result<()>;
    fn release_key(&mut self, key: KeyCode) -> Result<()>;
    /// 绝对坐标移动，不做屏幕边界检查
    fn move_pointer(&mut self, x: i32, y: i32) -> Result<()>;
    fn press_button(&mut self, button: MouseButton) -> Result<()>;
    fn release_button(&mut self, button: MouseButton) -> Result<()>;
    /// 正数向下，负数向上
    fn scroll_wheel(&mut self, notches: i32) -> Result<()>;
}

/// 系统剪贴板
#[auto_impl(&mut, Box)]
pub trait Clipboard {
    /// 替换系统剪贴板内容，返回时写入已完成
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// 按键回调，在事件源线程上调用
pub type KeyCallback = Arc<dyn Fn(KeyCode) + Send + Sync + 'static>;

/// 全局按键事件源
pub trait KeyEventSource: Send {
    /// 订阅全局按键按下事件，注册失败返回 `HotkeyRegistrationFailed`
    fn subscribe(&mut self, callback: KeyCallback) -> Result<()>;
    fn unsubscribe(&mut self) -> Result<()>;
}
