//! 输入自动化核心库
//!
//! 按固定的稳定延迟编排键盘、鼠标、剪贴板的原语操作，
//! 并提供可选的紧急停止键。平台相关的注入能力通过 trait 注入。

mod automator;
mod backend;
mod error;
mod key;
mod stop;
mod timing;

#[cfg(test)]
mod mock;

pub use automator::{InputAutomator, ScrollDirection};
pub use backend::{Clipboard, Injector, KeyCallback, KeyEventSource};
pub use error::{AutomatorError, Result};
pub use key::{Chord, KeyCode, MouseButton};
pub use stop::{ListenerState, StopKey, StopSignal};
pub use timing::{Sleeper, ThreadSleeper, Timing};
