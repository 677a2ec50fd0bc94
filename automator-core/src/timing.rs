//! 稳定延迟配置与睡眠抽象

use auto_impl::auto_impl;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_PRESS_SETTLE_MS: u64 = 100;
const DEFAULT_RELEASE_SETTLE_MS: u64 = 240;

/// 按下/释放之后的稳定延迟
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// 按下之后等待的毫秒数
    pub press_settle_ms: u64,
    /// 释放之后等待的毫秒数
    pub release_settle_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            press_settle_ms: DEFAULT_PRESS_SETTLE_MS,
            release_settle_ms: DEFAULT_RELEASE_SETTLE_MS,
        }
    }
}

impl Timing {
    pub fn press_settle(&self) -> Duration {
        Duration::from_millis(self.press_settle_ms)
    }

    pub fn release_settle(&self) -> Duration {
        Duration::from_millis(self.release_settle_ms)
    }
}

/// 阻塞睡眠
///
/// 测试中替换为只记录时长、不真正睡眠的实现。
#[auto_impl(&, Box, Arc)]
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// 基于 `std::thread::sleep` 的实现
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}
