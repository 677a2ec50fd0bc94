//! 紧急停止键
//!
//! 全局按键事件源上的回调在匹配到停止键时触发 [`StopSignal`]，
//! 正在执行的多步操作在步骤之间检查该信号并提前返回 `Cancelled`。

use crate::backend::KeyCallback;
use crate::key::KeyCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// 停止回调类型
pub type StopCallback = Box<dyn Fn() + Send + Sync>;

/// 监听器状态，只有 `Armed -> Triggered` 一次转换
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListenerState {
    Armed,
    Triggered,
}

/// 停止键设置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopKey {
    /// 停止键
    pub code: KeyCode,
    /// 是否记录收到的每一个按键
    pub verbose: bool,
}

impl StopKey {
    pub fn new(code: KeyCode) -> Self {
        Self { code, verbose: false }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

struct StopInner {
    triggered: AtomicBool,
    triggered_at: OnceLock<DateTime<Utc>>,
    callbacks: parking_lot::Mutex<Vec<StopCallback>>,
}

/// 取消信号
///
/// 可在线程间克隆共享，触发是幂等的。
#[derive(Clone)]
pub struct StopSignal {
    inner: Arc<StopInner>,
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StopSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopSignal")
            .field("state", &self.state())
            .field("triggered_at", &self.triggered_at())
            .finish()
    }
}

impl StopSignal {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StopInner {
                triggered: AtomicBool::new(false),
                triggered_at: OnceLock::new(),
                callbacks: parking_lot::Mutex::new(Vec::new()),
            }),
        }
    }

    /// 触发信号，仅第一次调用返回 `true` 并执行回调
    ///
    /// 回调在锁外执行，回调内部可以再次调用 `on_trigger`。
    pub fn trigger(&self) -> bool {
        if self
            .inner
            .triggered
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        let _ = self.inner.triggered_at.set(Utc::now());
        let callbacks = std::mem::take(&mut *self.inner.callbacks.lock());
        for callback in callbacks {
            callback();
        }
        true
    }

    pub fn is_triggered(&self) -> bool {
        self.inner.triggered.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> ListenerState {
        if self.is_triggered() {
            ListenerState::Triggered
        } else {
            ListenerState::Armed
        }
    }

    pub fn triggered_at(&self) -> Option<DateTime<Utc>> {
        self.inner.triggered_at.get().copied()
    }

    /// 注册触发回调
    ///
    /// 回调在触发方的线程上执行；信号已经触发时立即在当前线程执行。
    /// 需要沿用“停止键直接退出进程”行为的调用方可以在这里调用 `std::process::exit`。
    pub fn on_trigger<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut callbacks = self.inner.callbacks.lock();
        if self.is_triggered() {
            drop(callbacks);
            callback();
            return;
        }
        callbacks.push(Box::new(callback));
    }
}

/// 构造订阅到全局按键事件源上的回调
pub(crate) fn stop_key_callback(stop_key: StopKey, signal: StopSignal) -> KeyCallback {
    Arc::new(move |code: KeyCode| {
        if stop_key.verbose {
            tracing::info!("Clicked key code: {}", code);
        }
        if code == stop_key.code && signal.trigger() {
            tracing::info!("Automation stopped by stop key: {}", stop_key.code);
        }
    })
}
