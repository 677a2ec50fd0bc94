//! 全局按键监听
//!
//! 使用 rdev::listen 在后台线程上接收系统范围的按键事件，
//! 映射为按键代码后转发给当前订阅者。

use super::keymap::to_key_code;
use arc_swap::ArcSwapOption;
use automator_core::{AutomatorError, KeyCallback, KeyEventSource, Result};
use crossbeam::channel::{self, RecvTimeoutError};
use rdev::{Event, EventType};
use std::sync::Arc;
use std::time::Duration;

/// 等待 rdev 安装钩子失败的时间
const DEFAULT_STARTUP_GRACE: Duration = Duration::from_millis(200);

struct Subscriber {
    callback: KeyCallback,
}

/// 基于 rdev 的全局按键事件源
///
/// rdev 无法停止已经安装的钩子：取消订阅只会摘除回调，
/// 监听线程会一直停留在系统钩子中直到进程结束。
pub struct RdevKeySource {
    subscriber: Arc<ArcSwapOption<Subscriber>>,
    startup_grace: Duration,
    started: bool,
}

impl Default for RdevKeySource {
    fn default() -> Self {
        Self::new()
    }
}

impl RdevKeySource {
    pub fn new() -> Self {
        Self {
            subscriber: Arc::new(ArcSwapOption::empty()),
            startup_grace: DEFAULT_STARTUP_GRACE,
            started: false,
        }
    }

    pub fn with_startup_grace(mut self, grace: Duration) -> Self {
        self.startup_grace = grace;
        self
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscriber.load().is_some()
    }

    fn spawn_listener(&self) -> Result<()> {
        let (err_tx, err_rx) = channel::bounded::<String>(1);
        let subscriber = self.subscriber.clone();

        std::thread::Builder::new()
            .name("stop-key-listener".into())
            .spawn(move || {
                let result = rdev::listen(move |event| dispatch(&subscriber, &event));
                match result {
                    Ok(()) => tracing::warn!("rdev listener exited"),
                    Err(e) => {
                        tracing::warn!("rdev listen error: {:?}", e);
                        let _ = err_tx.send(format!("{:?}", e));
                    }
                }
            })
            .map_err(|e| AutomatorError::HotkeyRegistrationFailed(e.to_string()))?;

        match err_rx.recv_timeout(self.startup_grace) {
            Err(RecvTimeoutError::Timeout) => Ok(()),
            Ok(message) => Err(AutomatorError::HotkeyRegistrationFailed(message)),
            Err(RecvTimeoutError::Disconnected) => Err(AutomatorError::HotkeyRegistrationFailed(
                "listener exited during startup".to_string(),
            )),
        }
    }
}

/// 把按键按下事件转发给当前订阅者，其余事件忽略
fn dispatch(subscriber: &ArcSwapOption<Subscriber>, event: &Event) {
    let EventType::KeyPress(key) = event.event_type else {
        return;
    };
    if let Some(subscriber) = subscriber.load_full() {
        (subscriber.callback)(to_key_code(key));
    }
}

impl KeyEventSource for RdevKeySource {
    fn subscribe(&mut self, callback: KeyCallback) -> Result<()> {
        self.subscriber.store(Some(Arc::new(Subscriber { callback })));
        if self.started {
            return Ok(());
        }

        if let Err(e) = self.spawn_listener() {
            self.subscriber.store(None);
            return Err(e);
        }
        self.started = true;
        tracing::debug!("Global key listener started");
        Ok(())
    }

    fn unsubscribe(&mut self) -> Result<()> {
        self.subscriber.store(None);
        tracing::debug!("Global key listener detached");
        Ok(())
    }
}
