//! 测试用的记录型假实现

use crate::backend::{Clipboard, Injector, KeyCallback, KeyEventSource};
use crate::error::{AutomatorError, Result};
use crate::key::{KeyCode, MouseButton};
use crate::stop::StopSignal;
use crate::timing::Sleeper;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Press(KeyCode),
    Release(KeyCode),
    Move(i32, i32),
    ButtonDown(MouseButton),
    ButtonUp(MouseButton),
    Scroll(i32),
    Clipboard(String),
    Sleep(Duration),
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

pub fn new_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// 去掉睡眠事件，只保留注入事件
pub fn injected(log: &EventLog) -> Vec<Event> {
    log.lock()
        .iter()
        .filter(|e| !matches!(e, Event::Sleep(_)))
        .cloned()
        .collect()
}

pub fn sleeps(log: &EventLog) -> Vec<Duration> {
    log.lock()
        .iter()
        .filter_map(|e| match e {
            Event::Sleep(d) => Some(*d),
            _ => None,
        })
        .collect()
}

pub struct FakeInjector {
    log: EventLog,
    /// 记录到该事件时返回注入失败（该事件不记录）
    fail_on: Option<Event>,
}

impl FakeInjector {
    pub fn new(log: EventLog) -> Self {
        Self { log, fail_on: None }
    }

    pub fn failing_on(log: EventLog, event: Event) -> Self {
        Self { log, fail_on: Some(event) }
    }

    fn record(&mut self, event: Event) -> Result<()> {
        if self.fail_on.as_ref() == Some(&event) {
            return Err(AutomatorError::InjectionFailed(format!("{:?} rejected", event)));
        }
        self.log.lock().push(event);
        Ok(())
    }
}

impl Injector for FakeInjector {
    fn press_key(&mut self, key: KeyCode) -> Result<()> {
        self.record(Event::Press(key))
    }

    fn release_key(&mut self, key: KeyCode) -> Result<()> {
        self.record(Event::Release(key))
    }

    fn move_pointer(&mut self, x: i32, y: i32) -> Result<()> {
        self.record(Event::Move(x, y))
    }

    fn press_button(&mut self, button: MouseButton) -> Result<()> {
        self.record(Event::ButtonDown(button))
    }

    fn release_button(&mut self, button: MouseButton) -> Result<()> {
        self.record(Event::ButtonUp(button))
    }

    fn scroll_wheel(&mut self, notches: i32) -> Result<()> {
        self.record(Event::Scroll(notches))
    }
}

pub struct FakeClipboard {
    log: EventLog,
    fail: bool,
}

impl FakeClipboard {
    pub fn new(log: EventLog) -> Self {
        Self { log, fail: false }
    }

    pub fn failing(log: EventLog) -> Self {
        Self { log, fail: true }
    }
}

impl Clipboard for FakeClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.fail {
            return Err(AutomatorError::ClipboardFailed("clipboard locked".to_string()));
        }
        self.log.lock().push(Event::Clipboard(text.to_string()));
        Ok(())
    }
}

/// 只记录时长的睡眠器，可在第 n 次睡眠时触发停止信号
pub struct FakeSleeper {
    log: EventLog,
    trigger_after: Option<(usize, StopSignal)>,
    count: Mutex<usize>,
}

impl FakeSleeper {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            trigger_after: None,
            count: Mutex::new(0),
        }
    }

    pub fn triggering_after(log: EventLog, sleeps: usize, signal: StopSignal) -> Self {
        Self {
            log,
            trigger_after: Some((sleeps, signal)),
            count: Mutex::new(0),
        }
    }
}

impl Sleeper for FakeSleeper {
    fn sleep(&self, duration: Duration) {
        self.log.lock().push(Event::Sleep(duration));
        let mut count = self.count.lock();
        *count += 1;
        if let Some((after, signal)) = &self.trigger_after {
            if *count == *after {
                signal.trigger();
            }
        }
    }
}

#[derive(Default)]
pub struct SourceState {
    pub callback: Option<KeyCallback>,
    pub unsubscribed: bool,
}

/// 可手动投递按键事件的事件源
#[derive(Clone, Default)]
pub struct FakeKeySource {
    pub state: Arc<Mutex<SourceState>>,
    pub fail_subscribe: bool,
    pub fail_unsubscribe: bool,
}

impl FakeKeySource {
    pub fn emit(&self, code: KeyCode) {
        let callback = self.state.lock().callback.clone();
        if let Some(callback) = callback {
            callback(code);
        }
    }
}

impl KeyEventSource for FakeKeySource {
    fn subscribe(&mut self, callback: KeyCallback) -> Result<()> {
        if self.fail_subscribe {
            return Err(AutomatorError::HotkeyRegistrationFailed("hook denied".to_string()));
        }
        self.state.lock().callback = Some(callback);
        Ok(())
    }

    fn unsubscribe(&mut self) -> Result<()> {
        let mut state = self.state.lock();
        state.unsubscribed = true;
        state.callback = None;
        if self.fail_unsubscribe {
            return Err(AutomatorError::InjectionFailed("unhook failed".to_string()));
        }
        Ok(())
    }
}
