//! 输入自动化器
//!
//! 在一个注入器之上按固定稳定延迟编排组合操作：组合键、定速滚动、
//! 选中当前行、经剪贴板粘贴。所有操作在调用线程上同步阻塞执行。

use crate::backend::{Clipboard, Injector, KeyEventSource};
use crate::error::{AutomatorError, Result};
use crate::key::{KeyCode, MouseButton};
use crate::stop::{StopKey, StopSignal, stop_key_callback};
use crate::timing::{Sleeper, ThreadSleeper, Timing};
use std::time::Duration;
use tracing::{debug, info, warn};

const MILLIS_IN_SECOND: f64 = 1000.0;

/// 滚动方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Down,
    Up,
}

impl ScrollDirection {
    /// 单格滚动量，向上是向下的取反
    pub fn notch(self) -> i32 {
        match self {
            ScrollDirection::Down => 1,
            ScrollDirection::Up => -ScrollDirection::Down.notch(),
        }
    }
}

/// 输入自动化器
///
/// 同一实例只能在一个线程上使用；多个实例并发驱动同一个系统注入器的
/// 行为由调用方负责。停止键触发后，所有后续操作返回 `Cancelled`。
pub struct InputAutomator<I, C, S = ThreadSleeper> {
    injector: I,
    clipboard: C,
    sleeper: S,
    timing: Timing,
    stop: StopSignal,
    key_source: Option<Box<dyn KeyEventSource>>,
    shut_down: bool,
}

impl<I, C> InputAutomator<I, C, ThreadSleeper>
where
    I: Injector,
    C: Clipboard,
{
    /// 使用真实睡眠创建自动化器
    pub fn new(injector: I, clipboard: C, timing: Timing) -> Self {
        Self::with_sleeper(injector, clipboard, ThreadSleeper, timing)
    }
}

impl<I, C, S> InputAutomator<I, C, S> {
    pub fn with_sleeper(injector: I, clipboard: C, sleeper: S, timing: Timing) -> Self {
        Self {
            injector,
            clipboard,
            sleeper,
            timing,
            stop: StopSignal::new(),
            key_source: None,
            shut_down: false,
        }
    }

    /// 使用外部共享的取消信号
    pub fn with_stop_signal(mut self, signal: StopSignal) -> Self {
        self.stop = signal;
        self
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// 取消信号的克隆，可用于观察或从其他线程取消
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn is_stop_armed(&self) -> bool {
        self.key_source.is_some()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// 订阅全局按键事件源，按下停止键时触发取消信号
    pub fn arm_stop_key(
        &mut self,
        mut source: Box<dyn KeyEventSource>,
        stop_key: StopKey,
    ) -> Result<()> {
        if self.shut_down {
            return Err(AutomatorError::AlreadyShutdown);
        }
        self.detach_key_source();

        source.subscribe(stop_key_callback(stop_key, self.stop.clone()))?;
        self.key_source = Some(source);
        info!(
            "Stop key listener armed: {} (verbose: {})",
            stop_key.code, stop_key.verbose
        );
        Ok(())
    }

    /// 结束会话
    ///
    /// 取消订阅按键事件源（失败只记录日志），之后任何操作都返回
    /// `AlreadyShutdown`。不会结束进程。
    pub fn shutdown(&mut self) -> Result<()> {
        if self.shut_down {
            return Err(AutomatorError::AlreadyShutdown);
        }
        self.shut_down = true;
        self.detach_key_source();
        info!("Input automator shut down");
        Ok(())
    }

    fn detach_key_source(&mut self) {
        if let Some(mut source) = self.key_source.take() {
            if let Err(e) = source.unsubscribe() {
                warn!("Failed to unsubscribe stop key listener: {}", e);
            }
        }
    }

    fn ensure_active(&self) -> Result<()> {
        if self.shut_down {
            return Err(AutomatorError::AlreadyShutdown);
        }
        if self.stop.is_triggered() {
            return Err(AutomatorError::Cancelled);
        }
        Ok(())
    }
}

impl<I, C, S> InputAutomator<I, C, S>
where
    I: Injector,
    C: Clipboard,
    S: Sleeper,
{
    /// 按下一个键并等待按下稳定延迟
    pub fn press(&mut self, key: KeyCode) -> Result<()> {
        self.ensure_active()?;
        debug!("press key {}", key);
        self.injector.press_key(key)?;
        self.sleeper.sleep(self.timing.press_settle());
        Ok(())
    }

    /// 释放一个键并等待释放稳定延迟
    ///
    /// 停止键触发后仍然可用，便于调用方在注入失败后恢复按键状态。
    pub fn release(&mut self, key: KeyCode) -> Result<()> {
        if self.shut_down {
            return Err(AutomatorError::AlreadyShutdown);
        }
        self.release_step(key)
    }

    fn release_step(&mut self, key: KeyCode) -> Result<()> {
        debug!("release key {}", key);
        self.injector.release_key(key)?;
        self.sleeper.sleep(self.timing.release_settle());
        Ok(())
    }

    fn release_reversed(&mut self, keys: &[KeyCode]) -> Result<()> {
        for key in keys.iter().rev() {
            self.release_step(*key)?;
        }
        Ok(())
    }

    pub fn press_and_release(&mut self, key: KeyCode) -> Result<()> {
        self.press(key)?;
        self.release_step(key)
    }

    /// 按顺序按下全部键，再逆序释放
    ///
    /// 按下阶段被停止键取消时，已按下的键会逆序释放后再返回 `Cancelled`。
    /// 注入失败则原样返回，已按下的键保持按下状态。
    pub fn press_chord(&mut self, keys: &[KeyCode]) -> Result<()> {
        self.ensure_active()?;
        if keys.is_empty() {
            return Err(AutomatorError::EmptyChord);
        }

        for (pressed, key) in keys.iter().enumerate() {
            if let Err(e) = self.press(*key) {
                if e == AutomatorError::Cancelled {
                    self.release_reversed(&keys[..pressed])?;
                }
                return Err(e);
            }
        }
        self.release_reversed(keys)
    }

    /// 两键组合：`main` 先按后放，`second` 后按先放
    #[deprecated(note = "use `press_chord`")]
    pub fn press_pair(&mut self, main: KeyCode, second: KeyCode) -> Result<()> {
        self.press_chord(&[main, second])
    }

    /// Ctrl+V
    pub fn paste_chord(&mut self) -> Result<()> {
        self.press_chord(&[KeyCode::Control, KeyCode::V])
    }

    /// 把文本写入剪贴板后粘贴
    ///
    /// 剪贴板原有内容会被替换且不会恢复。
    pub fn paste_text(&mut self, text: &str) -> Result<()> {
        self.ensure_active()?;
        debug!("set clipboard text ({} chars)", text.chars().count());
        self.clipboard.set_text(text)?;
        self.paste_chord()
    }

    /// 在文本编辑器中选中当前整行：Home，按住 Shift，End，松开 Shift
    pub fn select_current_line(&mut self) -> Result<()> {
        self.press_and_release(KeyCode::Home)?;
        self.press(KeyCode::Shift)?;
        if let Err(e) = self.press_and_release(KeyCode::End) {
            if e == AutomatorError::Cancelled {
                self.release_step(KeyCode::Shift)?;
            }
            return Err(e);
        }
        self.release_step(KeyCode::Shift)
    }

    /// 一次性滚动，正数向下
    pub fn scroll_by(&mut self, steps: i32) -> Result<()> {
        self.ensure_active()?;
        debug!("scroll wheel {}", steps);
        self.injector.scroll_wheel(steps)
    }

    pub fn scroll_down(&mut self, steps: i32) -> Result<()> {
        self.scroll_by(steps)
    }

    pub fn scroll_up(&mut self, steps: i32) -> Result<()> {
        self.scroll_by(steps.saturating_neg())
    }

    /// 以每秒 `rate_per_second` 格的速度滚动 `steps` 格
    ///
    /// 每格之后（包括最后一格）睡眠 `1000 / rate` 毫秒。
    pub fn scroll_at(
        &mut self,
        steps: u32,
        rate_per_second: f64,
        direction: ScrollDirection,
    ) -> Result<()> {
        if rate_per_second.is_nan() || rate_per_second <= 0.0 {
            return Err(AutomatorError::InvalidRate(rate_per_second));
        }
        self.ensure_active()?;

        let interval = Duration::from_millis((MILLIS_IN_SECOND / rate_per_second) as u64);
        let notch = direction.notch();
        for _ in 0..steps {
            self.scroll_by(notch)?;
            self.sleeper.sleep(interval);
        }
        Ok(())
    }

    /// 绝对坐标移动
    pub fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
        self.ensure_active()?;
        debug!("move pointer to ({}, {})", x, y);
        self.injector.move_pointer(x, y)
    }

    pub fn click_at(&mut self, x: i32, y: i32) -> Result<()> {
        self.move_to(x, y)?;
        self.click_left_button()
    }

    pub fn click_left_button(&mut self) -> Result<()> {
        self.click_button(MouseButton::Left)
    }

    pub fn click_button(&mut self, button: MouseButton) -> Result<()> {
        self.ensure_active()?;
        debug!("click {:?} button", button);
        self.injector.press_button(button)?;
        self.sleeper.sleep(self.timing.press_settle());
        self.injector.release_button(button)?;
        self.sleeper.sleep(self.timing.release_settle());
        Ok(())
    }
}

impl<I, C, S> Drop for InputAutomator<I, C, S> {
    fn drop(&mut self) {
        self.detach_key_source();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ListenerState;
    use crate::mock::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type TestAutomator = InputAutomator<FakeInjector, FakeClipboard, FakeSleeper>;

    fn automator(log: &EventLog) -> TestAutomator {
        InputAutomator::with_sleeper(
            FakeInjector::new(log.clone()),
            FakeClipboard::new(log.clone()),
            FakeSleeper::new(log.clone()),
            Timing::default(),
        )
    }

    /// 第 `sleeps` 次睡眠时触发停止信号
    fn cancelling_automator(log: &EventLog, sleeps: usize) -> TestAutomator {
        let signal = StopSignal::new();
        InputAutomator::with_sleeper(
            FakeInjector::new(log.clone()),
            FakeClipboard::new(log.clone()),
            FakeSleeper::triggering_after(log.clone(), sleeps, signal.clone()),
            Timing::default(),
        )
        .with_stop_signal(signal)
    }

    const PRESS: Duration = Duration::from_millis(100);
    const RELEASE: Duration = Duration::from_millis(240);

    #[test]
    fn test_press_and_release_settles() {
        let log = new_log();
        let mut automator = automator(&log);
        automator.press_and_release(KeyCode::Tab).unwrap();

        assert_eq!(
            *log.lock(),
            vec![
                Event::Press(KeyCode::Tab),
                Event::Sleep(PRESS),
                Event::Release(KeyCode::Tab),
                Event::Sleep(RELEASE),
            ]
        );
    }

    #[test]
    fn test_chord_presses_in_order_releases_in_reverse() {
        let pool = [
            KeyCode::Control,
            KeyCode::Shift,
            KeyCode::Alt,
            KeyCode::Char('k'),
            KeyCode::Control,
        ];
        for n in 1..=pool.len() {
            let keys = &pool[..n];
            let log = new_log();
            let mut automator = automator(&log);
            automator.press_chord(keys).unwrap();

            let mut expected: Vec<Event> = keys.iter().map(|k| Event::Press(*k)).collect();
            expected.extend(keys.iter().rev().map(|k| Event::Release(*k)));
            assert_eq!(injected(&log), expected, "chord of {} keys", n);

            let mut expected_sleeps = vec![PRESS; n];
            expected_sleeps.extend(vec![RELEASE; n]);
            assert_eq!(sleeps(&log), expected_sleeps);
        }
    }

    #[test]
    #[allow(deprecated)]
    fn test_pair_matches_two_key_chord() {
        let chord_log = new_log();
        automator(&chord_log)
            .press_chord(&[KeyCode::Alt, KeyCode::Tab])
            .unwrap();

        let pair_log = new_log();
        automator(&pair_log)
            .press_pair(KeyCode::Alt, KeyCode::Tab)
            .unwrap();

        assert_eq!(*chord_log.lock(), *pair_log.lock());
        assert_eq!(
            injected(&pair_log),
            vec![
                Event::Press(KeyCode::Alt),
                Event::Press(KeyCode::Tab),
                Event::Release(KeyCode::Tab),
                Event::Release(KeyCode::Alt),
            ]
        );
    }

    #[test]
    fn test_empty_chord_rejected() {
        let log = new_log();
        let result = automator(&log).press_chord(&[]);
        assert_eq!(result, Err(AutomatorError::EmptyChord));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_paste_text_writes_clipboard_before_chord() {
        let log = new_log();
        automator(&log).paste_text("hello").unwrap();

        assert_eq!(
            injected(&log),
            vec![
                Event::Clipboard("hello".to_string()),
                Event::Press(KeyCode::Control),
                Event::Press(KeyCode::V),
                Event::Release(KeyCode::V),
                Event::Release(KeyCode::Control),
            ]
        );
    }

    #[test]
    fn test_paste_text_clipboard_failure_skips_chord() {
        let log = new_log();
        let mut automator = InputAutomator::with_sleeper(
            FakeInjector::new(log.clone()),
            FakeClipboard::failing(log.clone()),
            FakeSleeper::new(log.clone()),
            Timing::default(),
        );
        let result = automator.paste_text("hello");
        assert!(matches!(result, Err(AutomatorError::ClipboardFailed(_))));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_select_current_line_sequence() {
        let log = new_log();
        automator(&log).select_current_line().unwrap();

        assert_eq!(
            injected(&log),
            vec![
                Event::Press(KeyCode::Home),
                Event::Release(KeyCode::Home),
                Event::Press(KeyCode::Shift),
                Event::Press(KeyCode::End),
                Event::Release(KeyCode::End),
                Event::Release(KeyCode::Shift),
            ]
        );
        assert_eq!(
            sleeps(&log),
            vec![PRESS, RELEASE, PRESS, PRESS, RELEASE, RELEASE]
        );
    }

    #[test]
    fn test_scroll_up_is_negated_down() {
        for n in [0, 1, 5, -3, 120] {
            let up_log = new_log();
            automator(&up_log).scroll_up(n).unwrap();

            let down_log = new_log();
            automator(&down_log).scroll_by(-n).unwrap();

            assert_eq!(*up_log.lock(), *down_log.lock());
            assert_eq!(*up_log.lock(), vec![Event::Scroll(-n)]);
        }
    }

    #[test]
    fn test_scroll_at_issues_single_notches() {
        let log = new_log();
        automator(&log)
            .scroll_at(5, 2.0, ScrollDirection::Down)
            .unwrap();
        assert_eq!(injected(&log), vec![Event::Scroll(1); 5]);
        assert_eq!(sleeps(&log), vec![Duration::from_millis(500); 5]);

        let log = new_log();
        automator(&log)
            .scroll_at(3, 4.0, ScrollDirection::Up)
            .unwrap();
        assert_eq!(injected(&log), vec![Event::Scroll(-1); 3]);
        assert_eq!(sleeps(&log), vec![Duration::from_millis(250); 3]);
    }

    #[test]
    fn test_scroll_at_truncates_interval() {
        let log = new_log();
        automator(&log)
            .scroll_at(1, 3.0, ScrollDirection::Down)
            .unwrap();
        assert_eq!(sleeps(&log), vec![Duration::from_millis(333)]);
    }

    #[test]
    fn test_scroll_at_rejects_non_positive_rate() {
        for rate in [0.0, -1.0, f64::NAN] {
            let log = new_log();
            let result = automator(&log).scroll_at(10, rate, ScrollDirection::Down);
            assert!(matches!(result, Err(AutomatorError::InvalidRate(_))));
            assert!(log.lock().is_empty());
        }
    }

    #[test]
    fn test_scroll_at_zero_steps() {
        let log = new_log();
        automator(&log)
            .scroll_at(0, 1.0, ScrollDirection::Down)
            .unwrap();
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_click_at_moves_before_click() {
        let log = new_log();
        automator(&log).click_at(-10, 5000).unwrap();

        assert_eq!(
            *log.lock(),
            vec![
                Event::Move(-10, 5000),
                Event::ButtonDown(MouseButton::Left),
                Event::Sleep(PRESS),
                Event::ButtonUp(MouseButton::Left),
                Event::Sleep(RELEASE),
            ]
        );
    }

    #[test]
    fn test_custom_timing() {
        let log = new_log();
        let mut automator = InputAutomator::with_sleeper(
            FakeInjector::new(log.clone()),
            FakeClipboard::new(log.clone()),
            FakeSleeper::new(log.clone()),
            Timing {
                press_settle_ms: 5,
                release_settle_ms: 7,
            },
        );
        automator.click_button(MouseButton::Right).unwrap();
        assert_eq!(
            sleeps(&log),
            vec![Duration::from_millis(5), Duration::from_millis(7)]
        );
    }

    #[test]
    fn test_injection_failure_leaves_chord_partial() {
        let log = new_log();
        let mut automator = InputAutomator::with_sleeper(
            FakeInjector::failing_on(log.clone(), Event::Press(KeyCode::V)),
            FakeClipboard::new(log.clone()),
            FakeSleeper::new(log.clone()),
            Timing::default(),
        );

        let result = automator.paste_chord();
        assert!(matches!(result, Err(AutomatorError::InjectionFailed(_))));
        assert_eq!(injected(&log), vec![Event::Press(KeyCode::Control)]);

        // 调用方自行恢复
        automator.release(KeyCode::Control).unwrap();
        assert_eq!(
            injected(&log),
            vec![Event::Press(KeyCode::Control), Event::Release(KeyCode::Control)]
        );
    }

    #[test]
    fn test_cancel_mid_chord_releases_pressed_keys() {
        let log = new_log();
        let mut automator = cancelling_automator(&log, 1);

        let chord = [KeyCode::Control, KeyCode::Shift, KeyCode::RightArrow];
        let result = automator.press_chord(&chord);
        assert_eq!(result, Err(AutomatorError::Cancelled));
        assert_eq!(
            injected(&log),
            vec![Event::Press(KeyCode::Control), Event::Release(KeyCode::Control)]
        );

        assert_eq!(automator.press_and_release(KeyCode::Tab), Err(AutomatorError::Cancelled));
        assert_eq!(automator.scroll_by(1), Err(AutomatorError::Cancelled));
        assert_eq!(automator.stop_signal().state(), ListenerState::Triggered);
    }

    #[test]
    fn test_cancel_during_selection_releases_shift() {
        let log = new_log();
        let mut automator = cancelling_automator(&log, 3);

        assert_eq!(automator.select_current_line(), Err(AutomatorError::Cancelled));
        assert_eq!(
            injected(&log),
            vec![
                Event::Press(KeyCode::Home),
                Event::Release(KeyCode::Home),
                Event::Press(KeyCode::Shift),
                Event::Release(KeyCode::Shift),
            ]
        );
    }

    #[test]
    fn test_cancel_during_release_phase_completes_chord() {
        let log = new_log();
        // 第三次睡眠是第一个释放之后
        let mut automator = cancelling_automator(&log, 3);

        automator.press_chord(&[KeyCode::Control, KeyCode::V]).unwrap();
        assert_eq!(injected(&log).len(), 4);
        assert_eq!(automator.paste_chord(), Err(AutomatorError::Cancelled));
    }

    #[test]
    fn test_cancel_stops_timed_scroll() {
        let log = new_log();
        let mut automator = cancelling_automator(&log, 2);

        let result = automator.scroll_at(10, 100.0, ScrollDirection::Down);
        assert_eq!(result, Err(AutomatorError::Cancelled));
        assert_eq!(injected(&log), vec![Event::Scroll(1); 2]);
    }

    #[test]
    fn test_stop_key_triggers_once() {
        let log = new_log();
        let mut automator = automator(&log);
        let source = FakeKeySource::default();
        automator
            .arm_stop_key(Box::new(source.clone()), StopKey::new(KeyCode::Escape).verbose(true))
            .unwrap();
        assert!(automator.is_stop_armed());

        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = fired.clone();
        automator.stop_signal().on_trigger(move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

        source.emit(KeyCode::Char('q'));
        assert_eq!(automator.stop_signal().state(), ListenerState::Armed);
        automator.press_and_release(KeyCode::Tab).unwrap();

        source.emit(KeyCode::Escape);
        source.emit(KeyCode::Escape);
        source.emit(KeyCode::Escape);

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(automator.stop_signal().state(), ListenerState::Triggered);
        assert_eq!(automator.press_and_release(KeyCode::Tab), Err(AutomatorError::Cancelled));
    }

    #[test]
    fn test_stop_key_registration_failure() {
        let log = new_log();
        let mut automator = automator(&log);
        let source = FakeKeySource {
            fail_subscribe: true,
            ..Default::default()
        };

        let result = automator.arm_stop_key(Box::new(source), StopKey::new(KeyCode::F12));
        assert!(matches!(result, Err(AutomatorError::HotkeyRegistrationFailed(_))));
        assert!(!automator.is_stop_armed());
    }

    #[test]
    fn test_shutdown_unsubscribes_and_blocks_reuse() {
        let log = new_log();
        let mut automator = automator(&log);
        let source = FakeKeySource::default();
        automator
            .arm_stop_key(Box::new(source.clone()), StopKey::new(KeyCode::Escape))
            .unwrap();

        automator.shutdown().unwrap();
        assert!(automator.is_shut_down());
        assert!(source.state.lock().unsubscribed);

        assert_eq!(automator.shutdown(), Err(AutomatorError::AlreadyShutdown));
        assert_eq!(automator.paste_text("x"), Err(AutomatorError::AlreadyShutdown));
        assert_eq!(automator.move_to(0, 0), Err(AutomatorError::AlreadyShutdown));
        assert_eq!(automator.release(KeyCode::Shift), Err(AutomatorError::AlreadyShutdown));
        assert_eq!(
            automator.arm_stop_key(Box::new(source), StopKey::new(KeyCode::Escape)),
            Err(AutomatorError::AlreadyShutdown)
        );
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_shutdown_tolerates_unsubscribe_failure() {
        let log = new_log();
        let mut automator = automator(&log);
        let source = FakeKeySource {
            fail_unsubscribe: true,
            ..Default::default()
        };
        automator
            .arm_stop_key(Box::new(source.clone()), StopKey::new(KeyCode::Escape))
            .unwrap();

        assert!(automator.shutdown().is_ok());
        assert!(source.state.lock().unsubscribed);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let log = new_log();
        let source = FakeKeySource::default();
        {
            let mut automator = automator(&log);
            automator
                .arm_stop_key(Box::new(source.clone()), StopKey::new(KeyCode::Escape))
                .unwrap();
        }
        assert!(source.state.lock().unsubscribed);
    }

    #[test]
    fn test_scroll_direction_notch() {
        assert_eq!(ScrollDirection::Down.notch(), 1);
        assert_eq!(ScrollDirection::Up.notch(), -1);
    }
}
