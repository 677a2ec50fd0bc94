//! 键盘模拟模块
//!
//! 使用 enigo 库进行键盘输入模拟

use automator_core::{AutomatorError, Injector, KeyCode, MouseButton, Result};
use enigo::{Direction, Enigo, Key, Keyboard, Settings};

/// 基于 enigo 的输入注入器
///
/// 键盘与鼠标共用同一个 enigo 实例。
pub struct EnigoInjector {
    pub(super) enigo: Enigo,
}

impl std::fmt::Debug for EnigoInjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnigoInjector").finish_non_exhaustive()
    }
}

impl EnigoInjector {
    /// 获取默认显示器上的注入能力
    pub fn new() -> Result<Self> {
        Self::with_settings(&Settings::default())
    }

    pub fn with_settings(settings: &Settings) -> Result<Self> {
        match Enigo::new(settings) {
            Ok(enigo) => {
                tracing::info!("Input injector initialized successfully");
                Ok(Self { enigo })
            }
            Err(e) => {
                tracing::warn!("Failed to create Enigo instance: {:?}", e);
                Err(AutomatorError::InjectorUnavailable(e.to_string()))
            }
        }
    }

    fn key(&mut self, key: KeyCode, direction: Direction) -> Result<()> {
        let enigo_key = to_enigo_key(key).ok_or_else(|| {
            AutomatorError::InjectionFailed(format!("{} is not available on this platform", key))
        })?;
        self.enigo.key(enigo_key, direction).map_err(|e| {
            AutomatorError::InjectionFailed(format!("{:?} {}: {}", direction, key, e))
        })
    }
}

impl Injector for EnigoInjector {
    fn press_key(&mut self, key: KeyCode) -> Result<()> {
        self.key(key, Direction::Press)
    }

    fn release_key(&mut self, key: KeyCode) -> Result<()> {
        self.key(key, Direction::Release)
    }

    fn move_pointer(&mut self, x: i32, y: i32) -> Result<()> {
        self.mouse_move(x, y)
    }

    fn press_button(&mut self, button: MouseButton) -> Result<()> {
        self.mouse_button(button, Direction::Press)
    }

    fn release_button(&mut self, button: MouseButton) -> Result<()> {
        self.mouse_button(button, Direction::Release)
    }

    fn scroll_wheel(&mut self, notches: i32) -> Result<()> {
        self.mouse_scroll(notches)
    }
}

/// 平台原生键码，用于 enigo 没有跨平台名称的按键
#[cfg(target_os = "windows")]
mod native {
    pub const INSERT: u32 = 0x2D;
    pub const PRINT_SCREEN: u32 = 0x2C;
    pub const SCROLL_LOCK: u32 = 0x91;
    pub const PAUSE: u32 = 0x13;
    pub const NUM_LOCK: u32 = 0x90;
    pub const INTL_BACKSLASH: u32 = 0xE2;
    pub const KEYPAD_DIGITS: [u32; 10] =
        [0x60, 0x61, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69];
    pub const KP_RETURN: u32 = 0x0D;
    pub const KP_PLUS: u32 = 0x6B;
    pub const KP_MINUS: u32 = 0x6D;
    pub const KP_MULTIPLY: u32 = 0x6A;
    pub const KP_DIVIDE: u32 = 0x6F;
    pub const KP_DELETE: u32 = 0x6E;
}

#[cfg(target_os = "macos")]
mod native {
    // Help / F13 / F14 / F15 占据 Insert、PrintScreen、ScrollLock、Pause 的位置
    pub const INSERT: u32 = 0x72;
    pub const PRINT_SCREEN: u32 = 0x69;
    pub const SCROLL_LOCK: u32 = 0x6B;
    pub const PAUSE: u32 = 0x71;
    pub const NUM_LOCK: u32 = 0x47;
    pub const INTL_BACKSLASH: u32 = 0x0A;
    pub const KEYPAD_DIGITS: [u32; 10] =
        [0x52, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5B, 0x5C];
    pub const KP_RETURN: u32 = 0x4C;
    pub const KP_PLUS: u32 = 0x45;
    pub const KP_MINUS: u32 = 0x4E;
    pub const KP_MULTIPLY: u32 = 0x43;
    pub const KP_DIVIDE: u32 = 0x4B;
    pub const KP_DELETE: u32 = 0x41;
}

/// X11 keysym
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
mod native {
    pub const INSERT: u32 = 0xFF63;
    pub const PRINT_SCREEN: u32 = 0xFF61;
    pub const SCROLL_LOCK: u32 = 0xFF14;
    pub const PAUSE: u32 = 0xFF13;
    pub const NUM_LOCK: u32 = 0xFF7F;
    pub const INTL_BACKSLASH: u32 = 0x003C;
    pub const KEYPAD_DIGITS: [u32; 10] = [
        0xFFB0, 0xFFB1, 0xFFB2, 0xFFB3, 0xFFB4, 0xFFB5, 0xFFB6, 0xFFB7, 0xFFB8, 0xFFB9,
    ];
    pub const KP_RETURN: u32 = 0xFF8D;
    pub const KP_PLUS: u32 = 0xFFAB;
    pub const KP_MINUS: u32 = 0xFFAD;
    pub const KP_MULTIPLY: u32 = 0xFFAA;
    pub const KP_DIVIDE: u32 = 0xFFAF;
    pub const KP_DELETE: u32 = 0xFF9F;
}

/// 将按键代码转换为 enigo 键
///
/// 当前平台无法模拟的键（例如 Windows 与 Linux 上的 fn 键）返回 `None`。
pub fn to_enigo_key(key: KeyCode) -> Option<Key> {
    let enigo_key = match key {
        KeyCode::Control => Key::Control,
        KeyCode::Shift => Key::Shift,
        KeyCode::Alt => Key::Alt,
        KeyCode::Meta => Key::Meta,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::UpArrow => Key::UpArrow,
        KeyCode::DownArrow => Key::DownArrow,
        KeyCode::LeftArrow => Key::LeftArrow,
        KeyCode::RightArrow => Key::RightArrow,
        KeyCode::Return => Key::Return,
        KeyCode::Tab => Key::Tab,
        KeyCode::Space => Key::Space,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Escape => Key::Escape,
        KeyCode::CapsLock => Key::CapsLock,
        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,

        KeyCode::Insert => Key::Other(native::INSERT),
        KeyCode::PrintScreen => Key::Other(native::PRINT_SCREEN),
        KeyCode::ScrollLock => Key::Other(native::SCROLL_LOCK),
        KeyCode::Pause => Key::Other(native::PAUSE),
        KeyCode::NumLock => Key::Other(native::NUM_LOCK),
        KeyCode::IntlBackslash => Key::Other(native::INTL_BACKSLASH),
        #[cfg(target_os = "macos")]
        KeyCode::Function => Key::Function,
        #[cfg(not(target_os = "macos"))]
        KeyCode::Function => return None,

        KeyCode::Kp0 => Key::Other(native::KEYPAD_DIGITS[0]),
        KeyCode::Kp1 => Key::Other(native::KEYPAD_DIGITS[1]),
        KeyCode::Kp2 => Key::Other(native::KEYPAD_DIGITS[2]),
        KeyCode::Kp3 => Key::Other(native::KEYPAD_DIGITS[3]),
        KeyCode::Kp4 => Key::Other(native::KEYPAD_DIGITS[4]),
        KeyCode::Kp5 => Key::Other(native::KEYPAD_DIGITS[5]),
        KeyCode::Kp6 => Key::Other(native::KEYPAD_DIGITS[6]),
        KeyCode::Kp7 => Key::Other(native::KEYPAD_DIGITS[7]),
        KeyCode::Kp8 => Key::Other(native::KEYPAD_DIGITS[8]),
        KeyCode::Kp9 => Key::Other(native::KEYPAD_DIGITS[9]),
        KeyCode::KpReturn => Key::Other(native::KP_RETURN),
        KeyCode::KpPlus => Key::Other(native::KP_PLUS),
        KeyCode::KpMinus => Key::Other(native::KP_MINUS),
        KeyCode::KpMultiply => Key::Other(native::KP_MULTIPLY),
        KeyCode::KpDivide => Key::Other(native::KP_DIVIDE),
        KeyCode::KpDelete => Key::Other(native::KP_DELETE),

        KeyCode::Char(c) => Key::Unicode(c),
        // 原始键码不做校验，由平台决定是否接受
        KeyCode::Raw(code) => Key::Other(code),
    };
    Some(enigo_key)
}
