//! 按键、鼠标按钮与组合键模型

use crate::error::AutomatorError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// 按键代码
///
/// 核心不做校验：无法识别的代码原样交给注入器，由注入器报告失败。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    // 修饰键
    Control,
    Shift,
    Alt,
    Meta,

    // 导航键
    Home,
    End,
    PageUp,
    PageDown,
    UpArrow,
    DownArrow,
    LeftArrow,
    RightArrow,

    // 特殊键
    Return,
    Tab,
    Space,
    Backspace,
    Delete,
    Escape,
    CapsLock,
    Insert,
    PrintScreen,
    ScrollLock,
    Pause,
    NumLock,
    /// macOS 的 fn 键
    Function,
    /// ISO 键盘上左 Shift 旁边的键
    IntlBackslash,

    // 小键盘
    Kp0,
    Kp1,
    Kp2,
    Kp3,
    Kp4,
    Kp5,
    Kp6,
    Kp7,
    Kp8,
    Kp9,
    KpReturn,
    KpPlus,
    KpMinus,
    KpMultiply,
    KpDivide,
    KpDelete,

    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    /// 布局字符
    Char(char),
    /// 平台原始键码
    Raw(u32),
}

impl KeyCode {
    /// Ctrl+V 中的 V
    pub const V: KeyCode = KeyCode::Char('v');
}

impl FromStr for KeyCode {
    type Err = AutomatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_lowercase();
        let key = match lower.as_str() {
            "shift" | "lshift" => KeyCode::Shift,
            "control" | "ctrl" | "lcontrol" => KeyCode::Control,
            "alt" | "option" | "lalt" => KeyCode::Alt,
            "meta" | "command" | "cmd" | "win" | "super" => KeyCode::Meta,

            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "up" | "uparrow" => KeyCode::UpArrow,
            "down" | "downarrow" => KeyCode::DownArrow,
            "left" | "leftarrow" => KeyCode::LeftArrow,
            "right" | "rightarrow" => KeyCode::RightArrow,

            "return" | "enter" => KeyCode::Return,
            "tab" => KeyCode::Tab,
            "space" => KeyCode::Space,
            "backspace" | "bs" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "escape" | "esc" => KeyCode::Escape,
            "capslock" | "caps" => KeyCode::CapsLock,
            "insert" | "ins" => KeyCode::Insert,
            "printscreen" | "prtsc" | "print" => KeyCode::PrintScreen,
            "scrolllock" | "scrlk" => KeyCode::ScrollLock,
            "pause" | "break" => KeyCode::Pause,
            "numlock" => KeyCode::NumLock,
            "function" | "fn" => KeyCode::Function,
            "intlbackslash" => KeyCode::IntlBackslash,

            "kp0" | "numpad0" => KeyCode::Kp0,
            "kp1" | "numpad1" => KeyCode::Kp1,
            "kp2" | "numpad2" => KeyCode::Kp2,
            "kp3" | "numpad3" => KeyCode::Kp3,
            "kp4" | "numpad4" => KeyCode::Kp4,
            "kp5" | "numpad5" => KeyCode::Kp5,
            "kp6" | "numpad6" => KeyCode::Kp6,
            "kp7" | "numpad7" => KeyCode::Kp7,
            "kp8" | "numpad8" => KeyCode::Kp8,
            "kp9" | "numpad9" => KeyCode::Kp9,
            "kpreturn" | "kpenter" => KeyCode::KpReturn,
            "kpplus" | "kpadd" => KeyCode::KpPlus,
            "kpminus" | "kpsubtract" => KeyCode::KpMinus,
            "kpmultiply" => KeyCode::KpMultiply,
            "kpdivide" => KeyCode::KpDivide,
            "kpdelete" | "kpdecimal" => KeyCode::KpDelete,

            "f1" => KeyCode::F1,
            "f2" => KeyCode::F2,
            "f3" => KeyCode::F3,
            "f4" => KeyCode::F4,
            "f5" => KeyCode::F5,
            "f6" => KeyCode::F6,
            "f7" => KeyCode::F7,
            "f8" => KeyCode::F8,
            "f9" => KeyCode::F9,
            "f10" => KeyCode::F10,
            "f11" => KeyCode::F11,
            "f12" => KeyCode::F12,

            other => {
                if let Some(code) = other.strip_prefix("raw:") {
                    let code = code
                        .trim()
                        .parse::<u32>()
                        .map_err(|_| AutomatorError::InvalidKey(trimmed.to_string()))?;
                    return Ok(KeyCode::Raw(code));
                }
                if let Some(point) = other.strip_prefix("char:") {
                    return point
                        .trim()
                        .parse::<u32>()
                        .ok()
                        .and_then(char::from_u32)
                        .map(KeyCode::Char)
                        .ok_or_else(|| AutomatorError::InvalidKey(trimmed.to_string()));
                }
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return Err(AutomatorError::InvalidKey(trimmed.to_string())),
                }
            }
        };
        Ok(key)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char(c) if needs_escape(*c) => write!(f, "char:{}", u32::from(*c)),
            KeyCode::Char(c) => write!(f, "{}", c),
            KeyCode::Raw(code) => write!(f, "raw:{}", code),
            other => write!(f, "{:?}", other),
        }
    }
}

/// 无法按原样写进组合键字符串的字符：分隔符、空白、控制字符和大写字母
fn needs_escape(c: char) -> bool {
    c == '+' || c.is_whitespace() || c.is_control() || !c.to_lowercase().eq(std::iter::once(c))
}

/// 鼠标按钮
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// 组合键
///
/// 按顺序按下，逆序释放。重复的键不会被去重。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<KeyCode>", into = "Vec<KeyCode>")]
pub struct Chord(Vec<KeyCode>);

impl Chord {
    pub fn new(keys: Vec<KeyCode>) -> Result<Self, AutomatorError> {
        if keys.is_empty() {
            return Err(AutomatorError::EmptyChord);
        }
        Ok(Self(keys))
    }

    pub fn keys(&self) -> &[KeyCode] {
        &self.0
    }
}

impl TryFrom<Vec<KeyCode>> for Chord {
    type Error = AutomatorError;

    fn try_from(keys: Vec<KeyCode>) -> Result<Self, Self::Error> {
        Chord::new(keys)
    }
}

impl From<Chord> for Vec<KeyCode> {
    fn from(chord: Chord) -> Self {
        chord.0
    }
}

impl Deref for Chord {
    type Target = [KeyCode];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// 解析 "ctrl+shift+right" 形式的组合键
impl FromStr for Chord {
    type Err = AutomatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(AutomatorError::EmptyChord);
        }
        let keys = s
            .split('+')
            .map(str::parse::<KeyCode>)
            .collect::<Result<Vec<_>, _>>()?;
        Chord::new(keys)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("+"))
    }
}
