//! rdev 按键到按键代码的映射

use automator_core::KeyCode;
use rdev::Key;

/// 将 rdev 报告的按键转换为按键代码
///
/// 左右修饰键合并为同一个代码，`Unknown` 保留平台原始键码，
/// 因此每一次按键都有对应的代码。
pub fn to_key_code(key: Key) -> KeyCode {
    match key {
        Key::ControlLeft | Key::ControlRight => KeyCode::Control,
        Key::ShiftLeft | Key::ShiftRight => KeyCode::Shift,
        Key::Alt | Key::AltGr => KeyCode::Alt,
        Key::MetaLeft | Key::MetaRight => KeyCode::Meta,

        Key::Home => KeyCode::Home,
        Key::End => KeyCode::End,
        Key::PageUp => KeyCode::PageUp,
        Key::PageDown => KeyCode::PageDown,
        Key::UpArrow => KeyCode::UpArrow,
        Key::DownArrow => KeyCode::DownArrow,
        Key::LeftArrow => KeyCode::LeftArrow,
        Key::RightArrow => KeyCode::RightArrow,

        Key::Return => KeyCode::Return,
        Key::Tab => KeyCode::Tab,
        Key::Space => KeyCode::Space,
        Key::Backspace => KeyCode::Backspace,
        Key::Delete => KeyCode::Delete,
        Key::Escape => KeyCode::Escape,
        Key::CapsLock => KeyCode::CapsLock,
        Key::Insert => KeyCode::Insert,
        Key::PrintScreen => KeyCode::PrintScreen,
        Key::ScrollLock => KeyCode::ScrollLock,
        Key::Pause => KeyCode::Pause,
        Key::NumLock => KeyCode::NumLock,
        Key::Function => KeyCode::Function,
        Key::IntlBackslash => KeyCode::IntlBackslash,

        Key::Kp0 => KeyCode::Kp0,
        Key::Kp1 => KeyCode::Kp1,
        Key::Kp2 => KeyCode::Kp2,
        Key::Kp3 => KeyCode::Kp3,
        Key::Kp4 => KeyCode::Kp4,
        Key::Kp5 => KeyCode::Kp5,
        Key::Kp6 => KeyCode::Kp6,
        Key::Kp7 => KeyCode::Kp7,
        Key::Kp8 => KeyCode::Kp8,
        Key::Kp9 => KeyCode::Kp9,
        Key::KpReturn => KeyCode::KpReturn,
        Key::KpPlus => KeyCode::KpPlus,
        Key::KpMinus => KeyCode::KpMinus,
        Key::KpMultiply => KeyCode::KpMultiply,
        Key::KpDivide => KeyCode::KpDivide,
        Key::KpDelete => KeyCode::KpDelete,

        Key::F1 => KeyCode::F1,
        Key::F2 => KeyCode::F2,
        Key::F3 => KeyCode::F3,
        Key::F4 => KeyCode::F4,
        Key::F5 => KeyCode::F5,
        Key::F6 => KeyCode::F6,
        Key::F7 => KeyCode::F7,
        Key::F8 => KeyCode::F8,
        Key::F9 => KeyCode::F9,
        Key::F10 => KeyCode::F10,
        Key::F11 => KeyCode::F11,
        Key::F12 => KeyCode::F12,

        Key::KeyA => KeyCode::Char('a'),
        Key::KeyB => KeyCode::Char('b'),
        Key::KeyC => KeyCode::Char('c'),
        Key::KeyD => KeyCode::Char('d'),
        Key::KeyE => KeyCode::Char('e'),
        Key::KeyF => KeyCode::Char('f'),
        Key::KeyG => KeyCode::Char('g'),
        Key::KeyH => KeyCode::Char('h'),
        Key::KeyI => KeyCode::Char('i'),
        Key::KeyJ => KeyCode::Char('j'),
        Key::KeyK => KeyCode::Char('k'),
        Key::KeyL => KeyCode::Char('l'),
        Key::KeyM => KeyCode::Char('m'),
        Key::KeyN => KeyCode::Char('n'),
        Key::KeyO => KeyCode::Char('o'),
        Key::KeyP => KeyCode::Char('p'),
        Key::KeyQ => KeyCode::Char('q'),
        Key::KeyR => KeyCode::Char('r'),
        Key::KeyS => KeyCode::Char('s'),
        Key::KeyT => KeyCode::Char('t'),
        Key::KeyU => KeyCode::Char('u'),
        Key::KeyV => KeyCode::Char('v'),
        Key::KeyW => KeyCode::Char('w'),
        Key::KeyX => KeyCode::Char('x'),
        Key::KeyY => KeyCode::Char('y'),
        Key::KeyZ => KeyCode::Char('z'),

        Key::Num0 => KeyCode::Char('0'),
        Key::Num1 => KeyCode::Char('1'),
        Key::Num2 => KeyCode::Char('2'),
        Key::Num3 => KeyCode::Char('3'),
        Key::Num4 => KeyCode::Char('4'),
        Key::Num5 => KeyCode::Char('5'),
        Key::Num6 => KeyCode::Char('6'),
        Key::Num7 => KeyCode::Char('7'),
        Key::Num8 => KeyCode::Char('8'),
        Key::Num9 => KeyCode::Char('9'),

        Key::BackQuote => KeyCode::Char('`'),
        Key::Minus => KeyCode::Char('-'),
        Key::Equal => KeyCode::Char('='),
        Key::LeftBracket => KeyCode::Char('['),
        Key::RightBracket => KeyCode::Char(']'),
        Key::BackSlash => KeyCode::Char('\\'),
        Key::SemiColon => KeyCode::Char(';'),
        Key::Quote => KeyCode::Char('\''),
        Key::Comma => KeyCode::Char(','),
        Key::Dot => KeyCode::Char('.'),
        Key::Slash => KeyCode::Char('/'),

        Key::Unknown(code) => KeyCode::Raw(code),
    }
}
