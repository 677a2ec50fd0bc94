//! 全局按键监听模块

pub mod keymap;
pub mod listener;

pub use listener::RdevKeySource;
