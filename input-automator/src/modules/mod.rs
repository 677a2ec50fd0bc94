//! 平台模块
//!
//! 包含输入注入、全局按键监听、配置管理

pub mod config;
pub mod input;
pub mod shortcut;
