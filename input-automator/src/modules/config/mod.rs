//! 配置模块

pub mod manager;

pub use manager::{AutomatorConfig, ConfigManager, StopSettings, default_config_dir};
