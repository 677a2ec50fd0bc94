//! 输入自动化平台层
//!
//! 以 enigo、arboard、rdev 实现核心库的注入器、剪贴板和全局按键事件源，
//! 并根据配置组装可用的自动化器。

mod error;
mod modules;

use anyhow::Result;
use std::path::PathBuf;

pub use automator_core::{
    AutomatorError, Chord, InputAutomator, KeyCode, ListenerState, MouseButton, ScrollDirection,
    StopKey, StopSignal, Timing,
};
pub use error::{AppError, ConfigError, ErrorCode};
pub use modules::config::{AutomatorConfig, ConfigManager, StopSettings, default_config_dir};
pub use modules::input::{ArboardClipboard, EnigoInjector};
pub use modules::shortcut::RdevKeySource;

/// 平台自动化器
pub type Automator = InputAutomator<EnigoInjector, ArboardClipboard>;

/// 初始化日志并确保配置目录存在，返回配置目录
pub fn init_app() -> Result<PathBuf> {
    use tracing_subscriber::fmt;
    // 已有全局订阅者时保持原样
    let _ = fmt().try_init();

    let config_dir = default_config_dir();
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
    }
    Ok(config_dir)
}

/// 按配置创建自动化器
///
/// 获取默认显示器上的注入能力；
/// 配置了停止键时在返回前完成全局监听注册。
pub fn launch(config: &AutomatorConfig) -> std::result::Result<Automator, AppError> {
    let stop_key = config.stop_key()?;

    let injector = EnigoInjector::new()?;
    let mut automator = InputAutomator::new(injector, ArboardClipboard::new(), config.timing);

    if let Some(stop_key) = stop_key {
        automator.arm_stop_key(Box::new(RdevKeySource::new()), stop_key)?;
    }

    tracing::info!(
        "Input automator ready (press settle {} ms, release settle {} ms)",
        config.timing.press_settle_ms,
        config.timing.release_settle_ms
    );
    Ok(automator)
}

/// 从默认配置目录读取配置并创建自动化器
pub fn launch_default() -> std::result::Result<Automator, AppError> {
    let manager = ConfigManager::default();
    let config = manager.load()?;
    launch(&config)
}
