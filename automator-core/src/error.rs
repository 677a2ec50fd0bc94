//! 自动化错误类型定义

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AutomatorError>;

/// 自动化统一错误类型
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutomatorError {
    /// 无法获取输入注入能力（无显示器、无权限）
    #[error("Input injector unavailable: {0}")]
    InjectorUnavailable(String),

    /// 全局按键监听注册失败
    #[error("Failed to register stop key listener: {0}")]
    HotkeyRegistrationFailed(String),

    /// 滚动速率必须为正数
    #[error("Invalid scroll rate: {0} (must be > 0)")]
    InvalidRate(f64),

    /// 平台注入失败，原样上抛
    #[error("Injection failed: {0}")]
    InjectionFailed(String),

    #[error("Clipboard operation failed: {0}")]
    ClipboardFailed(String),

    #[error("Chord must contain at least one key")]
    EmptyChord,

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// 停止键已触发
    #[error("Automation cancelled by stop key")]
    Cancelled,

    #[error("Automator already shut down")]
    AlreadyShutdown,
}

impl AutomatorError {
    /// 是否发生在构造阶段
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            AutomatorError::InjectorUnavailable(_) | AutomatorError::HotkeyRegistrationFailed(_)
        )
    }
}
