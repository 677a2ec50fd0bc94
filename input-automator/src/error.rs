//! 应用错误类型定义
//!
//! 核心错误与配置错误统一在此汇总，使用 thiserror 自动派生 Error trait

use automator_core::AutomatorError;
use thiserror::Error;

/// 应用统一错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 自动化相关错误
    #[error(transparent)]
    Automator(#[from] AutomatorError),

    /// 配置相关错误
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// 错误代码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // 构造错误 1xxx
    InjectorUnavailable,
    HotkeyRegistrationFailed,

    // 调用错误 2xxx
    InvalidRate,
    InjectionFailed,
    ClipboardFailed,
    InvalidKey,

    // 会话错误 3xxx
    Cancelled,
    AlreadyShutdown,

    // 配置错误 4xxx
    ConfigLoadFailed,
    ConfigSaveFailed,
    ConfigValidationFailed,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::InjectorUnavailable => write!(f, "INJECTOR_UNAVAILABLE"),
            ErrorCode::HotkeyRegistrationFailed => write!(f, "HOTKEY_REGISTRATION_FAILED"),
            ErrorCode::InvalidRate => write!(f, "INVALID_RATE"),
            ErrorCode::InjectionFailed => write!(f, "INJECTION_FAILED"),
            ErrorCode::ClipboardFailed => write!(f, "CLIPBOARD_FAILED"),
            ErrorCode::InvalidKey => write!(f, "INVALID_KEY"),
            ErrorCode::Cancelled => write!(f, "CANCELLED"),
            ErrorCode::AlreadyShutdown => write!(f, "ALREADY_SHUTDOWN"),
            ErrorCode::ConfigLoadFailed => write!(f, "CONFIG_LOAD_FAILED"),
            ErrorCode::ConfigSaveFailed => write!(f, "CONFIG_SAVE_FAILED"),
            ErrorCode::ConfigValidationFailed => write!(f, "CONFIG_VALIDATION_FAILED"),
        }
    }
}

/// 配置相关错误
#[derive(Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

impl AppError {
    /// 获取对应的错误代码
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Automator(e) => match e {
                AutomatorError::InjectorUnavailable(_) => ErrorCode::InjectorUnavailable,
                AutomatorError::HotkeyRegistrationFailed(_) => ErrorCode::HotkeyRegistrationFailed,
                AutomatorError::InvalidRate(_) => ErrorCode::InvalidRate,
                AutomatorError::InjectionFailed(_) => ErrorCode::InjectionFailed,
                AutomatorError::ClipboardFailed(_) => ErrorCode::ClipboardFailed,
                AutomatorError::EmptyChord | AutomatorError::InvalidKey(_) => ErrorCode::InvalidKey,
                AutomatorError::Cancelled => ErrorCode::Cancelled,
                AutomatorError::AlreadyShutdown => ErrorCode::AlreadyShutdown,
            },
            AppError::Config(e) => match e {
                ConfigError::LoadFailed(_) => ErrorCode::ConfigLoadFailed,
                ConfigError::SaveFailed(_) => ErrorCode::ConfigSaveFailed,
                ConfigError::ValidationFailed(_) => ErrorCode::ConfigValidationFailed,
            },
        }
    }

    /// 检查是否为可恢复错误
    ///
    /// 可恢复意味着同一会话可以继续使用；注入失败后按键状态不确定，
    /// 需要调用方显式释放。
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Automator(AutomatorError::InvalidRate(_))
                | AppError::Automator(AutomatorError::InjectionFailed(_))
                | AppError::Automator(AutomatorError::ClipboardFailed(_))
                | AppError::Automator(AutomatorError::EmptyChord)
                | AppError::Automator(AutomatorError::InvalidKey(_))
        )
    }
}
