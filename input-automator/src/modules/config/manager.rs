//! 配置管理器

use crate::error::ConfigError;
use arc_swap::ArcSwap;
use automator_core::{KeyCode, StopKey, Timing};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub(crate) const APP_DIR: &str = "input-automator";
const CONFIG_FILE: &str = "config.toml";

/// 停止键设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StopSettings {
    /// 停止键名称，例如 "escape"、"f12"、"raw:3655"；为空则不监听
    pub key: Option<String>,
    /// 记录收到的每一个按键
    pub verbose_key_log: bool,
}

/// 自动化配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AutomatorConfig {
    pub timing: Timing,
    pub stop: StopSettings,
}

impl AutomatorConfig {
    /// 解析停止键设置
    pub fn stop_key(&self) -> Result<Option<StopKey>, ConfigError> {
        let Some(name) = self.stop.key.as_deref() else {
            return Ok(None);
        };
        let code: KeyCode = name
            .parse()
            .map_err(|e| ConfigError::ValidationFailed(format!("stop.key: {}", e)))?;
        Ok(Some(StopKey::new(code).verbose(self.stop.verbose_key_log)))
    }
}

/// 配置管理器
#[derive(Debug)]
pub struct ConfigManager {
    config: ArcSwap<AutomatorConfig>,
    config_path: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new(default_config_dir())
    }
}

/// 默认配置目录
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

impl ConfigManager {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_path = config_dir.join(CONFIG_FILE);
        let config = ArcSwap::new(Arc::new(AutomatorConfig::default()));
        Self { config, config_path }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// 读取配置文件，文件不存在时返回默认配置
    pub fn load(&self) -> Result<AutomatorConfig, ConfigError> {
        if !self.config_path.exists() {
            tracing::debug!("No config at {}, using defaults", self.config_path.display());
            return Ok(AutomatorConfig::default());
        }
        let content = std::fs::read_to_string(&self.config_path)
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;
        let config: AutomatorConfig =
            toml::from_str(&content).map_err(|e| ConfigError::LoadFailed(e.to_string()))?;
        config.stop_key()?;
        self.config.store(Arc::new(config.clone()));
        tracing::info!("Loaded config from {}", self.config_path.display());
        Ok(config)
    }

    pub fn save(&self, config: &AutomatorConfig) -> Result<(), ConfigError> {
        config.stop_key()?;
        let content = toml::to_string(config).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }
        std::fs::write(&self.config_path, content)
            .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        self.config.store(Arc::new(config.clone()));
        Ok(())
    }

    pub fn current(&self) -> Arc<AutomatorConfig> {
        self.config.load_full()
    }

    pub fn update<F>(&self, f: F) -> Result<(), ConfigError>
    where
        F: FnOnce(&mut AutomatorConfig),
    {
        let mut config = (*self.current()).clone();
        f(&mut config);
        self.save(&config)
    }
}
