//! 演示程序配置
//!
//! 按以下顺序合并（后者覆盖前者）：
//! 1. `DemoConfig::default()`；
//! 2. TOML 文件（`--config <path>`，否则工作目录下的 `academic.toml`）；
//! 3. 前缀为 `ACADEMIC_` 的环境变量，嵌套键以 `__` 分隔
//!    （如 `ACADEMIC_ENGINE__DELIVER_INTERVAL_MS=50`）。

use academic_domain::eventing::EventEngineConfig;
use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILENAME: &str = "academic.toml";
pub const CONFIG_ENV_PREFIX: &str = "ACADEMIC_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub log: LogConfig,
    pub engine: EngineConfig,
    pub publisher: PublisherMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` 指令；设置了 `RUST_LOG` 时以其为准
    pub level: String,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub deliver_interval_ms: u64,
    pub handler_concurrency: usize,
    pub outbox_batch_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            deliver_interval_ms: 200,
            handler_concurrency: 8,
            outbox_batch_size: 100,
        }
    }
}

impl EngineConfig {
    pub fn to_engine_config(&self) -> EventEngineConfig {
        EventEngineConfig {
            deliver_interval: Duration::from_millis(self.deliver_interval_ms.max(1)),
            handler_concurrency: self.handler_concurrency.max(1),
        }
    }
}

/// 用例把事件交给交换机的方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PublisherMode {
    /// 直接发布到交换机
    Direct,
    /// 写入 Outbox，由事件引擎中继
    #[default]
    Outbox,
}

#[derive(Clone, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn load(&self) -> anyhow::Result<DemoConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(DemoConfig::default()));

        match &self.config_path {
            Some(path) => {
                anyhow::ensure!(path.exists(), "config file not found: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILENAME);
                if default_path.exists() {
                    figment = figment.merge(Toml::file(default_path));
                }
            }
        }

        figment = figment.merge(Env::prefixed(CONFIG_ENV_PREFIX).split("__"));

        figment
            .extract()
            .context("failed to extract configuration")
    }
}
