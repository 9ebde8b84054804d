//! 配置管理模块
//! 支持从环境变量和配置文件加载配置

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bitcoin::Network;
use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 钱包配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// 地址编码使用的网络: bitcoin / testnet / signet / regtest
    pub network: String,
    /// 新钱包助记词长度
    pub word_count: usize,
    /// 钱包文件输出目录
    pub output_dir: Option<String>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "text"
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            network: std::env::var("PAPERWALLET_NETWORK").unwrap_or_else(|_| "bitcoin".into()),
            word_count: std::env::var("PAPERWALLET_WORD_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(12),
            output_dir: std::env::var("PAPERWALLET_OUTPUT_DIR").ok(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".into()),
        }
    }
}

impl WalletConfig {
    /// 解析网络名称
    pub fn network(&self) -> Result<Network> {
        parse_network(&self.network)
    }

    /// 钱包文件输出目录，未配置时使用用户主目录
    pub fn output_dir(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => std::env::var_os("HOME")
                .or_else(|| std::env::var_os("USERPROFILE"))
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

/// 解析网络名称
pub fn parse_network(name: &str) -> Result<Network> {
    match name.to_lowercase().as_str() {
        "bitcoin" | "mainnet" => Ok(Network::Bitcoin),
        "testnet" => Ok(Network::Testnet),
        "signet" => Ok(Network::Signet),
        "regtest" => Ok(Network::Regtest),
        other => anyhow::bail!("Unsupported network: {}", other),
    }
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            wallet: WalletConfig::default(),
            logging: LoggingConfig::default(),
        })
    }

    /// 从配置文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;

        Ok(config)
    }

    /// 从环境变量和配置文件合并加载（配置文件优先级更高）
    pub fn from_env_and_file<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut config = Self::from_env()?;

        if let Some(path) = path {
            if path.as_ref().exists() {
                config = Self::from_file(path)?;
            }
        }

        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        self.wallet.network()?;

        let valid_word_counts = [12, 15, 18, 21, 24];
        if !valid_word_counts.contains(&self.wallet.word_count) {
            anyhow::bail!("PAPERWALLET_WORD_COUNT must be one of: {:?}", valid_word_counts);
        }

        // 验证日志级别
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!("LOG_LEVEL must be one of: {:?}", valid_levels);
        }

        // 验证日志格式
        if self.logging.format != "json" && self.logging.format != "text" {
            anyhow::bail!("LOG_FORMAT must be 'json' or 'text'");
        }

        Ok(())
    }
}
