// ==========================================
// 库存二维码系统 - 应用配置
// ==========================================
// 配置文件示例:
//
//   locale = "th"
//
//   [import]
//   large_expansion_warn_threshold = 10000
//   max_records_per_row = 100000
//
//   [export]
//   records_file_name = "scanned_qrcodes.csv"
//   totals_file_name = "scanned_totals.csv"
//   image_extension = "png"
//
// 缺省字段一律取默认值
// ==========================================

use crate::importer::box_expander::{
    DEFAULT_LARGE_EXPANSION_WARN_THRESHOLD, DEFAULT_MAX_RECORDS_PER_ROW,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const CONFIG_DIR_NAME: &str = "stock-qr-tally";
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {0}")]
    NotFound(String),

    #[error("配置文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置文件格式错误: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub locale: String,
    pub import: ImportSettings,
    pub export: ExportSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            import: ImportSettings::default(),
            export: ExportSettings::default(),
        }
    }
}

/// 导入参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// 单行展开超过该数量时记录告警（仍然展开）
    pub large_expansion_warn_threshold: usize,
    /// 单行展开上限,超过则该行只保留一条记录
    pub max_records_per_row: usize,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            large_expansion_warn_threshold: DEFAULT_LARGE_EXPANSION_WARN_THRESHOLD,
            max_records_per_row: DEFAULT_MAX_RECORDS_PER_ROW,
        }
    }
}

/// 导出参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub records_file_name: String,
    pub totals_file_name: String,
    pub image_extension: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            records_file_name: "scanned_qrcodes.csv".to_string(),
            totals_file_name: "scanned_totals.csv".to_string(),
            image_extension: "png".to_string(),
        }
    }
}

/// 用户配置目录下的默认配置文件路径
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

impl AppConfig {
    /// 加载配置
    ///
    /// # 规则
    /// - 显式路径: 文件必须存在,否则报错
    /// - 未指定: 用户配置目录下存在则读取,否则使用默认值
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.display().to_string()));
            }
            return Self::from_file(path);
        }

        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("未找到配置文件,使用默认配置");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        info!(path = %path.display(), locale = %config.locale, "配置文件加载完成");
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }
}
