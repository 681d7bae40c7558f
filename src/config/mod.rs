// ==========================================
// 库存二维码系统 - 配置层
// ==========================================
// 职责: 系统配置加载,支持多级覆写
// 优先级: --config 指定文件 > 用户配置目录 > 内置默认值
// 存储: TOML 文件
// ==========================================

pub mod app_config;

// 重导出核心配置类型
pub use app_config::{
    default_config_path, AppConfig, ConfigError, ConfigResult, ExportSettings, ImportSettings,
    CONFIG_DIR_NAME, CONFIG_FILE_NAME,
};
