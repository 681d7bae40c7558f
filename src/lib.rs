// ==========================================
// 库存二维码系统 - 核心库
// ==========================================
// 管道: 表格/CSV → 库存记录（箱数展开）→ 二维码载荷
// 反向: 扫描文本 → 库存记录 → 观测列表 → 分组汇总
// 红线: 脏数据降级为默认值,单文件失败不影响整批,管道内无致命错误
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 表格 / CSV
pub mod importer;

// 编解码层 - 二维码载荷
pub mod codec;

// 扫描层 - 观测与汇总
pub mod scan;

// 导出层 - 表格与图片归档
pub mod export;

// 配置层
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{BoxRule, Quantity};

// 领域实体
pub use domain::{
    CanonicalRow, GroupedTotal, ImportBatch, ImportReport, RawRow, RecordSheet, ScanObservation,
    SheetEdit, StockRecord,
};

// 导入
pub use importer::{BoxExpander, StockImporter, StockImporterImpl};

// 编解码
pub use codec::QrCodec;

// 扫描
pub use scan::{ScanAggregator, ScanBatchProcessor, ScanSession};

// 配置
pub use config::AppConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "stock-qr-tally";
