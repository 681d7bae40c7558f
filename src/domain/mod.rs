// ==========================================
// 库存二维码系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含文件读写
// ==========================================

pub mod sheet;
pub mod stock;
pub mod types;

// 重导出核心类型
pub use sheet::{RecordSheet, SheetEdit};
pub use stock::{
    BoxRuleCounts, CanonicalRow, GroupedTotal, ImportBatch, ImportReport, RawRow,
    ScanObservation, StockRecord,
};
pub use types::{BoxRule, Quantity};
