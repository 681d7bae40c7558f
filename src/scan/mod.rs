// ==========================================
// 库存二维码系统 - 扫描层
// ==========================================
// 职责: 扫描图片 → 观测列表 → 分组汇总
// 说明: 像素级二维码识别由外部解码器完成
// ==========================================

pub mod aggregator;
pub mod batch;
pub mod error;
pub mod session;

pub use aggregator::ScanAggregator;
pub use batch::{process_decoded, DecodedScan, QrImageDecoder, ScanBatchOutcome, ScanBatchProcessor};
pub use error::{ScanError, ScanResult};
pub use session::ScanSession;
