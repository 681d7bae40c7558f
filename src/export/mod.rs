// ==========================================
// 库存二维码系统 - 导出层
// ==========================================
// 职责: 扫描结果表格导出 + 二维码图片归档条目
// ==========================================

pub mod archive;
pub mod error;
pub mod tabular;

pub use archive::{archive_file_name, plan_archive_entries, sanitize_file_component, ArchiveEntry};
pub use error::{ExportError, ExportResult};
pub use tabular::{
    ensure_export_dir, export_grouped_totals, export_observations, write_grouped_totals_csv, write_observations_csv,
};
