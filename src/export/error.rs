// ==========================================
// 库存二维码系统 - 导出层错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("文件IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("导出目录无效: {0}")]
    InvalidTarget(String),
}

pub type ExportResult<T> = Result<T, ExportError>;
