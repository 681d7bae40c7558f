// ==========================================
// 库存二维码系统 - 扫描层错误类型
// ==========================================
// 红线: 单张图片失败只记录错误文本,不中断整批
// 错误文本格式: "<文件>: <原因>"（按当前语言）
// ==========================================

use crate::i18n::t_with_args;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("图片读取失败: {0}")]
    UnreadableImage(String),

    #[error("图片中未找到二维码")]
    NoQrFound,

    #[error("二维码内容无法识别: {0}")]
    UnsupportedPayload(String),

    #[error("文件IO错误: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    /// 面向用户的逐文件错误文本
    pub fn localized(&self, source_file: &str) -> String {
        match self {
            ScanError::UnreadableImage(reason) => t_with_args(
                "scan.unreadable_image",
                &[("file", source_file), ("reason", reason)],
            ),
            ScanError::Io(e) => t_with_args(
                "scan.unreadable_image",
                &[("file", source_file), ("reason", &e.to_string())],
            ),
            ScanError::NoQrFound => t_with_args("scan.no_qr_found", &[("file", source_file)]),
            ScanError::UnsupportedPayload(_) => {
                t_with_args("scan.unsupported_payload", &[("file", source_file)])
            }
        }
    }
}

pub type ScanResult<T> = Result<T, ScanError>;
