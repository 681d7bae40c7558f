// ==========================================
// 库存二维码系统 - 图片归档规划
// ==========================================
// 职责: 每条记录一张二维码图片,生成 "序号_型号_批号.扩展名" 文件名与载荷
// 说明: 图片渲染与打包由外部组件负责,这里只给出条目清单
// ==========================================

use crate::codec::qr_payload::{CodecResult, QrCodec};
use crate::domain::stock::StockRecord;
use serde::{Deserialize, Serialize};

/// 归档条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub file_name: String,
    pub payload: String,
}

/// 文件名片段清洗：仅保留 ASCII 字母数字与 - .,其余替换为 _
pub fn sanitize_file_component(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// index 从 1 开始
pub fn archive_file_name(index: usize, record: &StockRecord, extension: &str) -> String {
    format!(
        "{}_{}_{}.{}",
        index,
        sanitize_file_component(&record.model_name),
        sanitize_file_component(&record.lot),
        extension
    )
}

pub fn plan_archive_entries(
    records: &[StockRecord],
    extension: &str,
) -> CodecResult<Vec<ArchiveEntry>> {
    records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            Ok(ArchiveEntry {
                file_name: archive_file_name(idx + 1, record, extension),
                payload: QrCodec::encode(record)?,
            })
        })
        .collect()
}
