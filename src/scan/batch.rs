// ==========================================
// 库存二维码系统 - 扫描批处理
// ==========================================
// 职责: 一批图片 → 观测列表 + 逐文件错误文本
// 流程: 读文件 → 像素识别（外部解码器）→ 载荷解码
// 红线: 严格顺序处理,一次只持有一张图片；单张失败不中断整批,不自动重试
// ==========================================

use crate::codec::qr_payload::QrCodec;
use crate::domain::stock::ScanObservation;
use crate::scan::error::{ScanError, ScanResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// QrImageDecoder Trait - 像素级二维码识别
// ==========================================
// 由外部组件实现（摄像头 / 图像库）
// 返回 Ok(None) 表示图片可读但未找到二维码
pub trait QrImageDecoder: Send + Sync {
    fn decode_image(&self, bytes: &[u8]) -> ScanResult<Option<String>>;
}

/// 已完成像素识别的一张图片
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedScan {
    pub source_file: String,
    pub text: Option<String>, // None = 未找到二维码
}

impl DecodedScan {
    pub fn new(source_file: impl Into<String>, text: Option<String>) -> Self {
        Self {
            source_file: source_file.into(),
            text,
        }
    }
}

/// 一批扫描的结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanBatchOutcome {
    pub batch_id: String,
    pub observations: Vec<ScanObservation>,
    pub errors: Vec<String>, // "<文件>: <原因>",按处理顺序
    pub scanned_at: DateTime<Utc>,
}

impl ScanBatchOutcome {
    fn new() -> Self {
        Self {
            batch_id: Uuid::new_v4().to_string(),
            observations: Vec::new(),
            errors: Vec::new(),
            scanned_at: Utc::now(),
        }
    }

    /// 载荷文本 → 观测或错误
    fn accept_text(&mut self, source_file: &str, text: Option<&str>) {
        let Some(text) = text else {
            self.reject(source_file, ScanError::NoQrFound);
            return;
        };

        match QrCodec::decode_detailed(text) {
            Ok(record) => {
                debug!(file = source_file, model_name = %record.model_name, lot = %record.lot, "二维码解码成功");
                self.observations
                    .push(ScanObservation::new(record, source_file));
            }
            Err(e) => self.reject(source_file, ScanError::UnsupportedPayload(e.to_string())),
        }
    }

    fn reject(&mut self, source_file: &str, error: ScanError) {
        warn!(file = source_file, error = %error, "图片处理失败");
        self.errors.push(error.localized(source_file));
    }

    fn log_summary(&self) {
        info!(
            batch_id = %self.batch_id,
            decoded = self.observations.len(),
            failed = self.errors.len(),
            "扫描批次处理完成"
        );
    }
}

/// 处理已识别的载荷文本（外部解码器已完成像素识别）
pub fn process_decoded(items: Vec<DecodedScan>) -> ScanBatchOutcome {
    let mut outcome = ScanBatchOutcome::new();
    for item in &items {
        outcome.accept_text(&item.source_file, item.text.as_deref());
    }
    outcome.log_summary();
    outcome
}

// ==========================================
// ScanBatchProcessor - 图片批处理器
// ==========================================
pub struct ScanBatchProcessor<D: QrImageDecoder> {
    decoder: D,
}

impl<D: QrImageDecoder> ScanBatchProcessor<D> {
    pub fn new(decoder: D) -> Self {
        Self { decoder }
    }

    /// 顺序处理一批图片文件
    ///
    /// 观测中的 source_file 取文件名（不含目录）
    #[instrument(skip(self, paths), fields(count = paths.len()))]
    pub async fn process_files<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> ScanBatchOutcome {
        let mut outcome = ScanBatchOutcome::new();
        info!(batch_id = %outcome.batch_id, "开始处理扫描批次");

        for path in paths {
            let path = path.as_ref();
            let source_file = source_file_name(path);

            // 读完一张,识别完,再读下一张
            let bytes = match tokio::fs::read(path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    outcome.reject(&source_file, ScanError::from(e));
                    continue;
                }
            };

            match self.decoder.decode_image(&bytes) {
                Ok(text) => outcome.accept_text(&source_file, text.as_deref()),
                Err(e) => outcome.reject(&source_file, e),
            }
        }

        outcome.log_summary();
        outcome
    }
}

fn source_file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stock::StockRecord;
    use std::io::Write;

    /// 把文件内容直接当作二维码文本；"NOQR" → 未找到,"BROKEN" → 图片损坏
    struct TextDecoder;

    impl QrImageDecoder for TextDecoder {
        fn decode_image(&self, bytes: &[u8]) -> ScanResult<Option<String>> {
            match bytes {
                b"NOQR" => Ok(None),
                b"BROKEN" => Err(ScanError::UnreadableImage("corrupt header".to_string())),
                other => Ok(Some(String::from_utf8_lossy(other).into_owned())),
            }
        }
    }

    fn write_image(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_process_decoded_mixed() {
        let outcome = process_decoded(vec![
            DecodedScan::new("a.jpg", Some(r#"{"model_name":"A","lot":"L1","quantity":5}"#.to_string())),
            DecodedScan::new("b.jpg", None),
            DecodedScan::new("c.jpg", Some("hello".to_string())),
            DecodedScan::new("d.jpg", Some("B|L2|3".to_string())),
        ]);

        assert_eq!(
            outcome.observations,
            vec![
                ScanObservation::new(StockRecord::new("A", "L1", 5), "a.jpg"),
                ScanObservation::new(StockRecord::new("B", "L2", 3), "d.jpg"),
            ]
        );
        assert_eq!(outcome.errors.len(), 2);
        assert!(outcome.errors[0].starts_with("b.jpg: "));
        assert!(outcome.errors[1].starts_with("c.jpg: "));
    }

    #[tokio::test]
    async fn test_process_files_partial_failure() {
        let dir = tempfile::tempdir().unwrap();
        let ok = write_image(&dir, "IMG_1.jpg", "CM-1|L2406|500");
        let no_qr = write_image(&dir, "IMG_2.jpg", "NOQR");
        let broken = write_image(&dir, "IMG_3.jpg", "BROKEN");
        let missing = dir.path().join("IMG_4.jpg");
        let ok2 = write_image(&dir, "IMG_5.jpg", r#"{"model_name":"CM-2","lot":"L1","quantity":7}"#);

        let processor = ScanBatchProcessor::new(TextDecoder);
        let outcome = processor
            .process_files(&[ok, no_qr, broken, missing, ok2])
            .await;

        assert_eq!(outcome.observations.len(), 2);
        assert_eq!(outcome.observations[0].source_file, "IMG_1.jpg");
        assert_eq!(outcome.observations[1].record, StockRecord::new("CM-2", "L1", 7));

        assert_eq!(outcome.errors.len(), 3);
        assert!(outcome.errors[0].starts_with("IMG_2.jpg: "));
        assert!(outcome.errors[1].starts_with("IMG_3.jpg: "));
        assert!(outcome.errors[1].contains("corrupt header"));
        assert!(outcome.errors[2].starts_with("IMG_4.jpg: "));
    }

    #[tokio::test]
    async fn test_process_files_empty_batch() {
        let processor = ScanBatchProcessor::new(TextDecoder);
        let paths: Vec<std::path::PathBuf> = Vec::new();
        let outcome = processor.process_files(&paths).await;
        assert!(outcome.observations.is_empty());
        assert!(outcome.errors.is_empty());
    }
}
