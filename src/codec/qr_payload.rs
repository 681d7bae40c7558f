// ==========================================
// 库存二维码系统 - 二维码载荷编解码
// ==========================================
// 编码: 固定 JSON 对象 {"model_name","lot","quantity"}
// 解码: 先按 JSON 解析,失败再按旧版 "型号|批号|数量" 解析
// 红线: 解码失败只影响单张图片,不影响整批
// ==========================================

use crate::domain::stock::StockRecord;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// 编解码错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("JSON 结构不符: {0}")]
    InvalidShape(String),

    #[error("旧版格式段数错误: 期望 3 段,实际 {0} 段")]
    SegmentCount(usize),

    #[error("数量无法解析: {0}")]
    InvalidQuantity(String),

    #[error("载荷序列化失败: {0}")]
    Serialize(String),

    #[error("无法识别的二维码内容（JSON: {structured}；旧版: {legacy}）")]
    Unrecognized {
        structured: Box<CodecError>,
        legacy: Box<CodecError>,
    },
}

pub type CodecResult<T> = Result<T, CodecError>;

// ==========================================
// QrPayload - 二维码载荷（线上格式）
// ==========================================
// 字段顺序即 JSON 键顺序: model_name, lot, quantity
// 解码时型号/批号接受数字,数量接受数字或数字字符串
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayload {
    #[serde(deserialize_with = "text_or_number")]
    pub model_name: String,
    #[serde(deserialize_with = "text_or_number")]
    pub lot: String,
    #[serde(deserialize_with = "quantity_number_or_text")]
    pub quantity: u32,
}

impl From<&StockRecord> for QrPayload {
    fn from(record: &StockRecord) -> Self {
        Self {
            model_name: record.model_name.clone(),
            lot: record.lot.clone(),
            quantity: record.quantity,
        }
    }
}

impl From<QrPayload> for StockRecord {
    fn from(payload: QrPayload) -> Self {
        StockRecord::new(payload.model_name, payload.lot, payload.quantity)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl TextOrNumber {
    fn into_text(self) -> String {
        match self {
            TextOrNumber::Text(s) => s,
            TextOrNumber::Number(n) => n.to_string(),
        }
    }
}

fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(TextOrNumber::deserialize(deserializer)?.into_text())
}

fn quantity_number_or_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = TextOrNumber::deserialize(deserializer)?.into_text();
    coerce_quantity(&raw).map_err(serde::de::Error::custom)
}

pub struct QrCodec;

impl QrCodec {
    /// 编码为二维码载荷
    ///
    /// 只携带 model_name / lot / quantity,ERP 不进载荷
    pub fn encode(record: &StockRecord) -> CodecResult<String> {
        serde_json::to_string(&QrPayload::from(record))
            .map_err(|e| CodecError::Serialize(e.to_string()))
    }

    /// 解码扫描文本；无法识别返回 None
    pub fn decode(text: &str) -> Option<StockRecord> {
        Self::decode_detailed(text).ok()
    }

    /// 解码扫描文本,失败时给出原因
    pub fn decode_detailed(text: &str) -> CodecResult<StockRecord> {
        let text = text.trim();

        // 派生的 Deserialize 也接受数组,这里只认 JSON 对象
        let structured = if text.starts_with('{') {
            match serde_json::from_str::<QrPayload>(text) {
                Ok(payload) => return Ok(payload.into()),
                Err(e) => CodecError::InvalidShape(e.to_string()),
            }
        } else {
            CodecError::InvalidShape("不是 JSON 对象".to_string())
        };

        Self::decode_legacy(text).map_err(|legacy| CodecError::Unrecognized {
            structured: Box::new(structured),
            legacy: Box::new(legacy),
        })
    }

    fn decode_legacy(text: &str) -> CodecResult<StockRecord> {
        let parts: Vec<&str> = text.split('|').collect();
        if parts.len() != 3 {
            return Err(CodecError::SegmentCount(parts.len()));
        }

        let quantity = coerce_quantity(parts[2])?;
        Ok(StockRecord::new(parts[0], parts[1], quantity))
    }
}

/// 数量转换：非负整数,允许 "12" / 12.0 这类写法
fn coerce_quantity(raw: &str) -> CodecResult<u32> {
    let trimmed = raw.trim();
    let invalid = || CodecError::InvalidQuantity(trimmed.to_string());

    let value: f64 = trimmed.parse().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(invalid());
    }
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_field_order() {
        let payload = QrCodec::encode(&StockRecord::new("CM-4532", "L2406", 500)).unwrap();
        assert_eq!(payload, r#"{"model_name":"CM-4532","lot":"L2406","quantity":500}"#);
    }

    #[test]
    fn test_encode_escapes_and_drops_erp() {
        let mut record = StockRecord::new("A \"B\"", "L|1", 3);
        record.erp = Some("ERP-1".to_string());

        let payload = QrCodec::encode(&record).unwrap();
        assert!(!payload.contains("ERP-1"));

        let decoded = QrCodec::decode(&payload).unwrap();
        assert_eq!(decoded, StockRecord::new("A \"B\"", "L|1", 3));
    }

    #[test]
    fn test_round_trip() {
        let records = [
            StockRecord::new("CM-1", "L1", 0),
            StockRecord::new("", "", 1),
            StockRecord::new("ขดลวด", "ล็อต-7", u32::MAX),
        ];
        for record in records {
            assert_eq!(QrCodec::decode(&QrCodec::encode(&record).unwrap()), Some(record));
        }
    }

    #[test]
    fn test_decode_quantity_coercion() {
        let decoded = QrCodec::decode(r#"{"model_name":"A","lot":"L","quantity":"12"}"#).unwrap();
        assert_eq!(decoded.quantity, 12);

        let decoded = QrCodec::decode(r#"{"model_name":"A","lot":2406,"quantity":7.0}"#).unwrap();
        assert_eq!(decoded, StockRecord::new("A", "2406", 7));
    }

    #[test]
    fn test_decode_ignores_extra_fields() {
        let decoded =
            QrCodec::decode(r#"{"model_name":"A","lot":"L","quantity":5,"erp":"E"}"#).unwrap();
        assert_eq!(decoded, StockRecord::new("A", "L", 5));
    }

    #[test]
    fn test_decode_legacy() {
        assert_eq!(
            QrCodec::decode("CM-1|L2406|500"),
            Some(StockRecord::new("CM-1", "L2406", 500))
        );
        assert_eq!(
            QrCodec::decode("CM-1|L2406| 500 \n"),
            Some(StockRecord::new("CM-1", "L2406", 500))
        );
    }

    #[test]
    fn test_decode_failures() {
        assert_eq!(QrCodec::decode("hello"), None);
        assert_eq!(QrCodec::decode("A|B"), None);
        assert_eq!(QrCodec::decode("A|B|C|D"), None);
        assert_eq!(QrCodec::decode("A|B|abc"), None);
        assert_eq!(QrCodec::decode("A|B|-3"), None);
        assert_eq!(QrCodec::decode(r#"{"model_name":"A","lot":"L"}"#), None);
        assert_eq!(QrCodec::decode("42"), None);
    }

    #[test]
    fn test_decode_structured_rejects_bad_fields() {
        assert_eq!(
            QrCodec::decode(r#"{"model_name":"A","lot":"L","quantity":-1}"#),
            None
        );
        assert_eq!(
            QrCodec::decode(r#"{"model_name":"A","lot":"L","quantity":"1.5"}"#),
            None
        );
        assert_eq!(
            QrCodec::decode(r#"{"model_name":null,"lot":"L","quantity":1}"#),
            None
        );
        assert_eq!(QrCodec::decode("[1,2,3]"), None);
    }

    #[test]
    fn test_payload_struct_matches_encoding() {
        let record = StockRecord::new("CM-9", "L7", 12);
        let payload: QrPayload = serde_json::from_str(&QrCodec::encode(&record).unwrap()).unwrap();
        assert_eq!(payload, QrPayload::from(&record));
    }

    #[test]
    fn test_decode_detailed_reports_both_attempts() {
        let err = QrCodec::decode_detailed("A|B").unwrap_err();
        match err {
            CodecError::Unrecognized { legacy, .. } => {
                assert_eq!(*legacy, CodecError::SegmentCount(2));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
