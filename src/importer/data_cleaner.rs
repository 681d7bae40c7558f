// ==========================================
// 库存二维码系统 - 数据清洗器实现
// ==========================================
// 职责: NULL 标准化 / 数量解析 / 箱数整数解析
// 红线: 任何脏单元格都回落默认值,绝不报错
// ==========================================

use crate::domain::types::Quantity;
use crate::importer::stock_importer_trait::DataCleaner as DataCleanerTrait;

/// 数量解析失败时的安全默认值
pub const QUANTITY_FALLBACK: u32 = 1;

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 解析数量单元格
    ///
    /// # 规则
    /// - 缺失 / 空白 / "-" → Unset（由 Box 列推导）
    /// - 去掉千分位逗号后按数值解析（"18,000" → 18000）
    /// - 解析失败或为负数 → 1
    /// - 小数向零截断；截断后为 0 → Unset
    fn parse_quantity(&self, raw: Option<&str>) -> Quantity {
        let trimmed = match raw.map(str::trim) {
            None | Some("") | Some("-") => return Quantity::Unset,
            Some(v) => v,
        };

        let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();
        let cleaned = cleaned.trim();
        if cleaned.is_empty() {
            return Quantity::Unset;
        }

        match cleaned.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => {
                let truncated = v.trunc();
                if truncated >= u32::MAX as f64 {
                    Quantity::Known(u32::MAX)
                } else {
                    Quantity::from(truncated as u32)
                }
            }
            _ => Quantity::Known(QUANTITY_FALLBACK),
        }
    }

    /// 前导整数解析（箱数列专用）
    ///
    /// # 规则
    /// - 跳过前导空白,可选 +/- 号,之后至少一位数字
    /// - 数字之后的任意内容被忽略（"5 箱" → 5,"10+2000" → 10）
    /// - 无数字 → None
    /// - 超出 i64 范围 → 饱和为 ±i64::MAX
    fn parse_leading_int(&self, value: &str) -> Option<i64> {
        let s = value.trim_start();
        let (negative, rest) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let digit_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digit_len == 0 {
            return None;
        }

        // 纯数字串只会因溢出而解析失败,按 i64::MAX 饱和
        let magnitude: i64 = rest[..digit_len].parse().unwrap_or(i64::MAX);
        Some(if negative { -magnitude } else { magnitude })
    }
}
