// ==========================================
// 库存二维码系统 - 箱数展开器实现
// ==========================================
// 职责: 一行规范数据 + Box 列 → 一条或多条库存记录
// 规则（按优先级,命中即止）:
//   1. 无 Box 值 → 原样 1 条（Unset 落为 0）
//   2. 数量未填 且 Box 为正整数 → 1 条,数量 = Box
//   3. Box 形如 "整箱数+尾箱数量" → 整箱数条原数量 + 1 条尾箱数量
//   4. Box 为正整数 N → N 条原数量
//   5. 其余 → 原样 1 条（忽略 Box）
// 红线: 输出至少 1 条；规则顺序不可调整
// 说明: 单行展开超过上限时按规则5处理
// ==========================================

use crate::domain::stock::{CanonicalRow, StockRecord};
use crate::domain::types::BoxRule;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::stock_importer_trait::{
    BoxExpansion, DataCleaner as DataCleanerTrait, RowExpander,
};
use tracing::warn;

/// 单行展开条数超过该值时记录警告
pub const DEFAULT_LARGE_EXPANSION_WARN_THRESHOLD: usize = 10_000;

/// 单行展开条数上限
pub const DEFAULT_MAX_RECORDS_PER_ROW: usize = 100_000;

pub struct BoxExpander {
    cleaner: DataCleaner,
    large_expansion_warn_threshold: usize,
    max_records_per_row: usize,
}

impl Default for BoxExpander {
    fn default() -> Self {
        Self::new(DEFAULT_LARGE_EXPANSION_WARN_THRESHOLD, DEFAULT_MAX_RECORDS_PER_ROW)
    }
}

impl RowExpander for BoxExpander {
    fn expand(&self, row: &CanonicalRow) -> BoxExpansion {
        let original_quantity = row.quantity.resolve();

        // 规则1: 空字符串等同于无 Box 值
        let Some(box_str) = row
            .box_value
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        else {
            return BoxExpansion::single(BoxRule::NoBox, row.to_record(original_quantity));
        };

        let leading = self.cleaner.parse_leading_int(box_str);

        // 规则2: 数量未填时 Box 即数量
        if row.quantity.is_unset() {
            if let Some(n) = leading.filter(|n| *n > 0) {
                return BoxExpansion::single(BoxRule::BoxAsQuantity, row.to_record(clamp_u32(n)));
            }
        }

        // 规则3: "10+2000" = 10 整箱 + 1 个 2000 的尾箱
        if let Some((full_boxes, partial)) = self.split_count_plus_partial(box_str) {
            if !self.within_limit(row, full_boxes.saturating_add(1)) {
                return BoxExpansion::single(BoxRule::Ignored, row.to_record(original_quantity));
            }
            let mut records = self.duplicate(row, original_quantity, full_boxes);
            records.push(row.to_record(partial));
            return BoxExpansion {
                rule: BoxRule::CountPlusPartial,
                records,
            };
        }

        // 规则4: Box 为箱数
        if let Some(n) = leading.filter(|n| *n > 0) {
            let count = usize::try_from(n).unwrap_or(usize::MAX);
            if !self.within_limit(row, count) {
                return BoxExpansion::single(BoxRule::Ignored, row.to_record(original_quantity));
            }
            return BoxExpansion {
                rule: BoxRule::BoxCount,
                records: self.duplicate(row, original_quantity, count),
            };
        }

        // 规则5: 无法识别,忽略 Box
        BoxExpansion::single(BoxRule::Ignored, row.to_record(original_quantity))
    }
}

impl BoxExpander {
    pub fn new(large_expansion_warn_threshold: usize, max_records_per_row: usize) -> Self {
        Self {
            cleaner: DataCleaner,
            large_expansion_warn_threshold,
            max_records_per_row,
        }
    }

    /// 拆分 "整箱数+尾箱数量"
    ///
    /// 恰好一个 `+`,两侧均能解析为非负整数才算命中
    fn split_count_plus_partial(&self, box_str: &str) -> Option<(usize, u32)> {
        let (left, right) = box_str.split_once('+')?;
        if right.contains('+') {
            return None;
        }

        let full_boxes = self.cleaner.parse_leading_int(left.trim())?;
        let partial = self.cleaner.parse_leading_int(right.trim())?;
        if full_boxes < 0 || partial < 0 {
            return None;
        }

        Some((
            usize::try_from(full_boxes).unwrap_or(usize::MAX),
            clamp_u32(partial),
        ))
    }

    fn duplicate(&self, row: &CanonicalRow, quantity: u32, count: usize) -> Vec<StockRecord> {
        let record = row.to_record(quantity);
        vec![record; count]
    }

    /// 展开条数检查：超过警告阈值记日志,超过上限返回 false
    fn within_limit(&self, row: &CanonicalRow, count: usize) -> bool {
        if count > self.max_records_per_row {
            warn!(
                row_number = row.row_number,
                model_name = %row.model_name,
                box_value = ?row.box_value,
                count,
                max = self.max_records_per_row,
                "箱数展开超过上限,忽略 Box 列"
            );
            return false;
        }
        if count > self.large_expansion_warn_threshold {
            warn!(
                row_number = row.row_number,
                model_name = %row.model_name,
                box_value = ?row.box_value,
                count,
                "箱数展开条数过大"
            );
        }
        true
    }
}

fn clamp_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
