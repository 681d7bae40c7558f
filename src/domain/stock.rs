// ==========================================
// 库存二维码系统 - 库存领域模型
// ==========================================
// 职责: 库存记录 / 规范行 / 扫描观测 / 分组汇总 / 导入结果
// 红线: 最终记录中的数量必为非负整数,不允许标记值流出管道
// ==========================================

use crate::domain::types::{BoxRule, Quantity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 原始行（列名 → 单元格文本）,由 CSV / Excel 解析器产出,仅消费一次
pub type RawRow = HashMap<String, String>;

// ==========================================
// StockRecord - 库存记录
// ==========================================
// 结构相等即同一记录,无代理键
// 用途: 一条记录对应一张二维码贴纸
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockRecord {
    pub model_name: String, // 型号（Item 列）
    pub lot: String,        // 批号（Lot 列）
    pub quantity: u32,      // 数量
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erp: Option<String>, // ERP 编码（仅用于打印,不进二维码）
}

impl StockRecord {
    pub fn new(model_name: impl Into<String>, lot: impl Into<String>, quantity: u32) -> Self {
        Self {
            model_name: model_name.into(),
            lot: lot.into(),
            quantity,
            erp: None,
        }
    }

    /// 手工录入表格的空白行（数量默认 1）
    pub fn placeholder() -> Self {
        Self::new("", "", 1)
    }

    /// 型号 / 批号 / ERP 均为空
    pub fn is_blank(&self) -> bool {
        self.model_name.is_empty()
            && self.lot.is_empty()
            && self.erp.as_deref().map_or(true, str::is_empty)
    }
}

// ==========================================
// CanonicalRow - 规范行
// ==========================================
// 由 FieldMapper 从 RawRow 映射得到,交给 BoxExpander 展开
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CanonicalRow {
    pub model_name: String,
    pub lot: String,
    pub quantity: Quantity,
    pub box_value: Option<String>, // 空白单元格 → None
    pub erp: String,

    // 元信息
    pub row_number: usize,
}

impl CanonicalRow {
    /// 以指定数量生成一条最终记录
    pub fn to_record(&self, quantity: u32) -> StockRecord {
        StockRecord {
            model_name: self.model_name.clone(),
            lot: self.lot.clone(),
            quantity,
            erp: if self.erp.is_empty() {
                None
            } else {
                Some(self.erp.clone())
            },
        }
    }
}

// ==========================================
// ScanObservation - 扫描观测
// ==========================================
// 不变式: 同一 source_file 在会话中至多一条
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanObservation {
    pub record: StockRecord,
    pub source_file: String,
}

impl ScanObservation {
    pub fn new(record: StockRecord, source_file: impl Into<String>) -> Self {
        Self {
            record,
            source_file: source_file.into(),
        }
    }
}

// ==========================================
// GroupedTotal - (型号, 批号) 分组汇总
// ==========================================
// 派生数据,每次从观测列表重新计算,不单独保存
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedTotal {
    pub model_name: String,
    pub lot: String,
    pub total_quantity: u64,
    pub files: Vec<String>, // 首次出现顺序,不重复
}

// ==========================================
// 导入批次与结果
// ==========================================

/// 各展开规则命中次数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxRuleCounts {
    pub no_box: usize,
    pub box_as_quantity: usize,
    pub count_plus_partial: usize,
    pub box_count: usize,
    pub ignored: usize,
}

impl BoxRuleCounts {
    pub fn record(&mut self, rule: BoxRule) {
        match rule {
            BoxRule::NoBox => self.no_box += 1,
            BoxRule::BoxAsQuantity => self.box_as_quantity += 1,
            BoxRule::CountPlusPartial => self.count_plus_partial += 1,
            BoxRule::BoxCount => self.box_count += 1,
            BoxRule::Ignored => self.ignored += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.no_box + self.box_as_quantity + self.count_plus_partial + self.box_count + self.ignored
    }
}

/// 导入批次信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportBatch {
    pub batch_id: String,
    pub file_name: Option<String>,
    pub raw_rows: usize,     // 有效原始行数（已跳过空行）
    pub record_count: usize, // 展开后的记录数
    pub rule_counts: BoxRuleCounts,
    pub placeholder: bool, // 无可用行时以单条空白记录占位
    pub imported_at: DateTime<Utc>,
}

/// 导入结果
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub batch: ImportBatch,
    pub records: Vec<StockRecord>,
    pub elapsed_time: std::time::Duration,
}
