// ==========================================
// 库存二维码系统 - 记录表（调用方持有的编辑状态）
// ==========================================
// 职责: 导入结果 / 手工录入的记录列表维护
// 红线: 列表永不为空,清空后保留一条空白占位记录
// ==========================================

use crate::domain::stock::StockRecord;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::stock_importer_trait::DataCleaner as _;
use serde::{Deserialize, Serialize};

/// 单元格编辑
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetEdit {
    ModelName(String),
    Lot(String),
    Erp(String),
    Quantity(u32),
}

impl SheetEdit {
    /// 手工输入的数量文本,规则同导入（"1,200" → 1200,"-" / 空白 → 0,乱码 → 1）
    pub fn quantity_text(raw: &str) -> Self {
        SheetEdit::Quantity(DataCleaner.parse_quantity(Some(raw)).resolve())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSheet {
    rows: Vec<StockRecord>,
}

impl Default for RecordSheet {
    fn default() -> Self {
        Self {
            rows: vec![StockRecord::placeholder()],
        }
    }
}

impl RecordSheet {
    /// 用导入结果建表；无记录时放一条空白行
    pub fn from_records(records: Vec<StockRecord>) -> Self {
        if records.is_empty() {
            Self::default()
        } else {
            Self { rows: records }
        }
    }

    pub fn rows(&self) -> &[StockRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 是否存在至少一条非空白记录
    pub fn has_content(&self) -> bool {
        self.rows.iter().any(|r| !r.is_blank())
    }

    pub fn add_empty_row(&mut self) {
        self.rows.push(StockRecord::placeholder());
    }

    /// 编辑第 idx 行；越界返回 false
    pub fn update(&mut self, idx: usize, edit: SheetEdit) -> bool {
        let Some(row) = self.rows.get_mut(idx) else {
            return false;
        };
        match edit {
            SheetEdit::ModelName(v) => row.model_name = v,
            SheetEdit::Lot(v) => row.lot = v,
            SheetEdit::Erp(v) => row.erp = if v.is_empty() { None } else { Some(v) },
            SheetEdit::Quantity(q) => row.quantity = q,
        }
        true
    }

    /// 删除第 idx 行；删掉最后一行时重置为空白占位
    pub fn remove(&mut self, idx: usize) -> Option<StockRecord> {
        if idx >= self.rows.len() {
            return None;
        }
        let removed = self.rows.remove(idx);
        if self.rows.is_empty() {
            self.rows.push(StockRecord::placeholder());
        }
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.rows = vec![StockRecord::placeholder()];
    }

    pub fn into_records(self) -> Vec<StockRecord> {
        self.rows
    }
}
