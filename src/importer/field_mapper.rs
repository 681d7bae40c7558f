// ==========================================
// 库存二维码系统 - 字段映射器实现
// ==========================================
// 职责: 原始行（表头 → 单元格）→ 规范行
// 表头: Item / Lot / Qty / Box|box|BOX / ERP
// 红线: 缺字段只回落默认值,不拒绝整行
// ==========================================

use crate::domain::stock::{CanonicalRow, RawRow};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::stock_importer_trait::{
    DataCleaner as DataCleanerTrait, FieldMapper as FieldMapperTrait,
};

// 标准字段 → 表头别名（按优先级）
const MODEL_NAME_ALIASES: &[&str] = &["Item"];
const LOT_ALIASES: &[&str] = &["Lot"];
const QUANTITY_ALIASES: &[&str] = &["Qty"];
const BOX_ALIASES: &[&str] = &["Box", "box", "BOX"];
const ERP_ALIASES: &[&str] = &["ERP"];

pub struct FieldMapper {
    cleaner: DataCleaner,
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }
}

impl FieldMapperTrait for FieldMapper {
    fn map_to_canonical(&self, row: &RawRow, row_number: usize) -> CanonicalRow {
        CanonicalRow {
            model_name: self.get_string(row, MODEL_NAME_ALIASES).unwrap_or_default(),
            lot: self.get_string(row, LOT_ALIASES).unwrap_or_default(),
            quantity: self
                .cleaner
                .parse_quantity(self.get_string(row, QUANTITY_ALIASES).as_deref()),
            box_value: self.get_string(row, BOX_ALIASES),
            erp: self.get_string(row, ERP_ALIASES).unwrap_or_default(),
            row_number,
        }
    }
}

impl FieldMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按别名顺序取第一个非空值
    ///
    /// 先精确匹配表头,全部未命中再做大小写不敏感匹配
    fn get_string(&self, row: &RawRow, aliases: &[&str]) -> Option<String> {
        for alias in aliases {
            if let Some(v) = self.cleaner.normalize_null(row.get(*alias).cloned()) {
                return Some(v);
            }
        }

        for alias in aliases {
            let found = row
                .iter()
                .filter(|(header, _)| header.trim().eq_ignore_ascii_case(alias))
                .find_map(|(_, v)| self.cleaner.normalize_null(Some(v.clone())));
            if found.is_some() {
                return found;
            }
        }

        None
    }
}
