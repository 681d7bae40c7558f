// ==========================================
// 库存二维码系统 - 库存导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 管道: 解析 → 映射 → 箱数展开 → 空结果占位
// ==========================================

use crate::domain::stock::{CanonicalRow, ImportReport, RawRow, StockRecord};
use crate::domain::types::{BoxRule, Quantity};
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// StockImporter Trait
// ==========================================
// 用途: 库存导入主接口
// 实现者: StockImporterImpl
#[async_trait]
pub trait StockImporter: Send + Sync {
    /// 从 Excel 文件导入（仅第一个工作表,首行为表头）
    ///
    /// # 返回
    /// - Ok(ImportReport): 展开后的记录 + 批次统计
    /// - Err: 文件不存在、格式不支持、解析失败
    async fn import_from_excel<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportReport>;

    /// 从 CSV 文件导入
    async fn import_from_csv<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportReport>;

    /// 从内存中的 CSV 文本导入
    ///
    /// # 参数
    /// - text: 完整 CSV 文本（首行为表头,CRLF / LF 均可）
    /// - file_name: 仅用于批次信息
    async fn import_csv_text(
        &self,
        text: &str,
        file_name: Option<String>,
    ) -> ImportResult<ImportReport>;

    /// 批量导入多个文件（并发执行,互不影响）
    ///
    /// # 返回
    /// - 与输入顺序一致的结果列表,失败项为错误描述
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<Result<ImportReport, String>>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行记录（HashMap<列名, 值>）
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// LineTokenizer Trait
// ==========================================
// 用途: 单行分隔文本分词
// 实现者: DelimitedTextTokenizer
pub trait LineTokenizer: Send + Sync {
    /// 一行文本 → 字段列表（至少 1 个字段）
    fn tokenize_line(&self, line: &str) -> Vec<String>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 字段映射接口（阶段 1）
// 实现者: FieldMapper
pub trait FieldMapper: Send + Sync {
    /// 将原始行映射为规范行
    ///
    /// 缺失字段回落默认值,不会失败
    fn map_to_canonical(&self, row: &RawRow, row_number: usize) -> CanonicalRow;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 单元格清洗接口
// 实现者: DataCleaner
pub trait DataCleaner: Send + Sync {
    /// 标准化 NULL 值（空字符串/空白 → None）
    fn normalize_null(&self, value: Option<String>) -> Option<String>;

    /// 解析数量单元格（缺失 / "-" → Unset,失败 → 1）
    fn parse_quantity(&self, raw: Option<&str>) -> Quantity;

    /// 前导整数解析（箱数列）
    fn parse_leading_int(&self, value: &str) -> Option<i64>;
}

// ==========================================
// RowExpander Trait
// ==========================================
// 用途: 箱数展开接口（阶段 2）
// 实现者: BoxExpander
pub trait RowExpander: Send + Sync {
    /// 一行规范数据 → 至少一条库存记录
    fn expand(&self, row: &CanonicalRow) -> BoxExpansion;
}

/// 单行展开结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxExpansion {
    pub rule: BoxRule,
    pub records: Vec<StockRecord>,
}

impl BoxExpansion {
    pub fn single(rule: BoxRule, record: StockRecord) -> Self {
        Self {
            rule,
            records: vec![record],
        }
    }
}
