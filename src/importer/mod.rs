// ==========================================
// 库存二维码系统 - 导入层
// ==========================================
// 职责: 表格 / CSV → 库存记录列表
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod box_expander;
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod stock_importer_impl;
pub mod stock_importer_trait;
pub mod tokenizer;

// 重导出核心类型
pub use box_expander::BoxExpander;
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{CsvParser, ExcelParser, SourceFormat, UniversalFileParser};
pub use stock_importer_impl::StockImporterImpl;
pub use tokenizer::DelimitedTextTokenizer;

// 重导出 Trait 接口
pub use stock_importer_trait::{
    BoxExpansion, DataCleaner, FieldMapper, FileParser, LineTokenizer, RowExpander,
    StockImporter,
};
