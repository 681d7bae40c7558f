// ==========================================
// 库存二维码系统 - 库存导入器实现
// ==========================================
// 职责: 整合导入流程,从文件到库存记录列表
// 流程: 解析 → 映射 → 箱数展开 → 空结果占位
// 说明: 纯转换,无持久化；脏单元格回落默认值,不产生错误
// ==========================================

use crate::config::ImportSettings;
use crate::domain::stock::{BoxRuleCounts, ImportBatch, ImportReport, RawRow, StockRecord};
use crate::importer::box_expander::BoxExpander;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper as FieldMapperImpl;
use crate::importer::file_parser::{CsvParser, ExcelParser, SourceFormat};
use crate::importer::stock_importer_trait::{FieldMapper, FileParser, RowExpander, StockImporter};
use chrono::Utc;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// StockImporterImpl - 库存导入器实现
// ==========================================
pub struct StockImporterImpl {
    // 导入组件
    csv_parser: CsvParser,
    excel_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
    row_expander: Box<dyn RowExpander>,
}

impl Default for StockImporterImpl {
    fn default() -> Self {
        Self::from_settings(&ImportSettings::default())
    }
}

impl StockImporterImpl {
    /// 创建新的 StockImporter 实例
    ///
    /// # 参数
    /// - excel_parser: 表格文件解析器
    /// - field_mapper: 字段映射器
    /// - row_expander: 箱数展开器
    pub fn new(
        excel_parser: Box<dyn FileParser>,
        field_mapper: Box<dyn FieldMapper>,
        row_expander: Box<dyn RowExpander>,
    ) -> Self {
        Self {
            csv_parser: CsvParser::new(),
            excel_parser,
            field_mapper,
            row_expander,
        }
    }

    /// 按导入配置组装默认组件
    pub fn from_settings(settings: &ImportSettings) -> Self {
        Self::new(
            Box::new(ExcelParser),
            Box::new(FieldMapperImpl::new()),
            Box::new(BoxExpander::new(
                settings.large_expansion_warn_threshold,
                settings.max_records_per_row,
            )),
        )
    }

    /// 按扩展名选择 CSV / Excel 导入
    pub async fn import_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportReport> {
        match SourceFormat::detect(file_path.as_ref())? {
            SourceFormat::Csv => self.import_from_csv(file_path).await,
            SourceFormat::Spreadsheet => self.import_from_excel(file_path).await,
        }
    }

    /// 原始行 → 导入结果（映射 + 展开 + 占位）
    fn expand_rows(
        &self,
        raw_rows: Vec<RawRow>,
        file_name: Option<String>,
        start_time: Instant,
    ) -> ImportReport {
        let batch_id = Uuid::new_v4().to_string();
        let total_rows = raw_rows.len();
        info!(batch_id = %batch_id, file_name = ?file_name, total_rows, "开始展开库存记录");

        // === 步骤 1: 字段映射 + 箱数展开 ===
        debug!("步骤 1: 字段映射与箱数展开");
        let mut records: Vec<StockRecord> = Vec::new();
        let mut rule_counts = BoxRuleCounts::default();
        for (idx, row) in raw_rows.iter().enumerate() {
            let canonical = self.field_mapper.map_to_canonical(row, idx + 1);
            let expansion = self.row_expander.expand(&canonical);
            debug!(
                row_number = canonical.row_number,
                rule = %expansion.rule,
                count = expansion.records.len(),
                "行展开完成"
            );
            rule_counts.record(expansion.rule);
            records.extend(expansion.records);
        }

        // === 步骤 2: 空结果占位 ===
        let placeholder = records.is_empty();
        if placeholder {
            warn!(batch_id = %batch_id, "无可用数据行,使用空白占位记录");
            records.push(StockRecord::placeholder());
        }

        let elapsed_time = start_time.elapsed();
        let batch = ImportBatch {
            batch_id: batch_id.clone(),
            file_name,
            raw_rows: total_rows,
            record_count: records.len(),
            rule_counts,
            placeholder,
            imported_at: Utc::now(),
        };

        info!(
            batch_id = %batch_id,
            total = total_rows,
            records = batch.record_count,
            ignored_box = rule_counts.ignored,
            elapsed_ms = elapsed_time.as_millis(),
            "库存记录导入完成"
        );

        ImportReport {
            batch,
            records,
            elapsed_time,
        }
    }
}

fn file_name_of(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
}

#[async_trait::async_trait]
impl StockImporter for StockImporterImpl {
    /// 从 Excel 文件导入库存数据
    #[instrument(skip(self, file_path))]
    async fn import_from_excel<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportReport> {
        let start_time = Instant::now();
        let path = file_path.as_ref();
        info!(file_path = %path.display(), "开始解析 Excel 文件");

        let raw_rows = self.excel_parser.parse_to_raw_records(path).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;

        Ok(self.expand_rows(raw_rows, file_name_of(path), start_time))
    }

    /// 从 CSV 文件导入库存数据
    #[instrument(skip(self, file_path))]
    async fn import_from_csv<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportReport> {
        let start_time = Instant::now();
        let path = file_path.as_ref();
        info!(file_path = %path.display(), "开始解析 CSV 文件");

        let raw_rows = self.csv_parser.parse_to_raw_records(path).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;

        Ok(self.expand_rows(raw_rows, file_name_of(path), start_time))
    }

    async fn import_csv_text(
        &self,
        text: &str,
        file_name: Option<String>,
    ) -> ImportResult<ImportReport> {
        let start_time = Instant::now();
        let raw_rows = self.csv_parser.parse_text(text);
        Ok(self.expand_rows(raw_rows, file_name, start_time))
    }

    /// 批量导入多个文件（并发执行）
    async fn batch_import<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<Result<ImportReport, String>> {
        use futures::future::join_all;

        info!(count = file_paths.len(), "开始批量导入文件");

        let import_tasks = file_paths.into_iter().map(|path| {
            let path_str = path.as_ref().display().to_string();
            async move {
                match self.import_file(path).await {
                    Ok(report) => {
                        info!(
                            file = %path_str,
                            records = report.batch.record_count,
                            "文件导入成功"
                        );
                        Ok(report)
                    }
                    Err(e) => {
                        error!(file = %path_str, error = %e, "文件导入失败");
                        Err(format!("文件 {} 导入失败: {}", path_str, e))
                    }
                }
            }
        });

        // 并发执行所有导入任务
        let results = join_all(import_tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );

        results
    }
}
