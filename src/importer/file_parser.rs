// ==========================================
// 库存二维码系统 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx/.xlsm/.xls/.ods) / CSV (.csv)
// 输出: 原始行（表头 → 单元格文本）,跳过空行
// ==========================================

use crate::domain::stock::RawRow;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::stock_importer_trait::{FileParser, LineTokenizer};
use crate::importer::tokenizer::DelimitedTextTokenizer;
use calamine::{open_workbook_auto, Reader};
use std::path::Path;
use tracing::debug;

const EXCEL_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 按扩展名识别的导入源格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Spreadsheet,
}

impl SourceFormat {
    /// 按扩展名识别（大小写不敏感）；其他扩展名 → UnsupportedFormat
    pub fn detect(path: &Path) -> ImportResult<Self> {
        let ext = extension_of(path);
        match ext.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            e if EXCEL_EXTENSIONS.contains(&e) => Ok(SourceFormat::Spreadsheet),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ImportError::FileNotFound(path.display().to_string()))
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser {
    tokenizer: DelimitedTextTokenizer,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            tokenizer: DelimitedTextTokenizer,
        }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析完整 CSV 文本
    ///
    /// 首行为表头；按 LF 分行并去掉行尾 CR；空白行跳过；缺少的尾部单元格补空串
    pub fn parse_text(&self, text: &str) -> Vec<RawRow> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l));

        let headers: Vec<String> = match lines.next() {
            Some(header_line) => self.tokenizer.tokenize_line(header_line),
            None => return Vec::new(),
        };

        let mut records = Vec::new();
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }

            let fields = self.tokenizer.tokenize_line(line);
            let row_map: RawRow = headers
                .iter()
                .enumerate()
                .map(|(col_idx, header)| {
                    let value = fields.get(col_idx).cloned().unwrap_or_default();
                    (header.clone(), value)
                })
                .collect();

            records.push(row_map);
        }

        debug!(headers = headers.len(), rows = records.len(), "CSV 文本解析完成");
        records
    }
}

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        ensure_exists(file_path)?;

        // 检查扩展名
        if SourceFormat::detect(file_path)? != SourceFormat::Csv {
            return Err(ImportError::UnsupportedFormat(extension_of(file_path)));
        }

        // 非 UTF-8 字节按替换字符处理,不中断导入
        let bytes = std::fs::read(file_path)?;
        let text = String::from_utf8_lossy(&bytes);

        Ok(self.parse_text(&text))
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        ensure_exists(file_path)?;

        // 检查扩展名
        if SourceFormat::detect(file_path)? != SourceFormat::Spreadsheet {
            return Err(ImportError::UnsupportedFormat(extension_of(file_path)));
        }

        // 打开工作簿（按扩展名自动识别格式）
        let mut workbook = open_workbook_auto(file_path)?;

        // 只读第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）；空表 → 无数据
        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            return Ok(Vec::new());
        };

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        // 读取数据行
        let mut records = Vec::new();
        for data_row in rows {
            let mut row_map = RawRow::new();

            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), cell.to_string().trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        debug!(sheet = %sheet_name, rows = records.len(), "Excel 解析完成");
        Ok(records)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        match SourceFormat::detect(file_path)? {
            SourceFormat::Csv => CsvParser::new().parse_to_raw_records(file_path),
            SourceFormat::Spreadsheet => ExcelParser.parse_to_raw_records(file_path),
        }
    }
}
