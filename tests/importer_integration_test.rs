// ==========================================
// StockImporter 集成测试
// ==========================================
// 测试目标: 验证从文件到库存记录的完整导入流程
// ==========================================


use stock_qr_tally::codec::QrCodec;
use stock_qr_tally::config::ImportSettings;
use stock_qr_tally::domain::StockRecord;
use stock_qr_tally::importer::{
    FileParser, ImportError, StockImporter, StockImporterImpl, UniversalFileParser,
};
use stock_qr_tally::logging;
use test_helpers::{fixture_path, write_temp_file, STOCK_CSV};

#[tokio::test]
async fn test_import_csv_file_expands_boxes() {
    logging::init_test();

    let (_file, path) = write_temp_file(".csv", STOCK_CSV.as_bytes()).expect("写入临时文件失败");
    let importer = StockImporterImpl::default();

    let report = importer.import_from_csv(&path).await.expect("导入应成功");

    // 10+2000 → 11 条；- / 15 → 1 条；1,200 × 3 → 3 条；N/A → 1 条
    assert_eq!(report.batch.raw_rows, 4);
    assert_eq!(report.records.len(), 16);
    assert!(report.batch.file_name.as_deref().is_some_and(|n| n.ends_with(".csv")));

    let first = &report.records[0];
    assert_eq!(first.model_name, "CM-4532");
    assert_eq!(first.quantity, 500);
    assert_eq!(first.erp.as_deref(), Some("ERP-01"));
    assert_eq!(report.records[10].quantity, 2000);

    assert_eq!(report.records[11], StockRecord::new("CM-7710", "L2407", 15));
    assert_eq!(report.records[12], StockRecord::new("CM, 9", "L2408", 1200));
    assert_eq!(report.records[15], StockRecord::new("CM-1001", "L2409", 40));
}

#[tokio::test]
async fn test_import_csv_with_bom_and_blank_lines() {
    let mut content = vec![0xEF, 0xBB, 0xBF];
    content.extend_from_slice(b"Item,Lot,Qty\n\nA,L1,5\n   \nB,L2\n");
    let (_file, path) = write_temp_file(".csv", &content).unwrap();

    let report = StockImporterImpl::default()
        .import_file(&path)
        .await
        .unwrap();

    // 缺失的 Qty 单元格 → 未设置 → 无箱数时解析为 0
    assert_eq!(
        report.records,
        vec![StockRecord::new("A", "L1", 5), StockRecord::new("B", "L2", 0)]
    );
}

// stock_sheet.xlsx: 第一个工作表 "Stock" 含数字单元格与一行空行；
// 第二个工作表 "Archive" 不应被读取
#[test]
fn test_excel_parser_reads_first_sheet_only() {
    let rows = UniversalFileParser
        .parse_to_raw_records(&fixture_path("stock_sheet.xlsx"))
        .expect("解析工作簿失败");

    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|row| row.get("Item").map(String::as_str) != Some("OLD-1")));

    // 数字单元格按整数文本呈现
    assert_eq!(rows[0].get("Lot").map(String::as_str), Some("2406"));
    assert_eq!(rows[0].get("Qty").map(String::as_str), Some("18000"));
    assert_eq!(rows[0].get("Box").map(String::as_str), Some("5"));
    assert_eq!(rows[1].get("Qty").map(String::as_str), Some("-"));
    assert_eq!(rows[2].get("Box").map(String::as_str), Some("10+2000"));
}

#[tokio::test]
async fn test_import_excel_fixture_expands_boxes() {
    logging::init_test();

    let report = StockImporterImpl::default()
        .import_from_excel(fixture_path("stock_sheet.xlsx"))
        .await
        .expect("导入应成功");

    // 5 × 18000；- / 15 → 1 条；10+2000 → 11 条；N/A → 1 条
    assert_eq!(report.batch.raw_rows, 4);
    assert_eq!(report.records.len(), 18);
    assert!(!report.batch.placeholder);

    let mut first = StockRecord::new("CM-4532", "2406", 18000);
    first.erp = Some("ERP-01".to_string());
    assert_eq!(report.records[..5].to_vec(), vec![first; 5]);

    assert_eq!(report.records[5], StockRecord::new("CM-7710", "L2407", 15));
    assert!(report.records[6..16]
        .iter()
        .all(|r| *r == StockRecord::new("CM-9", "L2408", 500)));
    assert_eq!(report.records[16], StockRecord::new("CM-9", "L2408", 2000));
    assert_eq!(report.records[17], StockRecord::new("CM-1001", "L2409", 40));

    let counts = &report.batch.rule_counts;
    assert_eq!(counts.box_count, 1);
    assert_eq!(counts.box_as_quantity, 1);
    assert_eq!(counts.count_plus_partial, 1);
    assert_eq!(counts.ignored, 1);
}

#[tokio::test]
async fn test_import_header_only_gives_placeholder() {
    let (_file, path) = write_temp_file(".csv", b"Item,Lot,Qty,Box\n").unwrap();
    let report = StockImporterImpl::default()
        .import_from_csv(&path)
        .await
        .unwrap();

    assert!(report.batch.placeholder);
    assert_eq!(report.records, vec![StockRecord::placeholder()]);
}

#[tokio::test]
async fn test_import_respects_max_records_per_row() {
    let importer = StockImporterImpl::from_settings(&ImportSettings {
        large_expansion_warn_threshold: 2,
        max_records_per_row: 5,
    });
    let report = importer
        .import_csv_text("Item,Lot,Qty,Box\nA,L1,10,4\nB,L2,10,6\n", None)
        .await
        .unwrap();

    assert_eq!(report.records.len(), 4 + 1);
    assert_eq!(report.batch.rule_counts.box_count, 1);
    assert_eq!(report.batch.rule_counts.ignored, 1);
}

#[tokio::test]
async fn test_import_missing_file() {
    let result = StockImporterImpl::default()
        .import_from_csv("/definitely/not/here.csv")
        .await;
    assert!(matches!(result, Err(ImportError::FileNotFound(_))));
}

#[test]
fn test_universal_parser_rejects_unknown_extension() {
    let (_file, path) = write_temp_file(".txt", b"Item\nA\n").unwrap();
    let result = UniversalFileParser.parse_to_raw_records(&path);
    assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_batch_import_isolates_failures() {
    let (_a, path_a) = write_temp_file(".csv", b"Item,Lot,Qty\nA,L1,5\n").unwrap();
    let (_b, path_b) = write_temp_file(".csv", STOCK_CSV.as_bytes()).unwrap();
    let missing = path_a.with_file_name("missing-stock.csv");

    let results = StockImporterImpl::default()
        .batch_import(vec![path_a, missing, path_b])
        .await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().records.len(), 1);
    assert!(results[1].is_err());
    assert_eq!(results[2].as_ref().unwrap().records.len(), 16);
}

#[tokio::test]
async fn test_imported_records_round_trip_through_qr_payload() {
    let report = StockImporterImpl::default()
        .import_csv_text(STOCK_CSV, None)
        .await
        .unwrap();

    for record in &report.records {
        let decoded = QrCodec::decode(&QrCodec::encode(record).unwrap()).expect("载荷应可解码");
        assert_eq!(decoded.model_name, record.model_name);
        assert_eq!(decoded.lot, record.lot);
        assert_eq!(decoded.quantity, record.quantity);
    }
}
