// ==========================================
// 扫描汇总集成测试
// ==========================================
// 测试目标: 图片批处理 → 会话合并 → 分组汇总 → 表格导出
// ==========================================


use stock_qr_tally::codec::QrCodec;
use stock_qr_tally::domain::StockRecord;
use stock_qr_tally::export::{export_grouped_totals, export_observations, plan_archive_entries};
use stock_qr_tally::scan::{QrImageDecoder, ScanBatchProcessor, ScanResult, ScanSession};
use test_helpers::write_scan_images;

/// 测试解码器: 文件内容即二维码文本,空文件视为未找到二维码
struct PlainTextDecoder;

impl QrImageDecoder for PlainTextDecoder {
    fn decode_image(&self, bytes: &[u8]) -> ScanResult<Option<String>> {
        if bytes.is_empty() {
            Ok(None)
        } else {
            Ok(Some(String::from_utf8_lossy(bytes).into_owned()))
        }
    }
}

#[tokio::test]
async fn test_scan_rescan_and_totals() {
    let a = QrCodec::encode(&StockRecord::new("A", "L1", 5)).unwrap();
    let b = QrCodec::encode(&StockRecord::new("B", "L2", 3)).unwrap();
    let (dir, paths) = write_scan_images(&[
        ("f1.jpg", a.as_str()),
        ("f2.jpg", b.as_str()),
        ("f3.jpg", "A|L1|7"),
        ("f4.jpg", ""),
        ("f5.jpg", "not a label"),
    ])
    .unwrap();

    let processor = ScanBatchProcessor::new(PlainTextDecoder);
    let mut session = ScanSession::new();

    session.apply(processor.process_files(&paths).await);
    assert_eq!(session.len(), 3);
    assert_eq!(session.errors().len(), 2);
    assert!(session.errors()[0].starts_with("f4.jpg: "));
    assert!(session.errors()[1].starts_with("f5.jpg: "));

    // 同一批再扫一次: 数量不翻倍
    session.apply(processor.process_files(&paths).await);
    assert_eq!(session.len(), 3);

    let totals = session.grouped_totals();
    assert_eq!(totals.len(), 2);
    assert_eq!((totals[0].model_name.as_str(), totals[0].total_quantity), ("A", 12));
    assert_eq!(totals[0].files, vec!["f1.jpg", "f3.jpg"]);
    assert_eq!((totals[1].model_name.as_str(), totals[1].total_quantity), ("B", 3));

    // 重新扫描 f3（内容变更）: 原位替换
    std::fs::write(dir.path().join("f3.jpg"), "A|L1|1").unwrap();
    session.apply(processor.process_files(&[dir.path().join("f3.jpg")]).await);
    assert_eq!(session.observations()[2].record.quantity, 1);
    assert_eq!(session.grouped_totals()[0].total_quantity, 6);
}

#[tokio::test]
async fn test_export_after_scan() {
    let (_dir, paths) = write_scan_images(&[("f1.jpg", "A|L1|5"), ("f2.jpg", "A|L1|7")]).unwrap();
    let mut session = ScanSession::new();
    session.apply(
        ScanBatchProcessor::new(PlainTextDecoder)
            .process_files(&paths)
            .await,
    );

    let out = tempfile::tempdir().unwrap();
    let records_path = out.path().join("scanned_qrcodes.csv");
    let totals_path = out.path().join("scanned_totals.csv");
    export_observations(&records_path, session.observations()).unwrap();
    export_grouped_totals(&totals_path, &session.grouped_totals()).unwrap();

    assert_eq!(
        std::fs::read_to_string(&records_path).unwrap(),
        "sequence_number,model_name,lot,quantity\n1,A,L1,5\n2,A,L1,7\n"
    );
    assert_eq!(
        std::fs::read_to_string(&totals_path).unwrap(),
        "model_name,lot,total_quantity,files\nA,L1,12,f1.jpg;f2.jpg\n"
    );
}

#[test]
fn test_archive_entries_decode_back() {
    let records = vec![StockRecord::new("CM 1", "L/1", 500); 3];
    let entries = plan_archive_entries(&records, "png").unwrap();

    assert_eq!(entries[2].file_name, "3_CM_1_L_1.png");
    for entry in &entries {
        assert_eq!(QrCodec::decode(&entry.payload), Some(records[0].clone()));
    }
}
