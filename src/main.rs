// ==========================================
// 库存二维码系统 - 命令行入口
// ==========================================
// 子命令:
//   import     表格/CSV → 库存记录 / 二维码载荷 / 归档条目
//   decode     解码二维码文本
//   reconcile  汇总外部解码器产出的清单（file,payload）
// ==========================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use stock_qr_tally::codec::QrCodec;
use stock_qr_tally::config::AppConfig;
use stock_qr_tally::export::{
    ensure_export_dir, export_grouped_totals, export_observations, plan_archive_entries,
};
use stock_qr_tally::i18n;
use stock_qr_tally::importer::{StockImporter, StockImporterImpl};
use stock_qr_tally::scan::{process_decoded, DecodedScan, ScanSession};

#[derive(Parser, Debug)]
#[command(name = "stock-qr-tally", version, about = "Warehouse stock QR label and scan tally tool")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Message locale (en, th, zh-CN); overrides the config file
    #[arg(long, global = true)]
    locale: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expand a stock sheet (xlsx/xls/ods/csv) into one record per label
    Import {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = Emit::Records)]
        emit: Emit,
        /// Write output here instead of STDOUT
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Decode scanned QR payload text
    Decode {
        #[arg(required = true)]
        payloads: Vec<String>,
    },
    /// Tally a manifest of decoded images (CSV header: file,payload)
    Reconcile {
        manifest: PathBuf,
        /// Directory for the records / totals CSV exports
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Emit {
    /// Expanded records as JSON
    Records,
    /// One QR payload per line
    Payloads,
    /// Archive entries (file name + payload) as JSON
    Archive,
}

/// 清单行；payload 为空表示该图片未找到二维码
#[derive(Debug, Deserialize)]
struct ManifestRow {
    file: String,
    payload: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    stock_qr_tally::logging::init_with_default("warn");

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("加载配置失败")?;
    i18n::set_locale(cli.locale.as_deref().unwrap_or(&config.locale));

    tracing::info!(version = stock_qr_tally::VERSION, "{} 启动", stock_qr_tally::APP_NAME);

    match cli.command {
        Command::Import { file, emit, out } => run_import(&config, &file, emit, out.as_deref()).await,
        Command::Decode { payloads } => {
            run_decode(&payloads);
            Ok(())
        }
        Command::Reconcile { manifest, export } => {
            run_reconcile(&config, &manifest, export.as_deref())
        }
    }
}

async fn run_import(config: &AppConfig, file: &Path, emit: Emit, out: Option<&Path>) -> Result<()> {
    let importer = StockImporterImpl::from_settings(&config.import);
    let report = importer
        .import_file(file)
        .await
        .with_context(|| format!("导入失败: {}", file.display()))?;

    if report.batch.placeholder {
        eprintln!("{}", i18n::t("import.empty_result"));
    }

    let rendered = match emit {
        Emit::Records => serde_json::to_string_pretty(&report.records)?,
        Emit::Payloads => report
            .records
            .iter()
            .map(QrCodec::encode)
            .collect::<Result<Vec<_>, _>>()?
            .join("\n"),
        Emit::Archive => serde_json::to_string_pretty(&plan_archive_entries(
            &report.records,
            &config.export.image_extension,
        )?)?,
    };

    match out {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("写入失败: {}", path.display()))?,
        None => println!("{rendered}"),
    }
    Ok(())
}

fn run_decode(payloads: &[String]) {
    for payload in payloads {
        match QrCodec::decode_detailed(payload) {
            Ok(record) => match serde_json::to_string(&record) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("{payload}: {e}"),
            },
            Err(e) => eprintln!("{payload}: {e}"),
        }
    }
}

fn run_reconcile(config: &AppConfig, manifest: &Path, export_dir: Option<&Path>) -> Result<()> {
    let mut reader = csv::Reader::from_path(manifest)
        .with_context(|| format!("无法打开清单: {}", manifest.display()))?;

    let mut items = Vec::new();
    for row in reader.deserialize::<ManifestRow>() {
        let row = row.context("清单格式错误")?;
        let payload = row.payload.filter(|p| !p.trim().is_empty());
        items.push(DecodedScan::new(row.file, payload));
    }

    let mut session = ScanSession::new();
    session.apply(process_decoded(items));

    for group in session.grouped_totals() {
        println!(
            "{}\t{}\t{}\t{}",
            group.model_name,
            group.lot,
            group.total_quantity,
            group.files.join(";")
        );
    }
    for error in session.errors() {
        eprintln!("{error}");
    }

    if let Some(dir) = export_dir {
        ensure_export_dir(dir)?;
        export_observations(
            &dir.join(&config.export.records_file_name),
            session.observations(),
        )?;
        export_grouped_totals(
            &dir.join(&config.export.totals_file_name),
            &session.grouped_totals(),
        )?;
    }
    Ok(())
}
