// ==========================================
// 库存二维码系统 - 表格导出
// ==========================================
// 扫描明细: sequence_number,model_name,lot,quantity（序号从 1 开始）
// 分组汇总: model_name,lot,total_quantity,files（文件名以 ; 连接）
// ==========================================

use crate::domain::stock::{GroupedTotal, ScanObservation};
use crate::export::error::{ExportError, ExportResult};
use csv::Writer;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub const OBSERVATION_HEADERS: [&str; 4] = ["sequence_number", "model_name", "lot", "quantity"];
pub const GROUPED_TOTAL_HEADERS: [&str; 4] = ["model_name", "lot", "total_quantity", "files"];

/// 扫描明细写入任意 writer
pub fn write_observations_csv<W: Write>(
    writer: W,
    observations: &[ScanObservation],
) -> ExportResult<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(OBSERVATION_HEADERS)?;

    for (idx, obs) in observations.iter().enumerate() {
        wtr.write_record([
            (idx + 1).to_string(),
            obs.record.model_name.clone(),
            obs.record.lot.clone(),
            obs.record.quantity.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// 分组汇总写入任意 writer
pub fn write_grouped_totals_csv<W: Write>(
    writer: W,
    totals: &[GroupedTotal],
) -> ExportResult<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(GROUPED_TOTAL_HEADERS)?;

    for group in totals {
        wtr.write_record([
            group.model_name.clone(),
            group.lot.clone(),
            group.total_quantity.to_string(),
            group.files.join(";"),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// 确保导出目录存在（不存在则创建）
pub fn ensure_export_dir(dir: &Path) -> ExportResult<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(ExportError::InvalidTarget(dir.display().to_string()));
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// 扫描明细导出到文件
pub fn export_observations(path: &Path, observations: &[ScanObservation]) -> ExportResult<()> {
    let file = std::fs::File::create(path)?;
    write_observations_csv(file, observations)?;
    info!(path = %path.display(), rows = observations.len(), "扫描明细已导出");
    Ok(())
}

/// 分组汇总导出到文件
pub fn export_grouped_totals(path: &Path, totals: &[GroupedTotal]) -> ExportResult<()> {
    let file = std::fs::File::create(path)?;
    write_grouped_totals_csv(file, totals)?;
    info!(path = %path.display(), groups = totals.len(), "分组汇总已导出");
    Ok(())
}
