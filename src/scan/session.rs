// ==========================================
// 库存二维码系统 - 扫描会话
// ==========================================
// 职责: 调用方持有的观测列表（管道中唯一的可变状态）
// 说明: 只在一批扫描结束后整体合并,无并发写入,不需要加锁
// ==========================================

use crate::domain::stock::{GroupedTotal, ScanObservation};
use crate::scan::aggregator::ScanAggregator;
use crate::scan::batch::ScanBatchOutcome;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanSession {
    observations: Vec<ScanObservation>,
    last_errors: Vec<String>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 合并一批扫描结果；错误列表替换为本批错误
    pub fn apply(&mut self, outcome: ScanBatchOutcome) {
        let existing = std::mem::take(&mut self.observations);
        self.observations = ScanAggregator::ingest(existing, outcome.observations);
        self.last_errors = outcome.errors;

        info!(
            batch_id = %outcome.batch_id,
            observations = self.observations.len(),
            errors = self.last_errors.len(),
            "扫描会话已更新"
        );
    }

    pub fn observations(&self) -> &[ScanObservation] {
        &self.observations
    }

    /// 最近一批的逐文件错误
    pub fn errors(&self) -> &[String] {
        &self.last_errors
    }

    pub fn grouped_totals(&self) -> Vec<GroupedTotal> {
        ScanAggregator::group_totals(&self.observations)
    }

    pub fn clear(&mut self) {
        self.observations.clear();
        self.last_errors.clear();
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
