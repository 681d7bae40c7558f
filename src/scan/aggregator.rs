// ==========================================
// 库存二维码系统 - 扫描汇总
// ==========================================
// 职责: 观测列表合并（按源文件替换）+ (型号, 批号) 分组汇总
// 红线: 同一源文件在列表中至多一条观测；重复扫描不重复计数
// ==========================================

use crate::domain::stock::{GroupedTotal, ScanObservation};
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::debug;

pub struct ScanAggregator;

impl ScanAggregator {
    /// 合并新观测
    ///
    /// # 规则
    /// - 源文件已存在: 原位替换（位置不变）
    /// - 否则追加到末尾
    pub fn ingest(
        existing: Vec<ScanObservation>,
        incoming: Vec<ScanObservation>,
    ) -> Vec<ScanObservation> {
        let mut merged = existing;
        let mut index: HashMap<String, usize> = HashMap::with_capacity(merged.len());
        for (pos, obs) in merged.iter().enumerate() {
            index.entry(obs.source_file.clone()).or_insert(pos);
        }

        let mut replaced = 0usize;
        for obs in incoming {
            match index.get(&obs.source_file) {
                Some(&pos) => {
                    merged[pos] = obs;
                    replaced += 1;
                }
                None => {
                    index.insert(obs.source_file.clone(), merged.len());
                    merged.push(obs);
                }
            }
        }

        debug!(total = merged.len(), replaced, "观测合并完成");
        merged
    }

    /// 按 (型号, 批号) 分组汇总,组顺序 = 首次出现顺序
    pub fn group_totals(observations: &[ScanObservation]) -> Vec<GroupedTotal> {
        let mut groups: IndexMap<(&str, &str), GroupedTotal> = IndexMap::new();

        for obs in observations {
            let record = &obs.record;
            let group = groups
                .entry((record.model_name.as_str(), record.lot.as_str()))
                .or_insert_with(|| GroupedTotal {
                    model_name: record.model_name.clone(),
                    lot: record.lot.clone(),
                    total_quantity: 0,
                    files: Vec::new(),
                });

            group.total_quantity += u64::from(record.quantity);
            if !group.files.contains(&obs.source_file) {
                group.files.push(obs.source_file.clone());
            }
        }

        groups.into_values().collect()
    }
}
