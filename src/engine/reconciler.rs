// ==========================================
// 内控管理分析系统 - 出勤/工单核对引擎
// ==========================================
// 职责: 复合键 (账号_日期) 哈希连接, O(n+m)
// 红线: 纯函数 — 相同输入必产生相同输出;
//       复合键辅助结构不进入输出;
//       未命中键四个计数取 0
// ==========================================

use crate::domain::{AttendanceRecord, ReconciledRecord, WorkOrderDailyAggregate};
use std::collections::HashMap;
use tracing::debug;

// ==========================================
// Reconciler - 核对器
// ==========================================
pub struct Reconciler;

impl Reconciler {
    /// 将出勤记录与工单日聚合按复合键连接
    ///
    /// 聚合侧构建 O(m) 查找表, 出勤侧逐行 O(1) 探查;
    /// 出勤侧同键重复行不去重, 各自独立取同一组计数
    pub fn reconcile(
        attendance: &[AttendanceRecord],
        aggregates: &[WorkOrderDailyAggregate],
    ) -> Vec<ReconciledRecord> {
        // 复合键 → 四桶计数, 仅存活于本次调用
        let mut counts_by_key: HashMap<String, [u32; 4]> =
            HashMap::with_capacity(aggregates.len());
        for agg in aggregates {
            counts_by_key.insert(
                agg.composite_key(),
                [
                    agg.pending_count,
                    agg.complete_count,
                    agg.passed_count,
                    agg.unknown_count,
                ],
            );
        }

        let mut matched = 0usize;
        let result = attendance
            .iter()
            .map(|record| {
                let counts = record
                    .composite_key()
                    .and_then(|key| counts_by_key.get(&key).copied())
                    .unwrap_or([0, 0, 0, 0]);
                if counts != [0, 0, 0, 0] {
                    matched += 1;
                }

                ReconciledRecord {
                    attendance: record.clone(),
                    pending_count: counts[0],
                    complete_count: counts[1],
                    passed_count: counts[2],
                    unknown_count: counts[3],
                }
            })
            .collect();

        debug!(
            attendance = attendance.len(),
            aggregates = aggregates.len(),
            matched,
            "出勤/工单核对完成"
        );

        result
    }
}
