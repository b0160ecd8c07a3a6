// ==========================================
// 内控管理分析系统 - 工单聚合引擎
// ==========================================
// 职责: 原始工单 → 状态归一化 → 按 (账号, 姓名, 日期) 计数
// 约定: 后台工单在一切处理之前整体剔除;
//       状态映射全覆盖, 表外状态归入未知;
//       四个进展桶全部物化为 0, 无隐式空值
// ==========================================

use crate::domain::{StatusBucket, WorkOrderDailyAggregate, WorkOrderRecord};
use crate::importer::{cell, require_columns, ImportResult, RawRow};
use std::collections::BTreeMap;
use tracing::debug;

/// 工单数据源名（表头即首行）
pub const WORK_ORDER_SOURCE: &str = "工单履行明细";
pub const WORK_ORDER_HEADER_OFFSET: usize = 0;
pub const WORK_ORDER_REQUIRED_COLUMNS: &[&str] =
    &["工单类别", "责任人账号", "责任人姓名", "工单日期", "任务状态"];

/// 整体剔除的工单类别
const BACK_OFFICE_CATEGORY: &str = "后台工单";

// ==========================================
// WorkOrderAggregator - 工单聚合器
// ==========================================
pub struct WorkOrderAggregator;

impl WorkOrderAggregator {
    /// 解析工单原始行（剔除后台工单）
    pub fn load_records(rows: &[RawRow]) -> ImportResult<Vec<WorkOrderRecord>> {
        require_columns(WORK_ORDER_SOURCE, rows, WORK_ORDER_REQUIRED_COLUMNS)?;

        let mut records = Vec::new();
        let mut excluded = 0usize;

        for row in rows {
            let order_category =
                cell::clean_text(row.get("工单类别").map(String::as_str).unwrap_or(""));
            if order_category == BACK_OFFICE_CATEGORY {
                excluded += 1;
                continue;
            }

            records.push(WorkOrderRecord {
                responsible_account: cell::clean_text(
                    row.get("责任人账号").map(String::as_str).unwrap_or(""),
                ),
                responsible_name: cell::clean_text(
                    row.get("责任人姓名").map(String::as_str).unwrap_or(""),
                ),
                order_date: row.get("工单日期").and_then(|v| cell::parse_date(v)),
                raw_status: cell::clean_text(row.get("任务状态").map(String::as_str).unwrap_or("")),
                order_category,
            });
        }

        debug!(total = records.len(), excluded, "工单记录加载完成");
        Ok(records)
    }

    /// 按 (责任人账号, 责任人姓名, 工单日期) 聚合四个进展桶计数
    ///
    /// 日期无效的记录无法入组, 跳过;
    /// BTreeMap 分组保证输出顺序与输入行序无关
    pub fn aggregate(records: &[WorkOrderRecord]) -> Vec<WorkOrderDailyAggregate> {
        let mut groups: BTreeMap<(String, String, String), [u32; 4]> = BTreeMap::new();

        for record in records {
            let Some(date) = record.order_date else {
                continue;
            };
            let date = date.format("%Y-%m-%d").to_string();

            let key = (
                record.responsible_account.clone(),
                record.responsible_name.clone(),
                date,
            );
            let counts = groups.entry(key).or_insert([0u32; 4]);

            match StatusBucket::from_raw_status(&record.raw_status) {
                StatusBucket::Pending => counts[0] += 1,
                StatusBucket::Complete => counts[1] += 1,
                StatusBucket::Passed => counts[2] += 1,
                StatusBucket::Unknown => counts[3] += 1,
            }
        }

        groups
            .into_iter()
            .map(
                |((canonical_account, responsible_name, date), counts)| WorkOrderDailyAggregate {
                    canonical_account,
                    responsible_name,
                    date,
                    pending_count: counts[0],
                    complete_count: counts[1],
                    passed_count: counts[2],
                    unknown_count: counts[3],
                },
            )
            .collect()
    }
}
