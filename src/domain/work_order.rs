// ==========================================
// 内控管理分析系统 - 工单实体
// ==========================================

use crate::domain::attendance::AttendanceRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 工单原始记录（只读）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrderRecord {
    /// 责任人账号（已去空白字符串化）
    pub responsible_account: String,
    /// 责任人姓名
    pub responsible_name: String,
    /// 工单日期（无效值为 None）
    pub order_date: Option<NaiveDate>,
    /// 任务状态（原始值）
    pub raw_status: String,
    /// 工单类别
    pub order_category: String,
}

/// 工单按日聚合: 每 (账号, 姓名, 日期) 一行
///
/// 四个进展桶全部物化, 无隐式空值;
/// 键唯一性由聚合过程保证
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrderDailyAggregate {
    /// 责任人账号（归一化, 用于下游键匹配）
    pub canonical_account: String,
    /// 责任人姓名
    pub responsible_name: String,
    /// 工单日期 (YYYY-MM-DD)
    pub date: String,
    /// 待执行数量
    pub pending_count: u32,
    /// 完成数量
    pub complete_count: u32,
    /// 通过数量
    pub passed_count: u32,
    /// 未知数量
    pub unknown_count: u32,
}

impl WorkOrderDailyAggregate {
    /// 复合键: 账号_日期
    pub fn composite_key(&self) -> String {
        format!("{}_{}", self.canonical_account, self.date)
    }
}

/// 核对结果行: 出勤记录 + 匹配到的四个进展计数
///
/// 复合键未命中时四个计数均为 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledRecord {
    pub attendance: AttendanceRecord,
    pub pending_count: u32,
    pub complete_count: u32,
    pub passed_count: u32,
    pub unknown_count: u32,
}

impl ReconciledRecord {
    /// 完成+通过 之和, 上传人效能排名的统计口径
    pub fn effective_count(&self) -> u32 {
        self.complete_count + self.passed_count
    }
}
