// ==========================================
// 内控管理分析系统 - 领域类型定义
// ==========================================
// 红线: 核查结论是枚举值, 不是自由字符串
// 显示文案与导出报表中的原始措辞保持一致
// ==========================================

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 任务进展桶 (Status Bucket)
// ==========================================
// 工单原始状态归一化后的四个目标桶
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatusBucket {
    Pending,  // 待执行
    Complete, // 完成
    Passed,   // 通过
    Unknown,  // 未知
}

impl StatusBucket {
    /// 原始工单状态 → 进展桶（全覆盖: 表外状态一律归入未知）
    pub fn from_raw_status(raw: &str) -> StatusBucket {
        match raw.trim() {
            "测试中" | "待执行" | "已分配" | "已接纳" | "已开始" | "已指派" | "执行中" => {
                StatusBucket::Pending
            }
            "第三方上传完成" | "分析失败" | "分析中" | "评审不通过" | "评审中"
            | "审核不通过" => StatusBucket::Complete,
            "审核通过" | "已关闭" | "已完成" => StatusBucket::Passed,
            _ => StatusBucket::Unknown,
        }
    }
}

impl fmt::Display for StatusBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusBucket::Pending => write!(f, "待执行"),
            StatusBucket::Complete => write!(f, "完成"),
            StatusBucket::Passed => write!(f, "通过"),
            StatusBucket::Unknown => write!(f, "未知"),
        }
    }
}

// ==========================================
// 工作时长核查结论 (Work Time Verdict)
// ==========================================
// 按固定优先级的首个命中条件产生, DataError 为防御性兜底
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WorkTimeVerdict {
    LateStart(NaiveTime), // 晚于阈值时刻出车
    MissingStartPunch,    // 未开始打卡
    MissingEndPunch,      // 未结束打卡
    CrossDayPunch,        // 跨天打卡
    LeftEarly,            // 提前下班
    ExceedsMaxHours(f64), // 工作时长超上限
    Normal,               // 正常
    PunchOnlyNoTrip,      // 只打卡不出车
    DataError,            // 数据错误（兜底, 正常数据不应出现）
}

impl WorkTimeVerdict {
    pub fn is_normal(&self) -> bool {
        matches!(self, WorkTimeVerdict::Normal)
    }
}

impl fmt::Display for WorkTimeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkTimeVerdict::LateStart(threshold) => {
                write!(f, "晚于{}出车", threshold.format("%H:%M:%S"))
            }
            WorkTimeVerdict::MissingStartPunch => write!(f, "未开始打卡"),
            WorkTimeVerdict::MissingEndPunch => write!(f, "未结束打卡"),
            WorkTimeVerdict::CrossDayPunch => write!(f, "跨天打卡"),
            WorkTimeVerdict::LeftEarly => write!(f, "提前下班"),
            WorkTimeVerdict::ExceedsMaxHours(max) => write!(f, "工作时长超{}小时", max),
            WorkTimeVerdict::Normal => write!(f, "正常"),
            WorkTimeVerdict::PunchOnlyNoTrip => write!(f, "只打卡不出车"),
            WorkTimeVerdict::DataError => write!(f, "数据错误"),
        }
    }
}

// ==========================================
// 数值阈值核查结论 (Numeric Verdict)
// ==========================================
// 公里数/路桥费/加班费共用的通用数值核查结论
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NumericVerdict {
    ExceedsMax(f64),    // 大于上限
    BelowMin(f64),      // 小于下限
    Normal,             // 正常
    MissingOrMalformed, // 数据缺失或格式错误
    DataError,          // 数据错误（兜底）
}

impl NumericVerdict {
    pub fn is_normal(&self) -> bool {
        matches!(self, NumericVerdict::Normal)
    }

    /// 按核查项渲染文案, 与原始报表措辞一致
    /// (如 "公里数大于300" / "路桥费小于0")
    pub fn describe(&self, kind: NumericCheckKind) -> String {
        match self {
            NumericVerdict::ExceedsMax(max) => {
                format!("{}大于{}", kind.subject(), format_bound(*max))
            }
            NumericVerdict::BelowMin(min) => {
                format!("{}小于{}", kind.subject(), format_bound(*min))
            }
            NumericVerdict::Normal => "正常".to_string(),
            NumericVerdict::MissingOrMalformed => "数据缺失或格式错误".to_string(),
            NumericVerdict::DataError => "数据错误".to_string(),
        }
    }
}

/// 阈值为整数时不带小数位 (300 而非 300.0)
fn format_bound(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

// ==========================================
// 数值核查项 (Numeric Check Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericCheckKind {
    Mileage,     // 公里数
    TollFee,     // 路桥费
    OvertimeFee, // 加班费
}

impl NumericCheckKind {
    /// 文案主语
    pub fn subject(&self) -> &'static str {
        match self {
            NumericCheckKind::Mileage => "公里数",
            NumericCheckKind::TollFee => "路桥费",
            NumericCheckKind::OvertimeFee => "加班费",
        }
    }

    /// 核查结果列名
    pub fn column_name(&self) -> &'static str {
        match self {
            NumericCheckKind::Mileage => "公里数核查",
            NumericCheckKind::TollFee => "路桥费核查",
            NumericCheckKind::OvertimeFee => "加班费核查",
        }
    }
}

/// 工作时长核查结果列名
pub const WORK_TIME_CHECK_COLUMN: &str = "工作时长核查";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping_pending() {
        for raw in ["测试中", "待执行", "已分配", "已接纳", "已开始", "已指派", "执行中"] {
            assert_eq!(StatusBucket::from_raw_status(raw), StatusBucket::Pending);
        }
    }

    #[test]
    fn test_status_mapping_complete() {
        for raw in [
            "第三方上传完成",
            "分析失败",
            "分析中",
            "评审不通过",
            "评审中",
            "审核不通过",
        ] {
            assert_eq!(StatusBucket::from_raw_status(raw), StatusBucket::Complete);
        }
    }

    #[test]
    fn test_status_mapping_passed() {
        for raw in ["审核通过", "已关闭", "已完成"] {
            assert_eq!(StatusBucket::from_raw_status(raw), StatusBucket::Passed);
        }
    }

    #[test]
    fn test_status_mapping_total_coverage() {
        // 表外状态一律归入未知
        for raw in ["已取消", "暂停", "", "random", "  未列出  "] {
            assert_eq!(StatusBucket::from_raw_status(raw), StatusBucket::Unknown);
        }
    }

    #[test]
    fn test_work_time_verdict_display() {
        let threshold = NaiveTime::from_hms_opt(9, 15, 0).unwrap();
        assert_eq!(
            WorkTimeVerdict::LateStart(threshold).to_string(),
            "晚于09:15:00出车"
        );
        assert_eq!(WorkTimeVerdict::ExceedsMaxHours(12.0).to_string(), "工作时长超12小时");
        assert_eq!(WorkTimeVerdict::Normal.to_string(), "正常");
    }

    #[test]
    fn test_numeric_verdict_describe() {
        assert_eq!(
            NumericVerdict::ExceedsMax(300.0).describe(NumericCheckKind::Mileage),
            "公里数大于300"
        );
        assert_eq!(
            NumericVerdict::BelowMin(0.0).describe(NumericCheckKind::TollFee),
            "路桥费小于0"
        );
        assert_eq!(
            NumericVerdict::ExceedsMax(20.0).describe(NumericCheckKind::OvertimeFee),
            "加班费大于20"
        );
        assert_eq!(
            NumericVerdict::MissingOrMalformed.describe(NumericCheckKind::Mileage),
            "数据缺失或格式错误"
        );
    }
}
