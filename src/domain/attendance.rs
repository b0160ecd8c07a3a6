// ==========================================
// 内控管理分析系统 - 车辆出勤记录实体
// ==========================================
// 由 AttendanceNormalizer 创建;
// 核查相关派生字段由 RuleEngine 就地填充;
// 单次运行内不删除记录
// ==========================================

use crate::domain::types::{NumericVerdict, WorkTimeVerdict};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 车辆出勤记录
///
/// 解析失败的单元格保持 None, 由规则引擎按缺失处理
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    // ===== 原始列 =====
    /// 日期（无效值为 None, 不中止处理）
    pub date: Option<NaiveDate>,
    /// 车牌号码
    pub plate_no: Option<String>,
    /// 驾驶员名称
    pub driver_name: Option<String>,
    /// 开始时间
    pub start_time: Option<NaiveDateTime>,
    /// 结束时间
    pub end_time: Option<NaiveDateTime>,
    /// 行驶里程（公里）
    pub mileage: Option<f64>,
    /// 路桥费（元）
    pub toll_fee: Option<f64>,
    /// 加班费（元）
    pub overtime_fee: Option<f64>,
    /// 上传人id（已去空白字符串化）
    pub uploader_id: String,
    /// 上传人姓名
    pub uploader_name: Option<String>,
    /// 省
    pub province: Option<String>,
    /// 市
    pub city: Option<String>,
    /// 只打卡不出车标志（仅打卡核查模式下使用, 列缺失视为否）
    pub punch_only: bool,

    // ===== 身份归一化 =====
    /// Uniportal 账号（上传人id 映射未命中时为 None）
    pub canonical_account: Option<String>,

    // ===== 核查派生列（RuleEngine 填充） =====
    /// 工作时长（小时, 保留一位小数; 打卡缺失时为 None）
    pub work_duration_hours: Option<f64>,
    /// 工作时长核查
    pub work_time_verdict: Option<WorkTimeVerdict>,
    /// 公里数核查
    pub mileage_verdict: Option<NumericVerdict>,
    /// 路桥费核查
    pub toll_fee_verdict: Option<NumericVerdict>,
    /// 加班费核查
    pub overtime_fee_verdict: Option<NumericVerdict>,
    /// 核查摘要（无异常时为 "全部正常"）
    pub anomaly_summary: Option<String>,
    /// 异常数量（非"正常"结论的核查列个数）
    pub anomaly_count: u32,
}

impl AttendanceRecord {
    /// 日期的标准字符串形式 (YYYY-MM-DD), 用于复合键与导出
    pub fn date_string(&self) -> Option<String> {
        self.date.map(|d| d.format("%Y-%m-%d").to_string())
    }

    /// 复合键: 账号_日期; 账号或日期缺失时无法构键
    pub fn composite_key(&self) -> Option<String> {
        match (&self.canonical_account, self.date_string()) {
            (Some(account), Some(date)) => Some(format!("{}_{}", account, date)),
            _ => None,
        }
    }
}
