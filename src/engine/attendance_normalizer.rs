// ==========================================
// 内控管理分析系统 - 出勤记录归一化引擎
// ==========================================
// 职责: 清洗车辆出勤原始行, 挂接归一化账号
// 约定: 单元格解析失败降级为缺失值; 只有必需列缺失才中止
// ==========================================

use crate::domain::AttendanceRecord;
use crate::engine::identity_resolver::IdentityResolver;
use crate::importer::{cell, require_columns, ImportResult, RawRow};
use tracing::debug;

/// 车辆出勤数据源名（表头前有一行导出说明）
pub const ATTENDANCE_SOURCE: &str = "车辆出勤记录信息";
pub const ATTENDANCE_HEADER_OFFSET: usize = 1;
pub const ATTENDANCE_REQUIRED_COLUMNS: &[&str] = &[
    "日期",
    "上传人id",
    "开始时间",
    "结束时间",
    "车牌号码",
    "驾驶员名称",
];

/// 可选列的存在性, 决定对应核查规则是否适用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceColumns {
    pub mileage: bool,
    pub toll_fee: bool,
    pub overtime_fee: bool,
    pub punch_only: bool,
}

impl AttendanceColumns {
    /// 全部可选列均存在（手工构造记录的测试场景用）
    pub fn all() -> Self {
        Self {
            mileage: true,
            toll_fee: true,
            overtime_fee: true,
            punch_only: true,
        }
    }

    fn from_rows(rows: &[RawRow]) -> Self {
        let has = |col: &str| rows.first().map(|r| r.contains_key(col)).unwrap_or(false);
        Self {
            mileage: has("行驶里程"),
            toll_fee: has("路桥费"),
            overtime_fee: has("加班费"),
            punch_only: has("只打卡不出车"),
        }
    }
}

/// 归一化结果: 记录 + 可选列存在性
#[derive(Debug, Clone)]
pub struct NormalizedAttendance {
    pub records: Vec<AttendanceRecord>,
    pub columns: AttendanceColumns,
}

// ==========================================
// AttendanceNormalizer - 出勤归一化器
// ==========================================
pub struct AttendanceNormalizer;

impl AttendanceNormalizer {
    /// 归一化出勤原始行
    ///
    /// # 规则
    /// 1. 日期无效 → 缺失, 不中止
    /// 2. 上传人id 去空白后在身份表中查账号, 未命中 → 账号缺失
    /// 3. 数值/时间列宽松解析, 失败 → 缺失
    pub fn normalize(
        rows: &[RawRow],
        resolver: &IdentityResolver,
    ) -> ImportResult<NormalizedAttendance> {
        require_columns(ATTENDANCE_SOURCE, rows, ATTENDANCE_REQUIRED_COLUMNS)?;

        let columns = AttendanceColumns::from_rows(rows);
        let mut records = Vec::with_capacity(rows.len());

        for row in rows {
            let uploader_id =
                cell::clean_text(row.get("上传人id").map(String::as_str).unwrap_or(""));
            let canonical_account = resolver
                .account_for_uid(&uploader_id)
                .map(|a| a.to_string());

            records.push(AttendanceRecord {
                date: row.get("日期").and_then(|v| cell::parse_date(v)),
                plate_no: cell::normalize_null(row.get("车牌号码").map(String::as_str)),
                driver_name: cell::normalize_null(row.get("驾驶员名称").map(String::as_str)),
                start_time: row.get("开始时间").and_then(|v| cell::parse_datetime(v)),
                end_time: row.get("结束时间").and_then(|v| cell::parse_datetime(v)),
                mileage: row.get("行驶里程").and_then(|v| cell::parse_f64(v)),
                toll_fee: row.get("路桥费").and_then(|v| cell::parse_f64(v)),
                overtime_fee: row.get("加班费").and_then(|v| cell::parse_f64(v)),
                uploader_id,
                uploader_name: cell::normalize_null(row.get("上传人姓名").map(String::as_str)),
                province: cell::normalize_null(row.get("省").map(String::as_str)),
                city: cell::normalize_null(row.get("市").map(String::as_str)),
                punch_only: cell::parse_bool_flag(row.get("只打卡不出车").map(String::as_str)),
                canonical_account,
                work_duration_hours: None,
                work_time_verdict: None,
                mileage_verdict: None,
                toll_fee_verdict: None,
                overtime_fee_verdict: None,
                anomaly_summary: None,
                anomaly_count: 0,
            });
        }

        let matched = records
            .iter()
            .filter(|r| r.canonical_account.is_some())
            .count();
        debug!(
            total = records.len(),
            matched,
            "出勤记录归一化完成"
        );

        Ok(NormalizedAttendance { records, columns })
    }
}
