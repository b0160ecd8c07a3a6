// ==========================================
// 内控管理分析系统 - 结果导出
// ==========================================
// 职责: 核查后的出勤表 / 核对结果表 → UTF-8 CSV
// 列集与导出报表一致: 原始列 + 派生核查列 (+ 四桶计数)
// ==========================================

use crate::domain::{AttendanceRecord, NumericCheckKind, ReconciledRecord};
use crate::importer::{ImportError, ImportResult};
use csv::Writer;
use std::path::Path;

const ATTENDANCE_HEADERS: &[&str] = &[
    "日期",
    "车牌号码",
    "驾驶员名称",
    "开始时间",
    "结束时间",
    "行驶里程",
    "路桥费",
    "加班费",
    "上传人id",
    "上传人姓名",
    "省",
    "市",
    "Uniportal账号",
    "工作时长",
    "工作时长核查",
    "公里数核查",
    "路桥费核查",
    "加班费核查",
    "核查摘要",
    "异常数量",
];

const COUNT_HEADERS: &[&str] = &["待执行", "完成", "通过", "未知"];

/// 写出核查后的出勤表
pub fn write_attendance_csv<P: AsRef<Path>>(
    path: P,
    records: &[AttendanceRecord],
) -> ImportResult<()> {
    let mut writer = open_writer(path.as_ref())?;
    writer
        .write_record(ATTENDANCE_HEADERS)
        .map_err(export_err)?;

    for record in records {
        writer
            .write_record(attendance_fields(record))
            .map_err(export_err)?;
    }

    writer.flush().map_err(|e| ImportError::ExportError(e.to_string()))?;
    Ok(())
}

/// 写出核对结果表（出勤 + 四桶计数）
pub fn write_reconciled_csv<P: AsRef<Path>>(
    path: P,
    records: &[ReconciledRecord],
) -> ImportResult<()> {
    let mut writer = open_writer(path.as_ref())?;

    let headers: Vec<&str> = ATTENDANCE_HEADERS
        .iter()
        .chain(COUNT_HEADERS.iter())
        .copied()
        .collect();
    writer.write_record(&headers).map_err(export_err)?;

    for record in records {
        let mut fields = attendance_fields(&record.attendance);
        fields.push(record.pending_count.to_string());
        fields.push(record.complete_count.to_string());
        fields.push(record.passed_count.to_string());
        fields.push(record.unknown_count.to_string());
        writer.write_record(&fields).map_err(export_err)?;
    }

    writer.flush().map_err(|e| ImportError::ExportError(e.to_string()))?;
    Ok(())
}

fn open_writer(path: &Path) -> ImportResult<Writer<std::fs::File>> {
    Writer::from_path(path).map_err(export_err)
}

fn export_err(err: csv::Error) -> ImportError {
    ImportError::ExportError(err.to_string())
}

fn attendance_fields(record: &AttendanceRecord) -> Vec<String> {
    vec![
        record.date_string().unwrap_or_default(),
        record.plate_no.clone().unwrap_or_default(),
        record.driver_name.clone().unwrap_or_default(),
        record
            .start_time
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        record
            .end_time
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        record.mileage.map(fmt_f64).unwrap_or_default(),
        record.toll_fee.map(fmt_f64).unwrap_or_default(),
        record.overtime_fee.map(fmt_f64).unwrap_or_default(),
        record.uploader_id.clone(),
        record.uploader_name.clone().unwrap_or_default(),
        record.province.clone().unwrap_or_default(),
        record.city.clone().unwrap_or_default(),
        record.canonical_account.clone().unwrap_or_default(),
        record.work_duration_hours.map(fmt_f64).unwrap_or_default(),
        record
            .work_time_verdict
            .map(|v| v.to_string())
            .unwrap_or_default(),
        record
            .mileage_verdict
            .map(|v| v.describe(NumericCheckKind::Mileage))
            .unwrap_or_default(),
        record
            .toll_fee_verdict
            .map(|v| v.describe(NumericCheckKind::TollFee))
            .unwrap_or_default(),
        record
            .overtime_fee_verdict
            .map(|v| v.describe(NumericCheckKind::OvertimeFee))
            .unwrap_or_default(),
        record.anomaly_summary.clone().unwrap_or_default(),
        record.anomaly_count.to_string(),
    ]
}

fn fmt_f64(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
