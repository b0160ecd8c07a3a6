// ==========================================
// 内控管理分析系统 - 单元格级清洗与宽松解析
// ==========================================
// 职责: TRIM / NULL 标准化 / 日期·时间·数值宽松解析
// 约定: 解析失败一律降级为 None, 由规则引擎按"数据缺失"处理,
//       绝不因单元格内容中止整表处理
// ==========================================

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// 去除首尾空白
pub fn clean_text(value: &str) -> String {
    value.trim().to_string()
}

/// 空白字符串标准化为 None
pub fn normalize_null(value: Option<&str>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 宽松解析日期
///
/// 兼容格式: YYYY-MM-DD / YYYY/MM/DD / YYYYMMDD,
/// 以及带时间后缀的导出值（取日期部分）
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(v, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(v, "%Y/%m/%d"))
        .or_else(|_| NaiveDate::parse_from_str(v, "%Y%m%d"))
        .ok()
        .or_else(|| parse_datetime(v).map(|dt| dt.date()))
}

/// 宽松解析日期时间
///
/// 兼容格式: YYYY-MM-DD HH:MM:SS / YYYY/MM/DD HH:MM:SS /
/// YYYY-MM-DDTHH:MM:SS / 省略秒的变体
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }

    const FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
    ];

    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(v, fmt) {
            return Some(dt);
        }
    }
    None
}

/// 宽松解析时刻 (HH:MM:SS / HH:MM / H:MM:SS)
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }

    NaiveTime::parse_from_str(v, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(v, "%H:%M"))
        .ok()
}

/// 宽松解析数值
///
/// 无法解析或解析结果为 NaN 时返回 None（等同缺失）
pub fn parse_f64(value: &str) -> Option<f64> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }

    match v.parse::<f64>() {
        Ok(n) if n.is_nan() => None,
        Ok(n) => Some(n),
        Err(_) => None,
    }
}

/// 解析布尔标志列（只打卡不出车等）
///
/// "是"/"1"/"Y"/"TRUE" → true; 其余（含缺失列）→ false
pub fn parse_bool_flag(value: Option<&str>) -> bool {
    match normalize_null(value) {
        None => false,
        Some(v) => matches!(
            v.to_uppercase().as_str(),
            "1" | "Y" | "是" | "TRUE"
        ),
    }
}
