// ==========================================
// 内控管理分析系统 - 核查规则引擎
// ==========================================
// 职责: 对每条出勤记录评估四类核查规则, 产出结论与摘要
// 红线: 条件按固定优先级求值, 首个命中即定论;
//       工作时长超上限的判断不受仅打卡模式门控 (条件6);
//       单元格缺失进入"数据缺失"分支, 绝不中止整表处理
// ==========================================

use crate::config::RuleConfig;
use crate::domain::{
    AttendanceRecord, NumericCheckKind, NumericVerdict, WorkTimeVerdict, WORK_TIME_CHECK_COLUMN,
};
use crate::engine::attendance_normalizer::AttendanceColumns;
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// 单个核查列的统计信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckStatistics {
    /// 参与核查的记录总数
    pub total: usize,
    /// 结论为"正常"的记录数
    pub normal: usize,
    /// 结论非"正常"的记录数
    pub abnormal: usize,
    /// 结论文案 → 出现次数
    pub distribution: HashMap<String, usize>,
}

// ==========================================
// RuleEngine - 核查规则引擎
// ==========================================
pub struct RuleEngine {
    config: RuleConfig,
}

impl RuleEngine {
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// 按顺序执行全部核查并生成摘要
    ///
    /// 可选列不存在时对应规则不适用, 该核查列保持空
    pub fn run_all_checks(&self, records: &mut [AttendanceRecord], columns: &AttendanceColumns) {
        for record in records.iter_mut() {
            self.check_work_time(record);
            if columns.mileage {
                self.check_mileage(record);
            }
            if columns.toll_fee {
                self.check_toll_fee(record);
            }
            if columns.overtime_fee {
                self.check_overtime_fee(record);
            }
            summarize(record);
        }

        debug!(records = records.len(), "核查执行完成");
    }

    /// 核查工作时长
    ///
    /// # 条件优先级（首个命中即定论）
    /// 1. 开始时刻晚于出车阈值 → 晚出车
    /// 2. 未开始打卡
    /// 3. 未结束打卡
    /// 4. 跨天打卡
    /// 5. 时长 < 下限 → 提前下班
    /// 6. 时长 > 上限 → 超时（不受仅打卡模式门控）
    /// 7. 下限 ≤ 时长 ≤ 上限 → 正常
    /// 8. （仅打卡模式）只打卡不出车
    /// 兜底 → 数据错误
    ///
    /// 仅打卡模式下条件 1-5 与 7 都要求记录不是"只打卡不出车"
    pub fn check_work_time(&self, record: &mut AttendanceRecord) {
        let (duration, verdict) =
            self.evaluate_work_time(record.start_time, record.end_time, record.punch_only);

        // 存储值保留一位小数; 条件比较用未舍入时长
        record.work_duration_hours = duration.map(|d| (d * 10.0).round() / 10.0);
        record.work_time_verdict = Some(verdict);
    }

    fn evaluate_work_time(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
        punch_only_flag: bool,
    ) -> (Option<f64>, WorkTimeVerdict) {
        let cfg = &self.config.work_time;

        // 基础模式下忽略只打卡标志
        let punch_only = cfg.verify_punch_only_mode && punch_only_flag;
        let on_duty = !punch_only;

        let duration = match (start, end) {
            (Some(s), Some(e)) => Some((e - s).num_seconds() as f64 / 3600.0),
            _ => None,
        };

        let late_start = start
            .map(|s| s.time() > cfg.start_threshold_time)
            .unwrap_or(false);
        let cross_day = match (start, end) {
            (Some(s), Some(e)) => s.date() != e.date(),
            _ => false,
        };
        let below_min = duration.map(|d| d < cfg.min_hours).unwrap_or(false);
        let above_max = duration.map(|d| d > cfg.max_hours).unwrap_or(false);
        let in_range = duration
            .map(|d| d >= cfg.min_hours && d <= cfg.max_hours)
            .unwrap_or(false);

        let verdict = if late_start && on_duty {
            WorkTimeVerdict::LateStart(cfg.start_threshold_time)
        } else if start.is_none() && on_duty {
            WorkTimeVerdict::MissingStartPunch
        } else if end.is_none() && on_duty {
            WorkTimeVerdict::MissingEndPunch
        } else if cross_day && on_duty {
            WorkTimeVerdict::CrossDayPunch
        } else if below_min && on_duty {
            WorkTimeVerdict::LeftEarly
        } else if above_max {
            WorkTimeVerdict::ExceedsMaxHours(cfg.max_hours)
        } else if in_range && on_duty {
            WorkTimeVerdict::Normal
        } else if punch_only {
            WorkTimeVerdict::PunchOnlyNoTrip
        } else {
            WorkTimeVerdict::DataError
        };

        (duration, verdict)
    }

    /// 核查公里数（下限取配置的最小公里数）
    pub fn check_mileage(&self, record: &mut AttendanceRecord) {
        record.mileage_verdict = Some(evaluate_numeric(
            record.mileage,
            self.config.mileage.min,
            self.config.mileage.max,
        ));
    }

    /// 核查路桥费（下限为 0）
    pub fn check_toll_fee(&self, record: &mut AttendanceRecord) {
        record.toll_fee_verdict = Some(evaluate_numeric(
            record.toll_fee,
            0.0,
            self.config.toll_fee.max,
        ));
    }

    /// 核查加班费（下限为 0）
    pub fn check_overtime_fee(&self, record: &mut AttendanceRecord) {
        record.overtime_fee_verdict = Some(evaluate_numeric(
            record.overtime_fee,
            0.0,
            self.config.overtime_fee.max,
        ));
    }

    /// 核查统计: 每核查列的总数/正常数/异常数/结论分布
    ///
    /// 未执行的核查列（规则不适用）不出现在结果中
    pub fn get_statistics(
        &self,
        records: &[AttendanceRecord],
    ) -> BTreeMap<String, CheckStatistics> {
        let mut stats = BTreeMap::new();

        collect_column_stats(
            &mut stats,
            WORK_TIME_CHECK_COLUMN,
            records
                .iter()
                .map(|r| r.work_time_verdict.map(|v| (v.is_normal(), v.to_string()))),
        );
        collect_column_stats(
            &mut stats,
            NumericCheckKind::Mileage.column_name(),
            records.iter().map(|r| {
                r.mileage_verdict
                    .map(|v| (v.is_normal(), v.describe(NumericCheckKind::Mileage)))
            }),
        );
        collect_column_stats(
            &mut stats,
            NumericCheckKind::TollFee.column_name(),
            records.iter().map(|r| {
                r.toll_fee_verdict
                    .map(|v| (v.is_normal(), v.describe(NumericCheckKind::TollFee)))
            }),
        );
        collect_column_stats(
            &mut stats,
            NumericCheckKind::OvertimeFee.column_name(),
            records.iter().map(|r| {
                r.overtime_fee_verdict
                    .map(|v| (v.is_normal(), v.describe(NumericCheckKind::OvertimeFee)))
            }),
        );

        stats
    }
}

/// 通用数值阈值核查
///
/// # 条件优先级
/// 1. 值 > 上限
/// 2. 值 < 下限
/// 3. 0 ≤ 值 ≤ 上限 → 正常
/// 4. 缺失/无法解析
/// 兜底 → 数据错误（仅在阈值配置不一致时可达）
fn evaluate_numeric(value: Option<f64>, min_bound: f64, max: f64) -> NumericVerdict {
    match value {
        None => NumericVerdict::MissingOrMalformed,
        Some(v) if v > max => NumericVerdict::ExceedsMax(max),
        Some(v) if v < min_bound => NumericVerdict::BelowMin(min_bound),
        Some(v) if v >= 0.0 && v <= max => NumericVerdict::Normal,
        Some(_) => NumericVerdict::DataError,
    }
}

/// 生成核查摘要与异常数量
///
/// 摘要串接所有非"正常"核查列的 "列名: 结论";
/// 全部正常时为 "全部正常"
fn summarize(record: &mut AttendanceRecord) {
    let mut issues = Vec::new();
    let mut abnormal = 0u32;

    let mut push = |column: &str, normal: bool, text: String| {
        if !normal {
            abnormal += 1;
            issues.push(format!("{}: {}", column, text));
        }
    };

    if let Some(v) = record.work_time_verdict {
        push(WORK_TIME_CHECK_COLUMN, v.is_normal(), v.to_string());
    }
    if let Some(v) = record.mileage_verdict {
        push(
            NumericCheckKind::Mileage.column_name(),
            v.is_normal(),
            v.describe(NumericCheckKind::Mileage),
        );
    }
    if let Some(v) = record.toll_fee_verdict {
        push(
            NumericCheckKind::TollFee.column_name(),
            v.is_normal(),
            v.describe(NumericCheckKind::TollFee),
        );
    }
    if let Some(v) = record.overtime_fee_verdict {
        push(
            NumericCheckKind::OvertimeFee.column_name(),
            v.is_normal(),
            v.describe(NumericCheckKind::OvertimeFee),
        );
    }

    record.anomaly_count = abnormal;
    record.anomaly_summary = Some(if issues.is_empty() {
        "全部正常".to_string()
    } else {
        issues.join("; ")
    });
}

fn collect_column_stats<I>(
    stats: &mut BTreeMap<String, CheckStatistics>,
    column: &str,
    verdicts: I,
) where
    I: Iterator<Item = Option<(bool, String)>>,
{
    let mut total = 0usize;
    let mut normal = 0usize;
    let mut distribution: HashMap<String, usize> = HashMap::new();

    for verdict in verdicts.flatten() {
        total += 1;
        if verdict.0 {
            normal += 1;
        }
        *distribution.entry(verdict.1).or_insert(0) += 1;
    }

    if total > 0 {
        stats.insert(
            column.to_string(),
            CheckStatistics {
                total,
                normal,
                abnormal: total - normal,
                distribution,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn dt(date: (i32, u32, u32), time: (u32, u32, u32)) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(date.0, date.1, date.2)
            .unwrap()
            .and_hms_opt(time.0, time.1, time.2)
            .unwrap()
    }

    fn blank_record() -> AttendanceRecord {
        AttendanceRecord {
            date: NaiveDate::from_ymd_opt(2026, 1, 10),
            plate_no: Some("京A12345".to_string()),
            driver_name: Some("张三".to_string()),
            start_time: None,
            end_time: None,
            mileage: None,
            toll_fee: None,
            overtime_fee: None,
            uploader_id: "u001".to_string(),
            uploader_name: Some("张三".to_string()),
            province: None,
            city: None,
            punch_only: false,
            canonical_account: Some("w0001".to_string()),
            work_duration_hours: None,
            work_time_verdict: None,
            mileage_verdict: None,
            toll_fee_verdict: None,
            overtime_fee_verdict: None,
            anomaly_summary: None,
            anomaly_count: 0,
        }
    }

    fn engine() -> RuleEngine {
        RuleEngine::new(RuleConfig::default())
    }

    #[test]
    fn test_work_time_normal_day() {
        let mut record = blank_record();
        record.start_time = Some(dt((2026, 1, 10), (8, 30, 0)));
        record.end_time = Some(dt((2026, 1, 10), (17, 30, 0)));

        engine().check_work_time(&mut record);
        assert_eq!(record.work_time_verdict, Some(WorkTimeVerdict::Normal));
        assert_eq!(record.work_duration_hours, Some(9.0));
    }

    #[test]
    fn test_work_time_duration_rounded_to_one_decimal() {
        let mut record = blank_record();
        record.start_time = Some(dt((2026, 1, 10), (8, 0, 0)));
        record.end_time = Some(dt((2026, 1, 10), (16, 20, 0)));

        engine().check_work_time(&mut record);
        // 8小时20分 = 8.333… → 8.3
        assert_eq!(record.work_duration_hours, Some(8.3));
    }

    #[test]
    fn test_work_time_late_start_takes_priority() {
        // 晚于阈值出车优先于时长判断
        let mut record = blank_record();
        record.start_time = Some(dt((2026, 1, 10), (9, 30, 0)));
        record.end_time = Some(dt((2026, 1, 10), (18, 30, 0)));

        engine().check_work_time(&mut record);
        assert_eq!(
            record.work_time_verdict.unwrap().to_string(),
            "晚于09:15:00出车"
        );
    }

    #[test]
    fn test_work_time_missing_start_punch() {
        // 场景: 开始时间缺失, 结束时间 10:00
        let mut record = blank_record();
        record.end_time = Some(dt((2026, 1, 10), (10, 0, 0)));

        let eng = engine();
        eng.check_work_time(&mut record);
        assert_eq!(
            record.work_time_verdict,
            Some(WorkTimeVerdict::MissingStartPunch)
        );
        assert_eq!(record.work_duration_hours, None);

        summarize(&mut record);
        assert!(record.anomaly_count >= 1);
    }

    #[test]
    fn test_work_time_missing_end_punch() {
        let mut record = blank_record();
        record.start_time = Some(dt((2026, 1, 10), (8, 0, 0)));

        engine().check_work_time(&mut record);
        assert_eq!(
            record.work_time_verdict,
            Some(WorkTimeVerdict::MissingEndPunch)
        );
    }

    #[test]
    fn test_work_time_cross_day_punch() {
        let mut record = blank_record();
        record.start_time = Some(dt((2026, 1, 10), (8, 0, 0)));
        record.end_time = Some(dt((2026, 1, 11), (2, 0, 0)));

        engine().check_work_time(&mut record);
        assert_eq!(
            record.work_time_verdict,
            Some(WorkTimeVerdict::CrossDayPunch)
        );
    }

    #[test]
    fn test_work_time_left_early() {
        let mut record = blank_record();
        record.start_time = Some(dt((2026, 1, 10), (8, 0, 0)));
        record.end_time = Some(dt((2026, 1, 10), (14, 0, 0)));

        engine().check_work_time(&mut record);
        assert_eq!(record.work_time_verdict, Some(WorkTimeVerdict::LeftEarly));
    }

    #[test]
    fn test_work_time_exceeds_max() {
        let mut record = blank_record();
        record.start_time = Some(dt((2026, 1, 10), (6, 0, 0)));
        record.end_time = Some(dt((2026, 1, 10), (19, 30, 0)));

        engine().check_work_time(&mut record);
        assert_eq!(
            record.work_time_verdict,
            Some(WorkTimeVerdict::ExceedsMaxHours(12.0))
        );
    }

    #[test]
    fn test_exceeds_max_not_gated_by_punch_only_mode() {
        // 场景: 时长13小时, 上限12, 仅打卡模式开启且记录为只打卡:
        // 条件6不受门控, 仍判超时
        let mut config = RuleConfig::default();
        config.work_time.verify_punch_only_mode = true;

        let mut record = blank_record();
        record.punch_only = true;
        record.start_time = Some(dt((2026, 1, 10), (6, 0, 0)));
        record.end_time = Some(dt((2026, 1, 10), (19, 0, 0)));

        RuleEngine::new(config).check_work_time(&mut record);
        assert_eq!(
            record.work_time_verdict,
            Some(WorkTimeVerdict::ExceedsMaxHours(12.0))
        );
    }

    #[test]
    fn test_punch_only_record_classified_in_punch_only_mode() {
        let mut config = RuleConfig::default();
        config.work_time.verify_punch_only_mode = true;

        // 时长在正常区间内的只打卡记录判"只打卡不出车"而非"正常"
        let mut record = blank_record();
        record.punch_only = true;
        record.start_time = Some(dt((2026, 1, 10), (8, 0, 0)));
        record.end_time = Some(dt((2026, 1, 10), (17, 0, 0)));

        RuleEngine::new(config).check_work_time(&mut record);
        assert_eq!(
            record.work_time_verdict,
            Some(WorkTimeVerdict::PunchOnlyNoTrip)
        );
    }

    #[test]
    fn test_punch_only_flag_ignored_in_basic_mode() {
        let mut record = blank_record();
        record.punch_only = true;
        record.start_time = Some(dt((2026, 1, 10), (8, 0, 0)));
        record.end_time = Some(dt((2026, 1, 10), (17, 0, 0)));

        engine().check_work_time(&mut record);
        assert_eq!(record.work_time_verdict, Some(WorkTimeVerdict::Normal));
    }

    #[test]
    fn test_mileage_exceeds_max() {
        // 场景: 里程400, 上限300
        let mut record = blank_record();
        record.mileage = Some(400.0);

        engine().check_mileage(&mut record);
        let verdict = record.mileage_verdict.unwrap();
        assert_eq!(verdict, NumericVerdict::ExceedsMax(300.0));
        assert_eq!(verdict.describe(NumericCheckKind::Mileage), "公里数大于300");
    }

    #[test]
    fn test_mileage_below_min() {
        let mut record = blank_record();
        record.mileage = Some(30.0);

        engine().check_mileage(&mut record);
        assert_eq!(record.mileage_verdict, Some(NumericVerdict::BelowMin(50.0)));
    }

    #[test]
    fn test_toll_fee_negative() {
        // 场景: 路桥费 -5
        let mut record = blank_record();
        record.toll_fee = Some(-5.0);

        engine().check_toll_fee(&mut record);
        let verdict = record.toll_fee_verdict.unwrap();
        assert_eq!(verdict, NumericVerdict::BelowMin(0.0));
        assert_eq!(verdict.describe(NumericCheckKind::TollFee), "路桥费小于0");
    }

    #[test]
    fn test_numeric_boundaries_inclusive() {
        let mut record = blank_record();
        record.toll_fee = Some(100.0);
        record.overtime_fee = Some(0.0);

        let eng = engine();
        eng.check_toll_fee(&mut record);
        eng.check_overtime_fee(&mut record);
        assert_eq!(record.toll_fee_verdict, Some(NumericVerdict::Normal));
        assert_eq!(record.overtime_fee_verdict, Some(NumericVerdict::Normal));
    }

    #[test]
    fn test_numeric_missing_value() {
        let mut record = blank_record();
        record.overtime_fee = None;

        engine().check_overtime_fee(&mut record);
        assert_eq!(
            record.overtime_fee_verdict,
            Some(NumericVerdict::MissingOrMalformed)
        );
    }

    #[test]
    fn test_run_all_checks_summary_and_count() {
        let mut records = vec![blank_record()];
        records[0].start_time = Some(dt((2026, 1, 10), (8, 0, 0)));
        records[0].end_time = Some(dt((2026, 1, 10), (17, 0, 0)));
        records[0].mileage = Some(400.0);
        records[0].toll_fee = Some(-5.0);
        records[0].overtime_fee = Some(10.0);

        engine().run_all_checks(&mut records, &AttendanceColumns::all());
        let record = &records[0];

        // 工作时长正常, 加班费正常; 公里数/路桥费异常
        assert_eq!(record.anomaly_count, 2);
        let summary = record.anomaly_summary.as_deref().unwrap();
        assert!(summary.contains("公里数核查: 公里数大于300"));
        assert!(summary.contains("路桥费核查: 路桥费小于0"));
        assert!(!summary.contains("工作时长核查"));
    }

    #[test]
    fn test_all_normal_summary() {
        let mut records = vec![blank_record()];
        records[0].start_time = Some(dt((2026, 1, 10), (8, 0, 0)));
        records[0].end_time = Some(dt((2026, 1, 10), (17, 0, 0)));
        records[0].mileage = Some(120.0);
        records[0].toll_fee = Some(20.0);
        records[0].overtime_fee = Some(10.0);

        engine().run_all_checks(&mut records, &AttendanceColumns::all());
        assert_eq!(records[0].anomaly_summary.as_deref(), Some("全部正常"));
        assert_eq!(records[0].anomaly_count, 0);
    }

    #[test]
    fn test_anomaly_count_equals_non_normal_columns() {
        let mut records = vec![blank_record()];
        // 四列全异常: 缺开始打卡 + 三个数值列缺失
        engine().run_all_checks(&mut records, &AttendanceColumns::all());
        assert_eq!(records[0].anomaly_count, 4);
    }

    #[test]
    fn test_inapplicable_columns_skipped() {
        let mut records = vec![blank_record()];
        let columns = AttendanceColumns {
            mileage: false,
            toll_fee: false,
            overtime_fee: false,
            punch_only: false,
        };

        engine().run_all_checks(&mut records, &columns);
        assert_eq!(records[0].mileage_verdict, None);
        // 只有工作时长核查参与异常计数
        assert_eq!(records[0].anomaly_count, 1);
    }

    #[test]
    fn test_statistics_distribution_sums_to_total() {
        let mut records = vec![blank_record(), blank_record(), blank_record()];
        records[0].start_time = Some(dt((2026, 1, 10), (8, 0, 0)));
        records[0].end_time = Some(dt((2026, 1, 10), (17, 0, 0)));
        records[0].mileage = Some(120.0);
        records[1].mileage = Some(400.0);
        records[2].mileage = Some(60.0);

        let eng = engine();
        eng.run_all_checks(&mut records, &AttendanceColumns::all());
        let stats = eng.get_statistics(&records);

        let mileage = &stats["公里数核查"];
        assert_eq!(mileage.total, 3);
        assert_eq!(mileage.normal, 2);
        assert_eq!(mileage.abnormal, 1);
        assert_eq!(mileage.distribution.values().sum::<usize>(), mileage.total);
        assert_eq!(mileage.distribution["正常"], 2);
        assert_eq!(mileage.distribution["公里数大于300"], 1);

        let work_time = &stats["工作时长核查"];
        assert_eq!(work_time.total, 3);
        assert_eq!(work_time.normal, 1);
    }

    #[test]
    fn test_statistics_skip_inapplicable_columns() {
        let mut records = vec![blank_record()];
        let columns = AttendanceColumns {
            mileage: false,
            toll_fee: false,
            overtime_fee: false,
            punch_only: false,
        };

        let eng = engine();
        eng.run_all_checks(&mut records, &columns);
        let stats = eng.get_statistics(&records);

        assert!(stats.contains_key("工作时长核查"));
        assert!(!stats.contains_key("公里数核查"));
    }
}
