// ==========================================
// 内控管理分析系统 - 趋势与统计分析
// ==========================================
// 职责: 核对结果表的筛选、上传人效能排名、城市趋势、按日汇总
// 约定: 纯函数, 不修改输入; 统计口径为 完成+通过;
//       均值相等时的排名先后未作规定, 按首次出现顺序稳定排序
// ==========================================

use crate::domain::ReconciledRecord;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// 趋势筛选条件; None 表示"全部"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrendFilter {
    pub province: Option<String>,
    pub city: Option<String>,
    pub uploader: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// 上传人效能排名行
#[derive(Debug, Clone, PartialEq)]
pub struct UploaderRank {
    /// 名次, 从 1 开始
    pub rank: usize,
    pub uploader_name: String,
    /// (完成+通过) 的日均值
    pub avg_effective: f64,
}

/// 城市趋势点: 城市按日 (完成+通过) 均值
#[derive(Debug, Clone, PartialEq)]
pub struct CityTrendPoint {
    pub city: String,
    pub date: String,
    pub avg_effective: f64,
}

/// 按 (日期, 城市) 的四桶计数汇总
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyStatusSummary {
    pub date: String,
    pub city: Option<String>,
    pub pending: u32,
    pub complete: u32,
    pub passed: u32,
    pub unknown: u32,
}

/// 可用的筛选器选项（去重排序）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub provinces: Vec<String>,
    pub cities: Vec<String>,
    pub uploaders: Vec<String>,
}

/// 应用省/市/上传人/日期区间筛选
pub fn filter_records<'a>(
    records: &'a [ReconciledRecord],
    filter: &TrendFilter,
) -> Vec<&'a ReconciledRecord> {
    records
        .iter()
        .filter(|r| {
            let a = &r.attendance;
            if let Some(province) = &filter.province {
                if a.province.as_deref() != Some(province.as_str()) {
                    return false;
                }
            }
            if let Some(city) = &filter.city {
                if a.city.as_deref() != Some(city.as_str()) {
                    return false;
                }
            }
            if let Some(uploader) = &filter.uploader {
                if a.uploader_name.as_deref() != Some(uploader.as_str()) {
                    return false;
                }
            }
            if filter.start_date.is_some() || filter.end_date.is_some() {
                let Some(date) = a.date else {
                    return false;
                };
                if let Some(start) = filter.start_date {
                    if date < start {
                        return false;
                    }
                }
                if let Some(end) = filter.end_date {
                    if date > end {
                        return false;
                    }
                }
            }
            true
        })
        .collect()
}

/// 上传人效能排名: 按 (完成+通过) 均值降序取前 top_n
///
/// 均值相等时保持首次出现顺序（实现定义, 不对外承诺）
pub fn uploader_effectiveness(records: &[ReconciledRecord], top_n: usize) -> Vec<UploaderRank> {
    // 姓名 → (累计 完成+通过, 行数); 按首次出现顺序记录
    let mut order = Vec::new();
    let mut sums: BTreeMap<String, (u64, usize)> = BTreeMap::new();

    for record in records {
        let Some(name) = &record.attendance.uploader_name else {
            continue;
        };
        if !sums.contains_key(name) {
            order.push(name.clone());
        }
        let entry = sums.entry(name.clone()).or_insert((0, 0));
        entry.0 += u64::from(record.effective_count());
        entry.1 += 1;
    }

    let mut ranked: Vec<(String, f64)> = order
        .into_iter()
        .map(|name| {
            let (sum, count) = sums[&name];
            (name, sum as f64 / count as f64)
        })
        .collect();

    // 稳定排序: 均值相等时保持出现顺序
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(top_n);

    ranked
        .into_iter()
        .enumerate()
        .map(|(idx, (uploader_name, avg_effective))| UploaderRank {
            rank: idx + 1,
            uploader_name,
            avg_effective,
        })
        .collect()
}

/// 城市趋势: 每 (城市, 日期) 的 (完成+通过) 均值
///
/// 城市数超过 max_cities 时只保留先出现的前 max_cities 个城市
pub fn city_trends(records: &[ReconciledRecord], max_cities: usize) -> Vec<CityTrendPoint> {
    // 先按出现顺序确定保留的城市
    let mut kept = Vec::new();
    for record in records {
        if let Some(city) = &record.attendance.city {
            if !kept.contains(city) {
                kept.push(city.clone());
            }
        }
    }
    kept.truncate(max_cities);

    let mut groups: BTreeMap<(String, String), (u64, usize)> = BTreeMap::new();
    for record in records {
        let a = &record.attendance;
        let (Some(city), Some(date)) = (&a.city, a.date_string()) else {
            continue;
        };
        if !kept.contains(city) {
            continue;
        }
        let entry = groups.entry((city.clone(), date)).or_insert((0, 0));
        entry.0 += u64::from(record.effective_count());
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|((city, date), (sum, count))| CityTrendPoint {
            city,
            date,
            avg_effective: sum as f64 / count as f64,
        })
        .collect()
}

/// 按 (日期, 城市) 汇总四桶计数之和
pub fn trend_summary(records: &[ReconciledRecord]) -> Vec<DailyStatusSummary> {
    let mut groups: BTreeMap<(String, Option<String>), [u32; 4]> = BTreeMap::new();

    for record in records {
        let Some(date) = record.attendance.date_string() else {
            continue;
        };
        let key = (date, record.attendance.city.clone());
        let counts = groups.entry(key).or_insert([0u32; 4]);
        counts[0] += record.pending_count;
        counts[1] += record.complete_count;
        counts[2] += record.passed_count;
        counts[3] += record.unknown_count;
    }

    groups
        .into_iter()
        .map(|((date, city), counts)| DailyStatusSummary {
            date,
            city,
            pending: counts[0],
            complete: counts[1],
            passed: counts[2],
            unknown: counts[3],
        })
        .collect()
}

/// 提取筛选器选项
///
/// 城市选项受已选省份约束, 上传人选项受已选省/市约束
pub fn filter_options(records: &[ReconciledRecord], current: &TrendFilter) -> FilterOptions {
    let mut provinces = Vec::new();
    let mut cities = Vec::new();
    let mut uploaders = Vec::new();

    for record in records {
        let a = &record.attendance;
        if let Some(p) = &a.province {
            if !provinces.contains(p) {
                provinces.push(p.clone());
            }
        }

        let province_ok = current
            .province
            .as_ref()
            .map(|p| a.province.as_deref() == Some(p.as_str()))
            .unwrap_or(true);
        if province_ok {
            if let Some(c) = &a.city {
                if !cities.contains(c) {
                    cities.push(c.clone());
                }
            }

            let city_ok = current
                .city
                .as_ref()
                .map(|c| a.city.as_deref() == Some(c.as_str()))
                .unwrap_or(true);
            if city_ok {
                if let Some(u) = &a.uploader_name {
                    if !uploaders.contains(u) {
                        uploaders.push(u.clone());
                    }
                }
            }
        }
    }

    provinces.sort();
    cities.sort();
    uploaders.sort();

    FilterOptions {
        provinces,
        cities,
        uploaders,
    }
}
