// ==========================================
// 内控管理分析系统 - 核查规则配置
// ==========================================
// 配置由外部界面层提供, 单次运行内不可变;
// 两次运行之间可整体替换, 持久化是界面层的责任。
// 阈值之间的一致性(如 min > max)不做校验,
// 不一致的配置会原样进入比较逻辑。
// ==========================================

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 工作时长核查配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkTimeConfig {
    /// 最小工作时长（小时）
    pub min_hours: f64,
    /// 最大工作时长（小时）
    pub max_hours: f64,
    /// 出车时刻阈值, 开始打卡晚于该时刻判为晚出车
    pub start_threshold_time: NaiveTime,
    /// 仅打卡核查模式: 启用"只打卡不出车"分支
    pub verify_punch_only_mode: bool,
}

impl Default for WorkTimeConfig {
    fn default() -> Self {
        Self {
            min_hours: 8.0,
            max_hours: 12.0,
            start_threshold_time: NaiveTime::from_hms_opt(9, 15, 0).expect("合法时刻常量"),
            verify_punch_only_mode: false,
        }
    }
}

/// 公里数核查配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MileageConfig {
    pub min: f64,
    pub max: f64,
}

impl Default for MileageConfig {
    fn default() -> Self {
        Self { min: 50.0, max: 300.0 }
    }
}

/// 路桥费核查配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TollFeeConfig {
    pub max: f64,
}

impl Default for TollFeeConfig {
    fn default() -> Self {
        Self { max: 100.0 }
    }
}

/// 加班费核查配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OvertimeFeeConfig {
    pub max: f64,
}

impl Default for OvertimeFeeConfig {
    fn default() -> Self {
        Self { max: 20.0 }
    }
}

/// 核查规则配置全集
///
/// JSON 反序列化逐字段取默认值, 允许界面层只提供部分字段
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub work_time: WorkTimeConfig,
    pub mileage: MileageConfig,
    pub toll_fee: TollFeeConfig,
    pub overtime_fee: OvertimeFeeConfig,
}

impl RuleConfig {
    /// 从 JSON 字符串加载（缺失字段取默认值）
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// 从 JSON 文件加载
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(Self::from_json_str(&content)?)
    }
}
