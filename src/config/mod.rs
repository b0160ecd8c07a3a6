// ==========================================
// 内控管理分析系统 - 配置层
// ==========================================

pub mod rule_config;

pub use rule_config::{
    MileageConfig, OvertimeFeeConfig, RuleConfig, TollFeeConfig, WorkTimeConfig,
};
