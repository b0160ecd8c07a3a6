// ==========================================
// 内控管理分析系统 - 核心库
// ==========================================
// 技术栈: Rust + calamine/csv + chrono
// 系统定位: 车辆出勤与工单核对分析引擎 (界面层为外部协作方)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 外部数据
pub mod importer;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 核查规则配置
pub mod config;

// 导出层 - 结果输出
pub mod export;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    AttendanceRecord, NumericCheckKind, NumericVerdict, PersonIdentity, ReconciledRecord,
    StatusBucket, WorkOrderDailyAggregate, WorkOrderRecord, WorkTimeVerdict,
};

// 引擎
pub use engine::{
    AttendanceNormalizer, AuditPipeline, IdentityResolver, PipelineInput, PipelineResult,
    Reconciler, RuleEngine, WorkOrderAggregator,
};

// 配置
pub use config::RuleConfig;

// 错误类型
pub use importer::{ImportError, ImportResult};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "内控管理分析系统";
