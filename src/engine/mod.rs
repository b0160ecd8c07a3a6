// ==========================================
// 内控管理分析系统 - 引擎层
// ==========================================
// 职责: 实现核对与核查业务规则
// 红线: 引擎是整表纯函数, 查找结构随单次调用创建与销毁
// ==========================================

pub mod analysis;
pub mod attendance_normalizer;
pub mod identity_resolver;
pub mod orchestrator;
pub mod reconciler;
pub mod rule_engine;
pub mod work_order_aggregator;

// 重导出核心引擎
pub use attendance_normalizer::{AttendanceColumns, AttendanceNormalizer, NormalizedAttendance};
pub use identity_resolver::IdentityResolver;
pub use orchestrator::{AuditPipeline, PipelineInput, PipelineResult};
pub use reconciler::Reconciler;
pub use rule_engine::{CheckStatistics, RuleEngine};
pub use work_order_aggregator::WorkOrderAggregator;
