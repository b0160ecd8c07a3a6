// ==========================================
// 内控管理分析系统 - 领域层
// ==========================================

pub mod attendance;
pub mod person;
pub mod types;
pub mod work_order;

pub use attendance::AttendanceRecord;
pub use person::PersonIdentity;
pub use types::{
    NumericCheckKind, NumericVerdict, StatusBucket, WorkTimeVerdict, WORK_TIME_CHECK_COLUMN,
};
pub use work_order::{ReconciledRecord, WorkOrderDailyAggregate, WorkOrderRecord};
