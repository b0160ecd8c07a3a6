// ==========================================
// 内控管理分析系统 - 流水线编排器
// ==========================================
// 用途: 协调 身份解析 → 出勤归一化 → 工单聚合 → 核对 → 核查
//       五个引擎的执行顺序
// 红线: 所有查找结构随本次调用创建与销毁, 无跨运行共享状态;
//       仅结构性错误向调用方传播
// ==========================================

use crate::config::RuleConfig;
use crate::domain::{AttendanceRecord, PersonIdentity, ReconciledRecord, WorkOrderDailyAggregate};
use crate::engine::attendance_normalizer::{
    AttendanceNormalizer, ATTENDANCE_HEADER_OFFSET, ATTENDANCE_SOURCE,
};
use crate::engine::identity_resolver::{
    IdentityResolver, EMPLOYEE_HEADER_OFFSET, EMPLOYEE_SOURCE, PERSONNEL_HEADER_OFFSET,
    PERSONNEL_SOURCE,
};
use crate::engine::rule_engine::{CheckStatistics, RuleEngine};
use crate::engine::work_order_aggregator::{
    WorkOrderAggregator, WORK_ORDER_HEADER_OFFSET, WORK_ORDER_SOURCE,
};
use crate::engine::Reconciler;
use crate::importer::{ImportResult, RawRow, UniversalFileParser};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

// ==========================================
// PipelineInput - 四个数据源文件
// ==========================================
#[derive(Debug, Clone)]
pub struct PipelineInput {
    pub personnel_path: PathBuf,
    pub employee_path: PathBuf,
    pub attendance_path: PathBuf,
    pub work_order_path: PathBuf,
}

// ==========================================
// PipelineResult - 单次运行的全部输出表
// ==========================================
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// 身份表（每人员明细行一条）
    pub identities: Vec<PersonIdentity>,
    /// 核查后的出勤记录
    pub attendance: Vec<AttendanceRecord>,
    /// 工单日聚合
    pub aggregates: Vec<WorkOrderDailyAggregate>,
    /// 核对结果（出勤 + 四桶计数）
    pub reconciled: Vec<ReconciledRecord>,
    /// 每核查列统计
    pub statistics: BTreeMap<String, CheckStatistics>,
}

// ==========================================
// AuditPipeline - 流水线编排器
// ==========================================
pub struct AuditPipeline {
    config: RuleConfig,
}

impl AuditPipeline {
    /// 创建编排器; 配置在本次运行内不可变
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    /// 从四个数据源文件执行完整流水线
    pub fn run(&self, input: &PipelineInput) -> ImportResult<PipelineResult> {
        let parser = UniversalFileParser;

        info!(source = PERSONNEL_SOURCE, path = %input.personnel_path.display(), "读取数据源");
        let personnel_rows = parser.parse(&input.personnel_path, PERSONNEL_HEADER_OFFSET)?;

        info!(source = EMPLOYEE_SOURCE, path = %input.employee_path.display(), "读取数据源");
        let employee_rows = parser.parse(&input.employee_path, EMPLOYEE_HEADER_OFFSET)?;

        info!(source = ATTENDANCE_SOURCE, path = %input.attendance_path.display(), "读取数据源");
        let attendance_rows = parser.parse(&input.attendance_path, ATTENDANCE_HEADER_OFFSET)?;

        info!(source = WORK_ORDER_SOURCE, path = %input.work_order_path.display(), "读取数据源");
        let work_order_rows = parser.parse(&input.work_order_path, WORK_ORDER_HEADER_OFFSET)?;

        self.run_from_rows(
            &personnel_rows,
            &employee_rows,
            &attendance_rows,
            &work_order_rows,
        )
    }

    /// 从已解析的原始行执行完整流水线（测试与内存数据场景）
    pub fn run_from_rows(
        &self,
        personnel_rows: &[RawRow],
        employee_rows: &[RawRow],
        attendance_rows: &[RawRow],
        work_order_rows: &[RawRow],
    ) -> ImportResult<PipelineResult> {
        // 1. 身份解析
        info!("1. 合并人员信息");
        let resolver = IdentityResolver::from_raw_rows(personnel_rows, employee_rows)?;

        // 2. 出勤归一化
        info!("2. 处理车辆出勤记录");
        let normalized = AttendanceNormalizer::normalize(attendance_rows, &resolver)?;
        let mut attendance = normalized.records;

        // 3. 工单聚合
        info!("3. 处理工单进展");
        let work_orders = WorkOrderAggregator::load_records(work_order_rows)?;
        let aggregates = WorkOrderAggregator::aggregate(&work_orders);

        // 4. 核查规则
        info!("4. 执行出勤核查");
        let rule_engine = RuleEngine::new(self.config);
        rule_engine.run_all_checks(&mut attendance, &normalized.columns);
        let statistics = rule_engine.get_statistics(&attendance);

        // 5. 出勤/工单核对
        info!("5. 合并出勤与工单数据");
        let reconciled = Reconciler::reconcile(&attendance, &aggregates);

        info!(
            identities = resolver.identities().len(),
            attendance = attendance.len(),
            aggregates = aggregates.len(),
            "流水线执行完成"
        );

        Ok(PipelineResult {
            identities: resolver.identities().to_vec(),
            attendance,
            aggregates,
            reconciled,
            statistics,
        })
    }
}

impl PipelineInput {
    pub fn new<P: AsRef<Path>>(personnel: P, employee: P, attendance: P, work_order: P) -> Self {
        Self {
            personnel_path: personnel.as_ref().to_path_buf(),
            employee_path: employee.as_ref().to_path_buf(),
            attendance_path: attendance.as_ref().to_path_buf(),
            work_order_path: work_order.as_ref().to_path_buf(),
        }
    }
}
