// ==========================================
// 内控管理分析系统 - 身份解析引擎
// ==========================================
// 职责: 由人员明细 + 资源员工两个数据源构建归一化账号映射
// 红线: 映射在单次运行内构建、单次运行内使用, 无跨运行状态
// ==========================================

use crate::domain::PersonIdentity;
use crate::importer::{cell, require_columns, ImportResult, RawRow};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// 人员明细数据源名（表头前有一行导出说明）
pub const PERSONNEL_SOURCE: &str = "人员明细信息";
pub const PERSONNEL_HEADER_OFFSET: usize = 1;
pub const PERSONNEL_REQUIRED_COLUMNS: &[&str] = &["u_uid", "员工编号", "员工姓名", "身份证号"];

/// 资源员工数据源名（表头即首行; "*"前缀在解析层去除）
pub const EMPLOYEE_SOURCE: &str = "资源员工信息";
pub const EMPLOYEE_HEADER_OFFSET: usize = 0;
pub const EMPLOYEE_REQUIRED_COLUMNS: &[&str] = &["资源姓名", "Uniportal账号", "ID编码"];

// ==========================================
// IdentityResolver - 身份解析器
// ==========================================
#[derive(Debug)]
pub struct IdentityResolver {
    identities: Vec<PersonIdentity>,
    uid_account: HashMap<String, String>,
}

impl IdentityResolver {
    /// 从两个数据源的原始行构建身份表
    ///
    /// # 规则
    /// 1. 两侧各自去除完全重复行
    /// 2. 身份证号 / ID编码 去空白字符串化后比较
    /// 3. ID编码重复时保留最后一条（后写覆盖, 仅告警不报错）
    /// 4. 身份证号未命中映射时账号保持缺失, 不报错
    pub fn from_raw_rows(
        personnel_rows: &[RawRow],
        employee_rows: &[RawRow],
    ) -> ImportResult<Self> {
        require_columns(PERSONNEL_SOURCE, personnel_rows, PERSONNEL_REQUIRED_COLUMNS)?;
        require_columns(EMPLOYEE_SOURCE, employee_rows, EMPLOYEE_REQUIRED_COLUMNS)?;

        // ID编码 → Uniportal账号 映射
        let id_account = build_id_account_map(employee_rows);

        // 人员明细去重后逐行解析
        let mut seen = HashSet::new();
        let mut identities = Vec::new();
        for row in personnel_rows {
            let internal_uid = cell::clean_text(row.get("u_uid").map(String::as_str).unwrap_or(""));
            let employee_id = cell::normalize_null(row.get("员工编号").map(String::as_str));
            let employee_name = cell::normalize_null(row.get("员工姓名").map(String::as_str));
            let national_id = cell::normalize_null(row.get("身份证号").map(String::as_str));

            // 完全重复行只保留首条
            let dedup_key = (
                internal_uid.clone(),
                employee_id.clone(),
                employee_name.clone(),
                national_id.clone(),
            );
            if !seen.insert(dedup_key) {
                continue;
            }

            let canonical_account = national_id
                .as_deref()
                .and_then(|id| id_account.get(id))
                .cloned();

            identities.push(PersonIdentity {
                internal_uid,
                employee_id,
                employee_name,
                national_id,
                canonical_account,
            });
        }

        // u_uid → 账号 映射, 供出勤记录归一化使用
        let mut uid_account = HashMap::new();
        for identity in &identities {
            if let Some(account) = &identity.canonical_account {
                uid_account.insert(identity.internal_uid.clone(), account.clone());
            }
        }

        debug!(
            personnel = identities.len(),
            matched = uid_account.len(),
            "身份表构建完成"
        );

        Ok(Self {
            identities,
            uid_account,
        })
    }

    /// 身份表（每人员明细行一条）
    pub fn identities(&self) -> &[PersonIdentity] {
        &self.identities
    }

    /// 按上传人id查归一化账号
    pub fn account_for_uid(&self, uid: &str) -> Option<&str> {
        self.uid_account.get(uid.trim()).map(String::as_str)
    }
}

/// 构建 ID编码 → 账号 映射（去重后仍重复的键后写覆盖）
fn build_id_account_map(employee_rows: &[RawRow]) -> HashMap<String, String> {
    let mut seen = HashSet::new();
    let mut map = HashMap::new();
    let mut overwritten = 0usize;

    for row in employee_rows {
        let name = cell::normalize_null(row.get("资源姓名").map(String::as_str));
        let account = cell::normalize_null(row.get("Uniportal账号").map(String::as_str));
        let id_code = cell::normalize_null(row.get("ID编码").map(String::as_str));

        // 完全重复行只保留首条
        if !seen.insert((name, account.clone(), id_code.clone())) {
            continue;
        }

        if let (Some(id_code), Some(account)) = (id_code, account) {
            if map.insert(id_code, account).is_some() {
                overwritten += 1;
            }
        }
    }

    if overwritten > 0 {
        // 同一ID编码对应多个账号, 后写覆盖会静默丢弃先到的行
        warn!(overwritten, "资源员工表存在重复ID编码, 保留最后一条");
    }

    map
}
