// ==========================================
// 内控管理分析系统 - 人员身份实体
// ==========================================
// 由人员明细与资源员工两个数据源合并得到,
// 构建完成后在单次运行内不可变
// ==========================================

use serde::{Deserialize, Serialize};

/// 人员身份: 人员明细行 + 归一化账号
///
/// canonical_account 通过身份证号 → ID编码映射得到;
/// 未命中时保持 None, 不视为错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonIdentity {
    /// 内部唯一标识 (u_uid)
    pub internal_uid: String,
    /// 员工编号
    pub employee_id: Option<String>,
    /// 员工姓名
    pub employee_name: Option<String>,
    /// 身份证号（已去空白字符串化）
    pub national_id: Option<String>,
    /// Uniportal 账号（归一化账号）
    pub canonical_account: Option<String>,
}
