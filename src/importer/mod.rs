// ==========================================
// 内控管理分析系统 - 导入层
// ==========================================
// 职责: 文件读取、原始行解析、结构校验、单元格清洗
// ==========================================

pub mod cell;
pub mod error;
pub mod file_parser;

pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, RawRow, UniversalFileParser};

/// 结构校验: 必需列缺失即中止该数据源的处理
///
/// 按首行数据行的列集合判断（解析层保证所有行共享同一表头）。
/// 空数据源同样视为结构性错误。
pub fn require_columns(
    source_name: &str,
    rows: &[RawRow],
    required: &[&str],
) -> ImportResult<()> {
    let first = rows
        .first()
        .ok_or_else(|| ImportError::EmptySource(source_name.to_string()))?;

    let missing: Vec<String> = required
        .iter()
        .filter(|col| !first.contains_key(**col))
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ImportError::MissingColumns {
            source_name: source_name.to_string(),
            columns: missing,
        })
    }
}
