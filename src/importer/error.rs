// ==========================================
// 内控管理分析系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 传播策略: 仅结构性错误(缺少必需列/文件不可读)中止运行,
//           单元格级解析失败降级为缺失值
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 结构性错误 =====
    #[error("数据源 {source_name} 缺少必需的列: {missing}", missing = .columns.join(", "))]
    MissingColumns {
        source_name: String,
        columns: Vec<String>,
    },

    #[error("数据源 {0} 无数据行")]
    EmptySource(String),

    // ===== 输出错误 =====
    #[error("结果导出失败: {0}")]
    ExportError(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_names_columns() {
        let err = ImportError::MissingColumns {
            source_name: "车辆出勤记录".to_string(),
            columns: vec!["日期".to_string(), "上传人id".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("车辆出勤记录"));
        assert!(msg.contains("日期"));
        assert!(msg.contains("上传人id"));
    }
}
