// ==========================================
// 内控管理分析系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// header_offset: 表头行之前需要跳过的说明行数
//   (人员明细/车辆出勤导出文件首行为说明行, header_offset=1;
//    资源员工/工单导出文件表头即首行, header_offset=0)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook, Reader, Xlsx};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 原始行: 列名 → 单元格文本（已去除首尾空白）
pub type RawRow = HashMap<String, String>;

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl CsvParser {
    pub fn parse_to_raw_records(
        &self,
        file_path: &Path,
        header_offset: usize,
    ) -> ImportResult<Vec<RawRow>> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 打开 CSV 文件（不让 csv crate 自动消费表头, 由偏移逻辑统一处理）
        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut rows = reader.records();

        // 跳过表头之前的说明行
        for _ in 0..header_offset {
            if rows.next().is_none() {
                return Err(ImportError::EmptySource(path.display().to_string()));
            }
        }

        // 读取表头
        let header_record = rows
            .next()
            .ok_or_else(|| ImportError::EmptySource(path.display().to_string()))??;
        let headers: Vec<String> = header_record
            .iter()
            .map(|h| normalize_header(h))
            .collect();

        // 读取所有数据行（短行补空, 保证每行都含全部表头键）
        let mut records = Vec::new();
        for result in rows {
            let record = result?;
            let mut row_map = HashMap::new();

            for (col_idx, header) in headers.iter().enumerate() {
                let value = record.get(col_idx).unwrap_or("").trim().to_string();
                row_map.insert(header.clone(), value);
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        Ok(records)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl ExcelParser {
    pub fn parse_to_raw_records(
        &self,
        file_path: &Path,
        header_offset: usize,
    ) -> ImportResult<Vec<RawRow>> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        // 打开 Excel 文件
        let mut workbook: Xlsx<_> = open_workbook(path)
            .map_err(|e: calamine::XlsxError| ImportError::ExcelParseError(e.to_string()))?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::ExcelParseError(
                "Excel 文件无工作表".to_string(),
            ));
        }

        let sheet_name = sheet_names[0].clone();
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ExcelParseError(e.to_string()))?;

        let mut rows = range.rows();

        // 跳过表头之前的说明行
        for _ in 0..header_offset {
            if rows.next().is_none() {
                return Err(ImportError::EmptySource(path.display().to_string()));
            }
        }

        // 提取表头
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::EmptySource(path.display().to_string()))?;

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| normalize_header(&cell.to_string()))
            .collect();

        // 读取数据行（短行补空, 保证每行都含全部表头键）
        let mut records = Vec::new();
        for data_row in rows {
            let mut row_map = HashMap::new();

            for (col_idx, header) in headers.iter().enumerate() {
                let value = data_row
                    .get(col_idx)
                    .map(|cell| cell.to_string().trim().to_string())
                    .unwrap_or_default();
                row_map.insert(header.clone(), value);
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        Ok(records)
    }
}

/// 标准化表头: 去空白, 去除导出模板的必填标记前缀 "*"
/// (资源员工导出的 "*资源姓名"/"*ID编码" 统一为 "资源姓名"/"ID编码")
fn normalize_header(raw: &str) -> String {
    raw.trim().trim_start_matches('*').to_string()
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(
        &self,
        file_path: P,
        header_offset: usize,
    ) -> ImportResult<Vec<RawRow>> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => {
                let parser = CsvParser;
                parser.parse_to_raw_records(path, header_offset)
            }
            "xlsx" | "xls" => {
                let parser = ExcelParser;
                parser.parse_to_raw_records(path, header_offset)
            }
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}
