// ==========================================
// 生产订单核对系统 - 文件解析器实现
// ==========================================
// 职责: 文件 → 按列位置排列的字符串行
// 支持: Excel (.xlsx/.xls，取第一个工作表) / CSV (.csv)
// ==========================================

use crate::domain::import::RawRow;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::production_importer_trait::FileParser;
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// 检查文件存在且扩展名在允许列表内，返回小写扩展名
fn check_file(path: &Path, allowed: &[&str]) -> ImportResult<String> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if !allowed.contains(&ext.as_str()) {
        return Err(ImportError::UnsupportedFormat(ext));
    }
    Ok(ext)
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_rows(&self, file_path: &Path, header_rows: usize) -> ImportResult<Vec<RawRow>> {
        check_file(file_path, &["csv"])?;

        // 表头按行数跳过，不按列名解析
        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            if idx < header_rows {
                continue;
            }

            let cells: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();

            // 跳过完全空白的行
            if cells.iter().all(|v| v.is_empty()) {
                continue;
            }

            let row_number = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 1);
            rows.push(RawRow::new(row_number, cells));
        }

        debug!(file = %file_path.display(), rows = rows.len(), "CSV 解析完成");
        Ok(rows)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser {
    cleaner: DataCleaner,
}

impl ExcelParser {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner::new(),
        }
    }

    /// 单元格 → 字符串
    ///
    /// 整数值浮点去掉小数部分；日期序列号转为 "%Y-%m-%d %H:%M:%S"
    fn cell_to_string(&self, cell: &Data) -> String {
        match cell {
            Data::Empty | Data::Error(_) => String::new(),
            Data::String(s) => s.trim().to_string(),
            Data::Int(i) => i.to_string(),
            Data::Float(f) => {
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    format!("{}", *f as i64)
                } else {
                    f.to_string()
                }
            }
            Data::Bool(b) => b.to_string(),
            Data::DateTime(dt) => self
                .cleaner
                .excel_serial_to_date_time(dt.as_f64())
                .map(|v| self.cleaner.format_date_time(v))
                .unwrap_or_default(),
            Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        }
    }
}

impl Default for ExcelParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FileParser for ExcelParser {
    fn parse_to_raw_rows(&self, file_path: &Path, header_rows: usize) -> ImportResult<Vec<RawRow>> {
        check_file(file_path, &["xlsx", "xls"])?;

        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))??;

        // 区域可能不从 A1 开始，行号按工作表绝对位置计算
        let start_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

        let mut rows = Vec::new();
        for (idx, data_row) in range.rows().enumerate() {
            let row_number = start_row + idx + 1;
            if row_number <= header_rows {
                continue;
            }

            let cells: Vec<String> = data_row.iter().map(|c| self.cell_to_string(c)).collect();

            // 跳过完全空白的行
            if cells.iter().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(RawRow::new(row_number, cells));
        }

        debug!(file = %file_path.display(), rows = rows.len(), "Excel 解析完成");
        Ok(rows)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
#[derive(Default)]
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_to_raw_rows(&self, file_path: &Path, header_rows: usize) -> ImportResult<Vec<RawRow>> {
        let ext = check_file(file_path, &["csv", "xlsx", "xls"])?;

        match ext.as_str() {
            "csv" => CsvParser.parse_to_raw_rows(file_path, header_rows),
            _ => ExcelParser::new().parse_to_raw_rows(file_path, header_rows),
        }
    }
}
