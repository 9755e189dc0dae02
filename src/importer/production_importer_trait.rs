// ==========================================
// 生产订单核对系统 - 订单/报工导入 Trait
// ==========================================
// 职责: 定义导入接口（不包含实现）
// ==========================================

use crate::domain::import::{ImportSummary, RawOrderRow, RawReportRow, RawRow};
use crate::domain::order::NewOrder;
use crate::domain::report::Report;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// ProductionImporter Trait
// ==========================================
// 用途: 订单/报工导入主接口
// 实现者: ProductionImporterImpl
#[async_trait]
pub trait ProductionImporter: Send + Sync {
    /// 从文件导入订单
    ///
    /// # 参数
    /// - file_path: 文件路径（.xlsx / .xls / .csv，取第一个工作表）
    ///
    /// # 返回
    /// - Ok(ImportSummary): imported 为实际落库订单数
    /// - Err: 文件错误、任一行类型转换失败（整批失败，落库范围见 ImportPolicy）
    async fn import_orders_from_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportSummary>;

    /// 从文件导入报工
    ///
    /// # 说明
    /// - 报工时间缺失或无法识别时使用最小日期，不视为错误
    /// - 报工不去重
    async fn import_reports_from_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportSummary>;

    /// 批量导入多个报工文件
    ///
    /// # 说明
    /// - 文件解析并发执行，落库按传入顺序依次进行
    /// - 某个文件失败不影响其他文件
    async fn batch_import_reports<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<Result<ImportSummary, String>>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: ExcelParser, CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文件为按列位置排列的原始行
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - header_rows: 开头跳过的表头行数
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 数据行（完全空白的行已跳过）
    /// - Err: 文件读取错误、格式错误
    fn parse_to_raw_rows(&self, file_path: &Path, header_rows: usize) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 行映射 + 类型转换
// 实现者: FieldMapperImpl
pub trait FieldMapper: Send + Sync {
    /// 订单行 → NewOrder（严格：任一字段缺失或无法转换即失败）
    fn map_order(&self, row: &RawOrderRow) -> ImportResult<NewOrder>;

    /// 报工行 → Report（数值字段严格，报工时间宽松）
    fn map_report(&self, row: &RawReportRow) -> ImportResult<MappedReport>;
}

/// 报工映射结果
#[derive(Debug, Clone, PartialEq)]
pub struct MappedReport {
    pub report: Report,
    /// 报工时间是否使用了兜底最小日期
    pub date_defaulted: bool,
}
