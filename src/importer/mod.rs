// ==========================================
// 生产订单核对系统 - 导入层
// ==========================================
// 职责: 外部表格数据导入（订单 / 报工）
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod production_importer_impl;
pub mod production_importer_trait;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapperImpl;
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use production_importer_impl::ProductionImporterImpl;

// 重导出 Trait 接口
pub use production_importer_trait::{FieldMapper, FileParser, MappedReport, ProductionImporter};
