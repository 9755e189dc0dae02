// ==========================================
// 生产订单核对系统 - 导入 API
// ==========================================
// 职责: 订单/报工文件导入、清空数据
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::import::ImportSummary;
use crate::i18n::t;
use crate::importer::{ProductionImporter, ProductionImporterImpl};
use crate::repository::SharedRecordStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// 订单导入响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOrdersResponse {
    /// 实际导入的订单数（重复匹配键不计）
    pub imported_orders: usize,
    /// 匹配键重复而丢弃的订单数
    pub skipped_duplicates: usize,
    pub batch_id: String,
    /// 导入耗时（毫秒）
    pub elapsed_ms: u64,
}

/// 报工导入响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReportsResponse {
    pub imported_reports: usize,
    /// 报工时间使用最小日期兜底的条数
    pub defaulted_dates: usize,
    pub batch_id: String,
    pub elapsed_ms: u64,
}

impl From<ImportSummary> for ImportReportsResponse {
    fn from(summary: ImportSummary) -> Self {
        Self {
            imported_reports: summary.imported,
            defaulted_dates: summary.defaulted_dates,
            batch_id: summary.batch_id,
            elapsed_ms: summary.elapsed.as_millis() as u64,
        }
    }
}

/// 批量报工导入中单个文件的结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportFileResult {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imported_reports: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 批量报工导入响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchImportReportsResponse {
    pub imported_reports: usize,
    pub failed_files: usize,
    pub files: Vec<ReportFileResult>,
}

/// 导入API
pub struct ImportApi {
    importer: Arc<ProductionImporterImpl<ConfigManager>>,
    store: SharedRecordStore,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(
        importer: Arc<ProductionImporterImpl<ConfigManager>>,
        store: SharedRecordStore,
    ) -> Self {
        Self { importer, store }
    }

    /// 导入订单文件
    ///
    /// # 返回
    /// - Ok(ImportOrdersResponse): imported_orders 为实际落库数
    /// - Err(ApiError): 文件错误 / 行解析失败
    pub async fn import_orders(&self, file_path: &str) -> ApiResult<ImportOrdersResponse> {
        let file_path = validate_path(file_path)?;

        let summary = self.importer.import_orders_from_file(file_path).await?;

        Ok(ImportOrdersResponse {
            imported_orders: summary.imported,
            skipped_duplicates: summary.skipped_duplicates,
            batch_id: summary.batch_id,
            elapsed_ms: summary.elapsed.as_millis() as u64,
        })
    }

    /// 导入报工文件
    pub async fn import_reports(&self, file_path: &str) -> ApiResult<ImportReportsResponse> {
        let file_path = validate_path(file_path)?;

        let summary = self.importer.import_reports_from_file(file_path).await?;
        Ok(summary.into())
    }

    /// 批量导入报工文件（单个文件失败不影响其他文件）
    pub async fn import_report_files(
        &self,
        file_paths: &[String],
    ) -> ApiResult<BatchImportReportsResponse> {
        if file_paths.is_empty() {
            return Err(ApiError::InvalidInput("文件列表为空".to_string()));
        }
        for path in file_paths {
            validate_path(path)?;
        }

        let results = self.importer.batch_import_reports(file_paths.to_vec()).await;

        let mut response = BatchImportReportsResponse {
            imported_reports: 0,
            failed_files: 0,
            files: Vec::with_capacity(results.len()),
        };
        for (file, result) in file_paths.iter().zip(results) {
            match result {
                Ok(summary) => {
                    response.imported_reports += summary.imported;
                    response.files.push(ReportFileResult {
                        file: file.clone(),
                        imported_reports: Some(summary.imported),
                        error: None,
                    });
                }
                Err(e) => {
                    response.failed_files += 1;
                    response.files.push(ReportFileResult {
                        file: file.clone(),
                        imported_reports: None,
                        error: Some(e),
                    });
                }
            }
        }

        if response.failed_files > 0 {
            warn!(failed = response.failed_files, "部分报工文件导入失败");
        }
        Ok(response)
    }

    /// 清空订单与报工（幂等；传输层对应 204 No Content）
    pub fn clear_data(&self) -> ApiResult<()> {
        let mut store = self.store.lock()?;
        let orders = store.order_count();
        let reports = store.report_count();
        store.clear();

        info!(orders, reports, "{}", t("import.data_cleared"));
        Ok(())
    }
}

fn validate_path(file_path: &str) -> ApiResult<&str> {
    let trimmed = file_path.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput("文件路径不能为空".to_string()));
    }
    Ok(trimmed)
}
