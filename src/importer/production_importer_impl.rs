// ==========================================
// 生产订单核对系统 - 订单/报工导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到内存仓储
// 流程: 解析(阻塞线程池) → 映射 → 落库(持锁)
// 原子性: 由 ImportPolicy 决定
//   - AllOrNothing: 全部行映射成功后才落库
//   - BestEffortPartial: 逐行映射落库，失败行之前的行保留
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::import::{ImportSummary, RawOrderRow, RawReportRow, RawRow};
use crate::domain::order::NewOrder;
use crate::domain::report::Report;
use crate::domain::types::ImportPolicy;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::production_importer_trait::{
    FieldMapper, FileParser, MappedReport, ProductionImporter,
};
use crate::repository::SharedRecordStore;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ProductionImporterImpl - 订单/报工导入器实现
// ==========================================
pub struct ProductionImporterImpl<C>
where
    C: ImportConfigReader,
{
    // 共享仓储
    store: SharedRecordStore,

    // 配置读取器
    config: C,

    // 导入组件（解析器需跨线程移入阻塞任务）
    file_parser: Arc<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
}

impl<C> ProductionImporterImpl<C>
where
    C: ImportConfigReader,
{
    /// 创建导入器
    ///
    /// # 参数
    /// - store: 共享仓储
    /// - config: 配置读取器
    /// - file_parser: 文件解析器
    /// - field_mapper: 字段映射器
    pub fn new(
        store: SharedRecordStore,
        config: C,
        file_parser: Arc<dyn FileParser>,
        field_mapper: Box<dyn FieldMapper>,
    ) -> Self {
        Self {
            store,
            config,
            file_parser,
            field_mapper,
        }
    }

    // ==========================================
    // 行级导入（同步，已解析的行）
    // ==========================================

    /// 导入订单行
    ///
    /// # 返回
    /// - Ok(ImportSummary): imported / skipped_duplicates
    /// - Err: 第一条映射失败的行（落库范围见 ImportPolicy）
    pub fn import_order_rows(
        &self,
        rows: &[RawRow],
        policy: ImportPolicy,
    ) -> ImportResult<ImportSummary> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();

        let inserted = match policy {
            ImportPolicy::AllOrNothing => {
                let orders = rows
                    .iter()
                    .map(|row| self.field_mapper.map_order(&RawOrderRow::from(row)))
                    .collect::<ImportResult<Vec<NewOrder>>>()?;
                debug!(rows = orders.len(), "订单行映射完成");

                let mut store = self.store.lock()?;
                store.import_orders(orders)
            }
            ImportPolicy::BestEffortPartial => {
                let mut store = self.store.lock()?;
                let mut batch = store.begin_order_batch();
                for row in rows {
                    match self.field_mapper.map_order(&RawOrderRow::from(row)) {
                        Ok(order) => {
                            batch.insert(order);
                        }
                        Err(e) => {
                            warn!(
                                row = row.row_number,
                                committed = batch.inserted(),
                                error = %e,
                                "订单行映射失败，已落库的行保留"
                            );
                            return Err(e);
                        }
                    }
                }
                batch.inserted()
            }
        };

        let skipped_duplicates = rows.len() - inserted;
        if skipped_duplicates > 0 {
            warn!(skipped = skipped_duplicates, "匹配键重复的订单已丢弃");
        }

        Ok(ImportSummary {
            batch_id,
            file_name: None,
            total_rows: rows.len(),
            imported: inserted,
            skipped_duplicates,
            defaulted_dates: 0,
            elapsed: start_time.elapsed(),
        })
    }

    /// 导入报工行
    ///
    /// # 返回
    /// - Ok(ImportSummary): imported / defaulted_dates
    /// - Err: 第一条映射失败的行（落库范围见 ImportPolicy）
    pub fn import_report_rows(
        &self,
        rows: &[RawRow],
        policy: ImportPolicy,
    ) -> ImportResult<ImportSummary> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        let mut defaulted_dates = 0;

        let appended = match policy {
            ImportPolicy::AllOrNothing => {
                let mut reports: Vec<Report> = Vec::with_capacity(rows.len());
                for row in rows {
                    let MappedReport {
                        report,
                        date_defaulted,
                    } = self.field_mapper.map_report(&RawReportRow::from(row))?;
                    if date_defaulted {
                        defaulted_dates += 1;
                    }
                    reports.push(report);
                }
                debug!(rows = reports.len(), "报工行映射完成");

                let mut store = self.store.lock()?;
                store.import_reports(reports)
            }
            ImportPolicy::BestEffortPartial => {
                let mut store = self.store.lock()?;
                let mut appended = 0;
                for row in rows {
                    match self.field_mapper.map_report(&RawReportRow::from(row)) {
                        Ok(mapped) => {
                            if mapped.date_defaulted {
                                defaulted_dates += 1;
                            }
                            appended += store.import_reports(std::iter::once(mapped.report));
                        }
                        Err(e) => {
                            warn!(
                                row = row.row_number,
                                committed = appended,
                                error = %e,
                                "报工行映射失败，已落库的行保留"
                            );
                            return Err(e);
                        }
                    }
                }
                appended
            }
        };

        Ok(ImportSummary {
            batch_id,
            file_name: None,
            total_rows: rows.len(),
            imported: appended,
            skipped_duplicates: 0,
            defaulted_dates,
            elapsed: start_time.elapsed(),
        })
    }

    // ==========================================
    // 文件解析
    // ==========================================

    /// 在阻塞线程池中解析文件（不持锁）
    async fn parse_file(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        let header_rows = self.config.get_header_rows().await?;
        let parser = Arc::clone(&self.file_parser);
        let path = file_path.to_path_buf();

        let rows = tokio::task::spawn_blocking(move || parser.parse_to_raw_rows(&path, header_rows))
            .await
            .map_err(|e| ImportError::InternalError(format!("文件解析任务异常: {}", e)))??;

        info!(total_rows = rows.len(), "文件解析完成");
        Ok(rows)
    }
}

fn file_name_of(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
}

#[async_trait::async_trait]
impl<C> ProductionImporter for ProductionImporterImpl<C>
where
    C: ImportConfigReader + Send + Sync,
{
    #[instrument(skip(self, file_path), fields(file))]
    async fn import_orders_from_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportSummary> {
        let path = file_path.as_ref();
        tracing::Span::current().record("file", path.display().to_string().as_str());
        info!("开始导入订单");

        let policy = self.config.get_import_policy().await?;
        let rows = self.parse_file(path).await?;

        let mut summary = self.import_order_rows(&rows, policy).map_err(|e| {
            error!(error = %e, policy = %policy, "订单导入失败");
            e
        })?;
        summary.file_name = file_name_of(path);

        info!(
            batch_id = %summary.batch_id,
            imported = summary.imported,
            skipped_duplicates = summary.skipped_duplicates,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "订单导入完成"
        );
        Ok(summary)
    }

    #[instrument(skip(self, file_path), fields(file))]
    async fn import_reports_from_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<ImportSummary> {
        let path = file_path.as_ref();
        tracing::Span::current().record("file", path.display().to_string().as_str());
        info!("开始导入报工");

        let policy = self.config.get_import_policy().await?;
        let rows = self.parse_file(path).await?;

        let mut summary = self.import_report_rows(&rows, policy).map_err(|e| {
            error!(error = %e, policy = %policy, "报工导入失败");
            e
        })?;
        summary.file_name = file_name_of(path);

        info!(
            batch_id = %summary.batch_id,
            imported = summary.imported,
            defaulted_dates = summary.defaulted_dates,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "报工导入完成"
        );
        Ok(summary)
    }

    /// 批量导入报工文件
    ///
    /// 解析并发执行；落库按传入顺序依次进行，保证报工插入顺序稳定
    async fn batch_import_reports<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
    ) -> Vec<Result<ImportSummary, String>> {
        use futures::future::join_all;

        info!(count = file_paths.len(), "开始批量导入报工文件");

        let policy = match self.config.get_import_policy().await {
            Ok(policy) => policy,
            Err(e) => {
                error!(error = %e, "读取导入策略失败");
                let message = format!("读取导入策略失败: {}", e);
                return file_paths.iter().map(|_| Err(message.clone())).collect();
            }
        };

        // 并发解析所有文件
        let parsed = join_all(file_paths.iter().map(|path| self.parse_file(path.as_ref()))).await;

        // 按顺序落库
        let mut results = Vec::with_capacity(parsed.len());
        for (path, rows) in file_paths.iter().zip(parsed) {
            let path = path.as_ref();
            let path_str = path.display().to_string();

            let outcome = rows
                .and_then(|rows| self.import_report_rows(&rows, policy))
                .map(|mut summary| {
                    summary.file_name = file_name_of(path);
                    summary
                });

            match outcome {
                Ok(summary) => {
                    info!(file = %path_str, imported = summary.imported, "文件导入成功");
                    results.push(Ok(summary));
                }
                Err(e) => {
                    error!(file = %path_str, error = %e, "文件导入失败");
                    results.push(Err(format!("文件 {} 导入失败: {}", path_str, e)));
                }
            }
        }

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );

        results
    }
}
