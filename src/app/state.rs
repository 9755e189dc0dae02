// ==========================================
// 生产订单核对系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::path::Path;
use std::sync::Arc;

use crate::api::{ImportApi, OrderApi, ReconcileApi};
use crate::config::ConfigManager;
use crate::engine::{OrderQueryService, ReconciliationEngine};
use crate::importer::{DataCleaner, FieldMapperImpl, ProductionImporterImpl, UniversalFileParser};
use crate::repository::{RecordStore, SharedRecordStore};

/// 应用状态
///
/// 进程内唯一一份订单/报工仓储，所有 API 共享
pub struct AppState {
    /// 生效配置
    pub config: Arc<ConfigManager>,

    /// 共享仓储
    pub store: SharedRecordStore,

    /// 导入API（订单/报工/清空）
    pub import_api: Arc<ImportApi>,

    /// 订单查询API
    pub order_api: Arc<OrderApi>,

    /// 核对规则API
    pub reconcile_api: Arc<ReconcileApi>,
}

impl AppState {
    /// 按给定配置创建AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 按 order_id 策略创建空仓储
    /// 2. 按日期格式配置组装导入器
    /// 3. 创建所有API实例
    pub fn new(config: ConfigManager) -> Self {
        tracing::info!(
            source = %config
                .source()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<default>".to_string()),
            "初始化AppState"
        );

        // ==========================================
        // 仓储
        // ==========================================
        let store =
            SharedRecordStore::new(RecordStore::with_order_id_policy(config.order_id_policy()));

        // ==========================================
        // 导入器
        // ==========================================
        let cleaner = DataCleaner::with_extra_formats(config.extra_date_formats());
        let importer = Arc::new(ProductionImporterImpl::new(
            store.clone(),
            config.clone(),
            Arc::new(UniversalFileParser),
            Box::new(FieldMapperImpl::with_cleaner(cleaner)),
        ));

        // ==========================================
        // Engine / API
        // ==========================================
        let reconciliation_engine = Arc::new(ReconciliationEngine::new());
        let query_service = Arc::new(OrderQueryService::new());

        let import_api = Arc::new(ImportApi::new(importer, store.clone()));
        let order_api = Arc::new(OrderApi::new(store.clone(), query_service));
        let reconcile_api = Arc::new(ReconcileApi::new(store.clone(), reconciliation_engine));

        tracing::info!("AppState初始化完成");

        Self {
            config: Arc::new(config),
            store,
            import_api,
            order_api,
            reconcile_api,
        }
    }

    /// 从配置文件创建（未指定时读取默认位置，缺失则使用默认配置）
    pub fn from_config_file(config_path: Option<&Path>) -> Result<Self, String> {
        let config = match config_path {
            Some(path) => ConfigManager::from_file(path),
            None => ConfigManager::load_default(),
        }
        .map_err(|e| format!("无法加载配置: {}", e))?;

        Ok(Self::new(config))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ConfigManager::new())
    }
}
