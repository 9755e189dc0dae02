// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的 CSV 文件生成、应用状态组装等功能
// ==========================================
#![allow(dead_code)]

use production_order_reconcile::app::AppState;
use production_order_reconcile::config::{config_keys, ConfigManager};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};

/// 订单表头
pub const ORDER_HEADER: &str = "OrderNumber,OperationNumber,Quantity,DueDate,Unused,Product";

/// 报工表头
pub const REPORT_HEADER: &str = "OrderNumber,OperationNumber,Quantity,ProductionDateTime";

/// 创建临时 CSV 文件（原样写入每一行）
///
/// # 返回
/// - NamedTempFile: 临时文件（需要保持存活）
pub fn create_csv_file(lines: &[&str]) -> NamedTempFile {
    let mut temp_file = Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("Failed to create temp csv");
    for line in lines {
        writeln!(temp_file, "{}", line).expect("Failed to write csv line");
    }
    temp_file.flush().expect("Failed to flush csv");
    temp_file
}

/// 创建订单 CSV（含表头）
///
/// 每行: (订单号, 工序号, 数量, 交货期, 产品)
pub fn create_orders_csv(rows: &[(i32, i32, f64, &str, &str)]) -> NamedTempFile {
    let mut lines = vec![ORDER_HEADER.to_string()];
    lines.extend(
        rows.iter()
            .map(|(n, op, qty, due, product)| format!("{},{},{},{},,{}", n, op, qty, due, product)),
    );
    let refs: Vec<&str> = lines.iter().map(|l| l.as_str()).collect();
    create_csv_file(&refs)
}

/// 创建报工 CSV（含表头）
///
/// 每行: (订单号, 工序号, 数量, 报工时间)
pub fn create_reports_csv(rows: &[(i32, i32, f64, &str)]) -> NamedTempFile {
    let mut lines = vec![REPORT_HEADER.to_string()];
    lines.extend(
        rows.iter()
            .map(|(n, op, qty, at)| format!("{},{},{},{}", n, op, qty, at)),
    );
    let refs: Vec<&str> = lines.iter().map(|l| l.as_str()).collect();
    create_csv_file(&refs)
}

/// 文件路径字符串
pub fn path_of(file: &NamedTempFile) -> String {
    file.path().display().to_string()
}

/// 默认配置的应用状态
pub fn create_test_state() -> AppState {
    AppState::new(ConfigManager::new())
}

/// 覆写若干配置项后的应用状态
pub fn create_test_state_with(overrides: &[(&str, &str)]) -> AppState {
    let mut config = ConfigManager::new();
    for (key, value) in overrides {
        config.set(key, *value);
    }
    AppState::new(config)
}

/// 逐行容错导入的应用状态
pub fn create_best_effort_state() -> AppState {
    create_test_state_with(&[(config_keys::IMPORT_POLICY, "BEST_EFFORT_PARTIAL")])
}

/// 仓库内固定测试文件路径（tests/fixtures/）
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}
