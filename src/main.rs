// ==========================================
// 生产订单核对系统 - 命令行入口
// ==========================================
// 流程: 加载配置 → 导入订单 → 导入报工 → 执行规则 → 查询订单
// 输出: stdout 打印 JSON 结果；日志写 stderr
// ==========================================

use clap::{Parser, ValueEnum};
use production_order_reconcile::api::{ApiError, ApiResult};
use production_order_reconcile::app::AppState;
use production_order_reconcile::i18n::{self, t_with_args};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "production-order-reconcile")]
#[command(
    version,
    about = "Reconcile production orders against production reports",
    long_about = None
)]
struct Cli {
    /// Order files (.xlsx / .xls / .csv), imported in order
    #[arg(long = "orders", value_name = "FILE")]
    orders: Vec<PathBuf>,

    /// Report files (.xlsx / .xls / .csv); several files are parsed concurrently
    #[arg(long = "reports", value_name = "FILE")]
    reports: Vec<PathBuf>,

    /// Rule to run after importing
    #[arg(long, value_enum)]
    rule: Option<RuleArg>,

    /// Look up one order (with its reports) after the rules ran
    #[arg(long = "order-id")]
    order_id: Option<u32>,

    /// Config file (defaults to the user config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override app.locale (en | zh-CN)
    #[arg(long)]
    locale: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum RuleArg {
    /// Rule 1: delete fully reported orders
    #[value(name = "1")]
    Delete,
    /// Rule 2: shrink under-reported orders
    #[value(name = "2")]
    Update,
    /// Rule 3: list reports without an order
    #[value(name = "3")]
    Failed,
    /// Rules 1 to 3 in a single pass
    All,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    production_order_reconcile::logging::init(cli.json_logs);

    let state = match AppState::from_config_file(cli.config.as_deref()) {
        Ok(state) => state,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    let locale = cli.locale.clone().unwrap_or_else(|| state.config.locale());
    i18n::set_locale(&locale);

    tracing::info!(
        "{}",
        t_with_args("cli.banner", &[("version", production_order_reconcile::VERSION)])
    );

    let source = state
        .config
        .source()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<default>".to_string());
    tracing::info!("{}", t_with_args("cli.config_loaded", &[("source", source.as_str())]));

    if cli.orders.is_empty()
        && cli.reports.is_empty()
        && cli.rule.is_none()
        && cli.order_id.is_none()
    {
        eprintln!("{}", i18n::t("cli.nothing_to_do"));
        return ExitCode::from(2);
    }

    match run(&cli, &state).await {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            let status = e.status_code().to_string();
            let message = e.to_string();
            eprintln!(
                "{}",
                t_with_args(
                    "cli.error",
                    &[("status", status.as_str()), ("message", message.as_str())]
                )
            );
            ExitCode::FAILURE
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| ApiError::Other(e.into()))
}

async fn run(cli: &Cli, state: &AppState) -> ApiResult<Value> {
    let mut output = Map::new();

    // ==========================================
    // 导入
    // ==========================================
    if !cli.orders.is_empty() {
        let mut imports = Vec::with_capacity(cli.orders.len());
        for path in &cli.orders {
            let file = path.display().to_string();
            let response = state.import_api.import_orders(&file).await?;
            let count = response.imported_orders.to_string();
            tracing::info!(
                "{}",
                t_with_args(
                    "import.orders_imported",
                    &[("count", count.as_str()), ("file", file.as_str())]
                )
            );
            imports.push(to_json(&response)?);
        }
        output.insert("orders".to_string(), Value::Array(imports));
    }

    match cli.reports.as_slice() {
        [] => {}
        [path] => {
            let file = path.display().to_string();
            let response = state.import_api.import_reports(&file).await?;
            let count = response.imported_reports.to_string();
            tracing::info!(
                "{}",
                t_with_args(
                    "import.reports_imported",
                    &[("count", count.as_str()), ("file", file.as_str())]
                )
            );
            output.insert("reports".to_string(), to_json(&response)?);
        }
        paths => {
            let files: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
            let response = state.import_api.import_report_files(&files).await?;
            output.insert("reports".to_string(), to_json(&response)?);
        }
    }

    // ==========================================
    // 规则
    // ==========================================
    if let Some(rule) = cli.rule {
        let api = &state.reconcile_api;
        let result = match rule {
            RuleArg::Delete => to_json(&api.delete_fully_reported_orders()?)?,
            RuleArg::Update => to_json(&api.update_under_reported_orders()?)?,
            RuleArg::Failed => to_json(&api.list_failed_reports()?)?,
            RuleArg::All => to_json(&api.process_business_rules()?)?,
        };
        output.insert("rule".to_string(), result);
    }

    // ==========================================
    // 查询
    // ==========================================
    if let Some(order_id) = cli.order_id {
        let order = state.order_api.get_order(order_id)?;
        output.insert("order".to_string(), to_json(&order)?);
    }

    Ok(Value::Object(output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rule_values() {
        let cli = Cli::try_parse_from(["prog", "--orders", "a.csv", "--rule", "2"]).unwrap();
        assert_eq!(cli.rule, Some(RuleArg::Update));
        assert_eq!(cli.orders, vec![PathBuf::from("a.csv")]);

        let cli = Cli::try_parse_from(["prog", "--rule", "all", "--order-id", "3"]).unwrap();
        assert_eq!(cli.rule, Some(RuleArg::All));
        assert_eq!(cli.order_id, Some(3));

        assert!(Cli::try_parse_from(["prog", "--rule", "4"]).is_err());
    }
}
