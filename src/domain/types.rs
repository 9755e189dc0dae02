// ==========================================
// 生产订单核对系统 - 领域类型定义
// ==========================================
// 职责: 导入策略 / 订单号分配策略
// 序列化格式: SCREAMING_SNAKE_CASE (与配置文件一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 导入策略 (Import Policy)
// ==========================================
// 决定订单批次中出现坏行时，已解析行是否落库
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportPolicy {
    /// 先解析整批，任一行失败则整批不落库
    #[default]
    AllOrNothing,
    /// 逐行解析逐行落库，失败行之前的订单保留
    BestEffortPartial,
}

impl fmt::Display for ImportPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportPolicy::AllOrNothing => write!(f, "ALL_OR_NOTHING"),
            ImportPolicy::BestEffortPartial => write!(f, "BEST_EFFORT_PARTIAL"),
        }
    }
}

impl FromStr for ImportPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ALL_OR_NOTHING" => Ok(ImportPolicy::AllOrNothing),
            "BEST_EFFORT_PARTIAL" => Ok(ImportPolicy::BestEffortPartial),
            other => Err(format!("未知导入策略: {}", other)),
        }
    }
}

// ==========================================
// 订单号分配策略 (Order Id Policy)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderIdPolicy {
    /// 每次导入从 1 开始编号（重复导入且未清空时可能与已有订单冲突）
    #[default]
    BatchLocal,
    /// 全局递增，仅在清空时归零
    Monotonic,
}

impl fmt::Display for OrderIdPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderIdPolicy::BatchLocal => write!(f, "BATCH_LOCAL"),
            OrderIdPolicy::Monotonic => write!(f, "MONOTONIC"),
        }
    }
}

impl FromStr for OrderIdPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BATCH_LOCAL" => Ok(OrderIdPolicy::BatchLocal),
            "MONOTONIC" => Ok(OrderIdPolicy::Monotonic),
            other => Err(format!("未知订单号策略: {}", other)),
        }
    }
}
