// ==========================================
// 生产订单核对系统 - 订单/报工核对引擎
// ==========================================
// 规则1: 报工合计 >= 订单数量 → 删除订单
// 规则2: 0 < 报工合计 < 订单数量 → 订单数量改为报工合计
// 规则3: 找不到对应订单的报工 → 列出
// ==========================================
// 红线: 每条规则在调用时对当前仓储重新汇总，规则之间无隐式顺序
// 输入: RecordStore（订单 + 报工）
// 输出: 删除/改写订单，孤立报工列表
// ==========================================

use crate::domain::order::{Order, OrderKey};
use crate::domain::report::OrphanReport;
use crate::repository::RecordStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, instrument};

// ==========================================
// OrderOutcome - 单个订单的核对结论
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderOutcome {
    /// 报工已满足订单数量
    Delete,
    /// 报工不足，数量收缩为报工合计
    Shrink(f64),
    /// 无报工（或数量无法比较），保持不变
    Keep,
}

// ==========================================
// ReconciliationSummary - 合并执行三条规则的结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub deleted_orders: usize,
    pub updated_orders: usize,
    pub failed_reports: Vec<OrphanReport>,
}

// ==========================================
// ReconciliationEngine - 核对引擎
// ==========================================
#[derive(Debug, Default)]
pub struct ReconciliationEngine;

impl ReconciliationEngine {
    /// 创建新的核对引擎
    pub fn new() -> Self {
        Self
    }

    /// 根据报工合计判定订单结论
    ///
    /// 规则（顺序执行，命中即返回）:
    /// 1) total >= quantity → Delete（含 quantity=0 且无报工）
    /// 2) 0 < total < quantity → Shrink(total)
    /// 3) 其他 → Keep
    pub fn classify(&self, reported_total: f64, quantity: f64) -> OrderOutcome {
        if reported_total >= quantity {
            OrderOutcome::Delete
        } else if reported_total > 0.0 && reported_total < quantity {
            OrderOutcome::Shrink(reported_total)
        } else {
            OrderOutcome::Keep
        }
    }

    fn outcome_for(&self, order: &Order, totals: &HashMap<OrderKey, f64>) -> OrderOutcome {
        let total = totals.get(&order.key()).copied().unwrap_or(0.0);
        self.classify(total, order.quantity)
    }

    // ==========================================
    // 规则1: 删除报工已满足的订单
    // ==========================================

    /// 删除报工合计 >= 订单数量的订单
    ///
    /// # 返回
    /// - 删除的订单数
    #[instrument(skip_all, fields(orders = store.order_count(), reports = store.report_count()))]
    pub fn delete_fully_reported_orders(&self, store: &mut RecordStore) -> usize {
        let totals = store.reported_totals();
        let deleted = store
            .remove_orders_where(|order| self.outcome_for(order, &totals) == OrderOutcome::Delete)
            .len();

        info!(deleted_orders = deleted, "规则1执行完成");
        deleted
    }

    // ==========================================
    // 规则2: 收缩报工不足的订单
    // ==========================================

    /// 报工合计在 (0, 订单数量) 区间内时，订单数量改为报工合计（原值不保留）
    ///
    /// # 返回
    /// - 改写的订单数
    #[instrument(skip_all, fields(orders = store.order_count(), reports = store.report_count()))]
    pub fn update_under_reported_orders(&self, store: &mut RecordStore) -> usize {
        let totals = store.reported_totals();
        let updated = store.update_order_quantities(|order| match self.outcome_for(order, &totals) {
            OrderOutcome::Shrink(total) => Some(total),
            OrderOutcome::Delete | OrderOutcome::Keep => None,
        });

        info!(updated_orders = updated, "规则2执行完成");
        updated
    }

    // ==========================================
    // 规则3: 列出孤立报工
    // ==========================================

    /// 列出匹配键在订单中不存在的报工
    ///
    /// 每条孤立报工输出一条（同一匹配键不合并），保持报工插入顺序
    #[instrument(skip_all, fields(orders = store.order_count(), reports = store.report_count()))]
    pub fn list_orphan_reports(&self, store: &RecordStore) -> Vec<OrphanReport> {
        let orphans: Vec<OrphanReport> = store
            .reports()
            .iter()
            .filter(|report| !store.contains_key(report.key()))
            .map(OrphanReport::from)
            .collect();

        info!(failed_reports = orphans.len(), "规则3执行完成");
        orphans
    }

    // ==========================================
    // 合并执行
    // ==========================================

    /// 一次汇总内执行规则1和规则2，删除生效后再执行规则3
    #[instrument(skip_all, fields(orders = store.order_count(), reports = store.report_count()))]
    pub fn process_all(&self, store: &mut RecordStore) -> ReconciliationSummary {
        let totals = store.reported_totals();

        // 删除与收缩互斥，均基于原始数量判定
        let deleted_orders = store
            .remove_orders_where(|order| self.outcome_for(order, &totals) == OrderOutcome::Delete)
            .len();
        let updated_orders = store.update_order_quantities(|order| {
            match self.outcome_for(order, &totals) {
                OrderOutcome::Shrink(total) => Some(total),
                OrderOutcome::Delete | OrderOutcome::Keep => None,
            }
        });

        let failed_reports = self.list_orphan_reports(store);

        info!(
            deleted_orders,
            updated_orders,
            failed_reports = failed_reports.len(),
            "核对规则合并执行完成"
        );

        ReconciliationSummary {
            deleted_orders,
            updated_orders,
            failed_reports,
        }
    }
}
