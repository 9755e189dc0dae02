// ==========================================
// 生产订单核对系统 - 内存记录仓储
// ==========================================
// 职责: 持有订单与报工两个集合，提供清空/导入/查询
// 红线: Repository 不含核对规则
// 索引: 订单按匹配键唯一索引；报工按匹配键记录位置
// ==========================================

use crate::domain::order::{NewOrder, Order, OrderKey};
use crate::domain::report::Report;
use crate::domain::types::OrderIdPolicy;
use crate::repository::error::{RepositoryError, RepositoryResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

// ==========================================
// RecordStore - 订单/报工内存仓储
// ==========================================
#[derive(Debug)]
pub struct RecordStore {
    // 订单（插入顺序）与匹配键 → 位置索引
    orders: Vec<Order>,
    order_index: HashMap<OrderKey, usize>,

    // 报工（插入顺序）与匹配键 → 位置列表
    reports: Vec<Report>,
    report_index: HashMap<OrderKey, Vec<usize>>,

    // 订单号分配
    order_id_policy: OrderIdPolicy,
    next_order_id: u32,
}

impl RecordStore {
    /// 创建空仓储（BatchLocal 编号）
    pub fn new() -> Self {
        Self::with_order_id_policy(OrderIdPolicy::default())
    }

    pub fn with_order_id_policy(order_id_policy: OrderIdPolicy) -> Self {
        Self {
            orders: Vec::new(),
            order_index: HashMap::new(),
            reports: Vec::new(),
            report_index: HashMap::new(),
            order_id_policy,
            next_order_id: 1,
        }
    }

    pub fn order_id_policy(&self) -> OrderIdPolicy {
        self.order_id_policy
    }

    // ==========================================
    // 清空
    // ==========================================

    /// 清空订单与报工（幂等）
    pub fn clear(&mut self) {
        self.orders.clear();
        self.order_index.clear();
        self.reports.clear();
        self.report_index.clear();
        self.next_order_id = 1;
    }

    // ==========================================
    // 导入
    // ==========================================

    /// 开启一个订单导入批次
    ///
    /// 批次内的 order_id 计数器按 OrderIdPolicy 决定起点
    pub fn begin_order_batch(&mut self) -> OrderBatch<'_> {
        let next_id = match self.order_id_policy {
            OrderIdPolicy::BatchLocal => 1,
            OrderIdPolicy::Monotonic => self.next_order_id,
        };
        OrderBatch {
            store: self,
            next_id,
            inserted: 0,
        }
    }

    /// 导入订单
    ///
    /// # 返回
    /// - 实际插入的订单数（匹配键已存在的订单被丢弃，不计数）
    pub fn import_orders<I>(&mut self, orders: I) -> usize
    where
        I: IntoIterator<Item = NewOrder>,
    {
        let mut batch = self.begin_order_batch();
        for order in orders {
            batch.insert(order);
        }
        batch.inserted()
    }

    /// 导入报工（不去重，全部追加）
    ///
    /// # 返回
    /// - 追加的报工条数
    pub fn import_reports<I>(&mut self, reports: I) -> usize
    where
        I: IntoIterator<Item = Report>,
    {
        let mut count = 0;
        for report in reports {
            let position = self.reports.len();
            self.report_index
                .entry(report.key())
                .or_default()
                .push(position);
            self.reports.push(report);
            count += 1;
        }
        count
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn report_count(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty() && self.reports.is_empty()
    }

    /// 按 order_id 查找（插入顺序中的第一条）
    pub fn find_order(&self, order_id: u32) -> Option<&Order> {
        self.orders.iter().find(|o| o.order_id == order_id)
    }

    pub fn find_order_by_key(&self, key: OrderKey) -> Option<&Order> {
        self.order_index.get(&key).map(|&pos| &self.orders[pos])
    }

    pub fn contains_key(&self, key: OrderKey) -> bool {
        self.order_index.contains_key(&key)
    }

    /// 匹配键对应的报工（插入顺序）
    pub fn reports_for(&self, key: OrderKey) -> impl Iterator<Item = &Report> + '_ {
        self.report_index
            .get(&key)
            .into_iter()
            .flatten()
            .map(move |&pos| &self.reports[pos])
    }

    /// 匹配键对应的报工数量合计（无报工为 0）
    pub fn reported_total(&self, key: OrderKey) -> f64 {
        self.reports_for(key).map(|r| r.quantity).sum()
    }

    /// 全部匹配键的报工数量合计（按报工插入顺序累加）
    pub fn reported_totals(&self) -> HashMap<OrderKey, f64> {
        let mut totals: HashMap<OrderKey, f64> = HashMap::with_capacity(self.report_index.len());
        for report in &self.reports {
            *totals.entry(report.key()).or_insert(0.0) += report.quantity;
        }
        totals
    }

    // ==========================================
    // 变更（供核对引擎使用）
    // ==========================================

    /// 删除满足条件的订单，返回被删除的订单（原插入顺序）
    pub fn remove_orders_where<F>(&mut self, mut predicate: F) -> Vec<Order>
    where
        F: FnMut(&Order) -> bool,
    {
        let (removed, kept): (Vec<Order>, Vec<Order>) =
            std::mem::take(&mut self.orders).into_iter().partition(|o| predicate(o));

        self.orders = kept;
        self.rebuild_order_index();
        debug!(removed = removed.len(), remaining = self.orders.len(), "订单已删除");
        removed
    }

    /// 按闭包结果改写订单数量
    ///
    /// 闭包返回 Some(新数量) 的订单被改写；匹配键不可变，索引无需重建
    ///
    /// # 返回
    /// - 被改写的订单数
    pub fn update_order_quantities<F>(&mut self, mut new_quantity: F) -> usize
    where
        F: FnMut(&Order) -> Option<f64>,
    {
        let mut updated = 0;
        for order in &mut self.orders {
            if let Some(quantity) = new_quantity(order) {
                order.quantity = quantity;
                updated += 1;
            }
        }
        updated
    }

    fn rebuild_order_index(&mut self) {
        self.order_index = self
            .orders
            .iter()
            .enumerate()
            .map(|(pos, o)| (o.key(), pos))
            .collect();
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// OrderBatch - 单次订单导入的写入句柄
// ==========================================
pub struct OrderBatch<'a> {
    store: &'a mut RecordStore,
    next_id: u32,
    inserted: usize,
}

impl OrderBatch<'_> {
    /// 插入一条订单
    ///
    /// # 返回
    /// - Some(order_id): 插入成功
    /// - None: 匹配键已存在（静默丢弃）
    pub fn insert(&mut self, order: NewOrder) -> Option<u32> {
        let key = order.key();
        if self.store.order_index.contains_key(&key) {
            debug!(key = %key, "匹配键已存在，订单丢弃");
            return None;
        }

        let order_id = self.next_id;
        self.next_id += 1;
        if self.store.order_id_policy == OrderIdPolicy::Monotonic {
            self.store.next_order_id = self.next_id;
        }

        let position = self.store.orders.len();
        self.store.orders.push(order.into_order(order_id));
        self.store.order_index.insert(key, position);
        self.inserted += 1;
        Some(order_id)
    }

    pub fn inserted(&self) -> usize {
        self.inserted
    }
}

// ==========================================
// SharedRecordStore - 进程级共享仓储（互斥访问）
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct SharedRecordStore {
    inner: Arc<Mutex<RecordStore>>,
}

impl SharedRecordStore {
    pub fn new(store: RecordStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// 获取独占访问（导入/清空/规则/查询均需持锁完成）
    pub fn lock(&self) -> RepositoryResult<MutexGuard<'_, RecordStore>> {
        self.inner
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::min_production_date_time;
    use chrono::NaiveDate;

    fn new_order(order_number: i32, operation_number: i32, quantity: f64) -> NewOrder {
        NewOrder {
            order_number,
            operation_number,
            quantity,
            due_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            product: format!("P{}", order_number),
        }
    }

    fn report(order_number: i32, operation_number: i32, quantity: f64) -> Report {
        Report {
            order_number,
            operation_number,
            quantity,
            production_date_time: min_production_date_time(),
        }
    }

    #[test]
    fn test_import_orders_skips_duplicate_keys() {
        let mut store = RecordStore::new();
        let inserted = store.import_orders(vec![
            new_order(1, 10, 5.0),
            new_order(1, 10, 99.0),
            new_order(1, 20, 7.0),
        ]);

        assert_eq!(inserted, 2);
        assert_eq!(store.order_count(), 2);
        // 保留第一次出现
        assert_eq!(store.find_order_by_key(OrderKey::new(1, 10)).unwrap().quantity, 5.0);
    }

    #[test]
    fn test_batch_local_ids_restart_each_import() {
        let mut store = RecordStore::new();
        store.import_orders(vec![new_order(1, 1, 1.0), new_order(2, 1, 1.0)]);
        store.import_orders(vec![new_order(3, 1, 1.0)]);

        let ids: Vec<u32> = store.orders().iter().map(|o| o.order_id).collect();
        assert_eq!(ids, vec![1, 2, 1]);
        // 冲突时取插入顺序第一条
        assert_eq!(store.find_order(1).unwrap().order_number, 1);
    }

    #[test]
    fn test_batch_local_ids_skip_duplicates_without_gaps() {
        let mut store = RecordStore::new();
        store.import_orders(vec![
            new_order(1, 1, 1.0),
            new_order(1, 1, 1.0),
            new_order(2, 1, 1.0),
        ]);

        let ids: Vec<u32> = store.orders().iter().map(|o| o.order_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_monotonic_ids_continue_until_clear() {
        let mut store = RecordStore::with_order_id_policy(OrderIdPolicy::Monotonic);
        store.import_orders(vec![new_order(1, 1, 1.0), new_order(2, 1, 1.0)]);
        store.import_orders(vec![new_order(3, 1, 1.0)]);

        let ids: Vec<u32> = store.orders().iter().map(|o| o.order_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        store.clear();
        store.import_orders(vec![new_order(4, 1, 1.0)]);
        assert_eq!(store.orders()[0].order_id, 1);
    }

    #[test]
    fn test_import_reports_never_dedups() {
        let mut store = RecordStore::new();
        let count = store.import_reports(vec![report(1, 1, 2.0), report(1, 1, 2.0)]);

        assert_eq!(count, 2);
        assert_eq!(store.reports_for(OrderKey::new(1, 1)).count(), 2);
        assert_eq!(store.reported_total(OrderKey::new(1, 1)), 4.0);
        assert_eq!(store.reported_total(OrderKey::new(2, 2)), 0.0);
    }

    #[test]
    fn test_reported_totals_groups_by_key() {
        let mut store = RecordStore::new();
        store.import_reports(vec![report(1, 1, 40.0), report(2, 1, 3.0), report(1, 1, 70.0)]);

        let totals = store.reported_totals();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&OrderKey::new(1, 1)], 110.0);
        assert_eq!(totals[&OrderKey::new(2, 1)], 3.0);
    }

    #[test]
    fn test_remove_orders_where_keeps_index_consistent() {
        let mut store = RecordStore::new();
        store.import_orders(vec![
            new_order(1, 1, 1.0),
            new_order(2, 1, 2.0),
            new_order(3, 1, 3.0),
        ]);

        let removed = store.remove_orders_where(|o| o.order_number == 2);
        assert_eq!(removed.len(), 1);
        assert!(!store.contains_key(OrderKey::new(2, 1)));
        assert_eq!(store.find_order_by_key(OrderKey::new(3, 1)).unwrap().quantity, 3.0);

        // 删除后可以重新导入同一匹配键
        assert_eq!(store.import_orders(vec![new_order(2, 1, 9.0)]), 1);
    }

    #[test]
    fn test_update_order_quantities() {
        let mut store = RecordStore::new();
        store.import_orders(vec![new_order(1, 1, 10.0), new_order(2, 1, 20.0)]);

        let updated = store.update_order_quantities(|o| (o.order_number == 2).then_some(5.0));

        assert_eq!(updated, 1);
        assert_eq!(store.find_order_by_key(OrderKey::new(1, 1)).unwrap().quantity, 10.0);
        assert_eq!(store.find_order_by_key(OrderKey::new(2, 1)).unwrap().quantity, 5.0);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut store = RecordStore::new();
        store.import_orders(vec![new_order(1, 1, 1.0)]);
        store.import_reports(vec![report(1, 1, 1.0)]);

        store.clear();
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.reported_total(OrderKey::new(1, 1)), 0.0);
    }

    #[test]
    fn test_shared_store_lock() {
        let shared = SharedRecordStore::new(RecordStore::new());
        shared.lock().unwrap().import_orders(vec![new_order(1, 1, 1.0)]);

        let cloned = shared.clone();
        assert_eq!(cloned.lock().unwrap().order_count(), 1);
    }
}
