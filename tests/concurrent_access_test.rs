// ==========================================
// 并发访问测试
// ==========================================
// 测试目标: 多线程同时导入/执行规则时，仓储操作互斥且计数一致
// ==========================================

mod test_helpers;

use chrono::NaiveDate;
use production_order_reconcile::domain::{min_production_date_time, NewOrder, Report};
use production_order_reconcile::engine::ReconciliationEngine;
use production_order_reconcile::repository::{RecordStore, SharedRecordStore};
use std::sync::Arc;
use std::thread;

#[test]
fn test_concurrent_report_imports_are_serialized() {
    let store = SharedRecordStore::new(RecordStore::new());

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    let mut guard = store.lock().unwrap();
                    guard.import_reports(std::iter::once(Report {
                        order_number: worker,
                        operation_number: i,
                        quantity: 1.0,
                        production_date_time: min_production_date_time(),
                    }));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let guard = store.lock().unwrap();
    assert_eq!(guard.report_count(), 400);
    assert_eq!(guard.reported_totals().len(), 400);
}

#[test]
fn test_rules_run_while_importing() {
    let store = SharedRecordStore::new(RecordStore::new());
    let engine = Arc::new(ReconciliationEngine::new());

    {
        let mut guard = store.lock().unwrap();
        guard.import_orders((0..100).map(|n| NewOrder {
            order_number: n,
            operation_number: 1,
            quantity: 10.0,
            due_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            product: "P".to_string(),
        }));
    }

    let importer = {
        let store = store.clone();
        thread::spawn(move || {
            for n in 0..100 {
                let mut guard = store.lock().unwrap();
                guard.import_reports(std::iter::once(Report {
                    order_number: n,
                    operation_number: 1,
                    quantity: 10.0,
                    production_date_time: min_production_date_time(),
                }));
            }
        })
    };

    let runner = {
        let store = store.clone();
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            let mut deleted = 0;
            for _ in 0..20 {
                let mut guard = store.lock().unwrap();
                deleted += engine.delete_fully_reported_orders(&mut guard);
            }
            deleted
        })
    };

    importer.join().unwrap();
    let deleted_during = runner.join().unwrap();

    // 收尾执行一次，所有订单都已报满
    let mut guard = store.lock().unwrap();
    let deleted_after = engine.delete_fully_reported_orders(&mut guard);

    assert_eq!(deleted_during + deleted_after, 100);
    assert_eq!(guard.order_count(), 0);
    assert_eq!(guard.report_count(), 100);
}

#[tokio::test]
async fn test_concurrent_api_imports() {
    let state = Arc::new(test_helpers::create_test_state());
    let files: Vec<_> = (0..4)
        .map(|i| test_helpers::create_reports_csv(&[(i, 1, 1.0, ""), (i, 2, 2.0, "")]))
        .collect();

    let mut tasks = Vec::new();
    for file in &files {
        let state = Arc::clone(&state);
        let path = test_helpers::path_of(file);
        tasks.push(tokio::spawn(async move {
            state.import_api.import_reports(&path).await.map(|r| r.imported_reports)
        }));
    }

    let mut total = 0;
    for task in tasks {
        total += task.await.unwrap().unwrap();
    }

    assert_eq!(total, 8);
    assert_eq!(state.store.lock().unwrap().report_count(), 8);
}
