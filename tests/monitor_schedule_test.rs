// ==========================================
// 库存监控调度测试
// ==========================================
// 测试目标: 启动即检查、固定间隔、停用后不再检查、进行中保护
// 说明: 使用 tokio 暂停时钟（start_paused），无需真实等待
// ==========================================


use std::sync::Arc;
use std::time::Duration;
use stone_inventory::domain::StockCategory;
use stone_inventory::engine::{
    CycleOutcome, MonitorState, NotificationDispatcher, StockMonitor, DEFAULT_CHECK_INTERVAL,
};
use test_helpers::{blanco_negro, GatedSource, RecordingTransport};

const CATEGORY_COUNT: usize = StockCategory::ALL.len();

fn build(source: Arc<GatedSource>) -> (Arc<StockMonitor>, Arc<RecordingTransport>) {
    let transport = Arc::new(RecordingTransport::default());
    let dispatcher = Arc::new(
        NotificationDispatcher::new(transport.clone(), "stock@marmoleria.es").unwrap(),
    );
    (Arc::new(StockMonitor::new(source, dispatcher)), transport)
}

#[tokio::test(start_paused = true)]
async fn test_activation_runs_immediately_then_every_interval() {
    let source = Arc::new(GatedSource::open(blanco_negro()));
    let (monitor, transport) = build(source.clone());

    let handle = monitor.activate(DEFAULT_CHECK_INTERVAL);

    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(source.calls(), CATEGORY_COUNT);
    assert_eq!(transport.sent_count(), 1);
    assert_eq!(monitor.alerts().len(), 1);

    tokio::time::sleep(DEFAULT_CHECK_INTERVAL).await;
    assert_eq!(source.calls(), 2 * CATEGORY_COUNT);
    assert_eq!(transport.sent_count(), 2);

    handle.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_no_cycles_after_deactivation() {
    let source = Arc::new(GatedSource::open(blanco_negro()));
    let (monitor, transport) = build(source.clone());

    let handle = monitor.activate(DEFAULT_CHECK_INTERVAL);
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(source.calls(), CATEGORY_COUNT);

    handle.deactivate();
    assert!(!handle.is_active());
    handle.shutdown().await;

    tokio::time::sleep(DEFAULT_CHECK_INTERVAL * 3).await;
    assert_eq!(source.calls(), CATEGORY_COUNT);
    assert_eq!(transport.sent_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_stops_schedule() {
    let source = Arc::new(GatedSource::open(blanco_negro()));
    let (monitor, _transport) = build(source.clone());

    let handle = monitor.activate(Duration::from_secs(60));
    tokio::time::sleep(Duration::from_millis(1)).await;
    drop(handle);

    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(source.calls(), CATEGORY_COUNT);
}

#[tokio::test]
async fn test_refresh_while_checking_does_not_start_second_wave() {
    let source = Arc::new(GatedSource::closed(blanco_negro()));
    let (monitor, transport) = build(source.clone());

    let mut rx = monitor.subscribe();
    let running = {
        let monitor = monitor.clone();
        tokio::spawn(async move { monitor.run_cycle().await })
    };

    rx.wait_for(|s| s.is_checking).await.unwrap();
    assert_eq!(monitor.state(), MonitorState::Checking);

    let overlapping = monitor.run_cycle().await;
    assert_eq!(overlapping.outcome, CycleOutcome::AlreadyRunning);
    assert!(overlapping.alerts.is_empty());
    assert!(overlapping.dispatch.is_none());

    source.gate.add_permits(CATEGORY_COUNT);
    let first = running.await.unwrap();

    assert_eq!(first.outcome, CycleOutcome::Complete);
    assert_eq!(first.alerts.len(), 1);
    assert_eq!(source.calls(), CATEGORY_COUNT);
    assert_eq!(transport.sent_count(), 1);
    assert_eq!(monitor.state(), MonitorState::Idle);
    assert!(!monitor.is_checking());
}

#[tokio::test]
async fn test_failed_category_degrades_to_partial() {
    let mut source = GatedSource::open(blanco_negro());
    source.failing.push(StockCategory::Material);
    let source = Arc::new(source);
    let (monitor, transport) = build(source.clone());

    let report = monitor.run_cycle().await;

    assert_eq!(
        report.outcome,
        CycleOutcome::Partial {
            failed_categories: vec![StockCategory::Material]
        }
    );
    assert!(report.alerts.is_empty());
    assert_eq!(transport.sent_count(), 0);
    assert!(monitor.last_checked_at().is_some());
}
