// ==========================================
// 石材库存预警系统 - 库存监控器
// ==========================================
// 职责: 周期性检查库存，生成告警快照，非空时触发通知
// 状态: Idle ↔ Checking（无失败终态，错误只记录日志）
// 约束:
// - 同一监控器同一时刻最多一个检查周期在执行
// - 快照整体替换，消费方不会读到新旧混合的告警集
// - 停用后不再执行任何周期
// ==========================================

use crate::domain::stock::StockAlert;
use crate::domain::types::StockCategory;
use crate::engine::inventory_source::InventorySource;
use crate::engine::notification::{DispatchOutcome, NotificationDispatcher};
use crate::engine::threshold::evaluate_row;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// 默认检查间隔（30 分钟）
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(30 * 60);

// ==========================================
// StockSnapshot - 告警快照
// ==========================================
/// 每个周期发布一次的不可变快照
#[derive(Debug, Clone)]
pub struct StockSnapshot {
    pub alerts: Arc<[StockAlert]>,
    pub is_checking: bool,
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl Default for StockSnapshot {
    fn default() -> Self {
        Self {
            alerts: Arc::from(Vec::new()),
            is_checking: false,
            last_checked_at: None,
        }
    }
}

/// 监控器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Checking,
}

/// 检查周期结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// 全部类别查询成功
    Complete,
    /// 部分类别查询失败（按零行处理）
    Partial { failed_categories: Vec<StockCategory> },
    /// 已有周期在执行，本次未发起查询
    AlreadyRunning,
}

/// 检查周期报告
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle_id: String,
    pub outcome: CycleOutcome,
    pub alerts: Arc<[StockAlert]>,
    /// None 表示本周期未调用分发器
    pub dispatch: Option<DispatchOutcome>,
    pub checked_at: Option<DateTime<Utc>>,
}

// ==========================================
// StockMonitor - 库存监控器
// ==========================================
pub struct StockMonitor {
    source: Arc<dyn InventorySource>,
    dispatcher: Arc<NotificationDispatcher>,
    in_flight: AtomicBool,
    snapshot_tx: watch::Sender<StockSnapshot>,
}

/// 周期占用守卫：离开作用域时恢复 Idle
struct CycleGuard<'a> {
    monitor: &'a StockMonitor,
}

impl<'a> CycleGuard<'a> {
    fn acquire(monitor: &'a StockMonitor) -> Option<Self> {
        monitor
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        monitor.snapshot_tx.send_modify(|s| s.is_checking = true);
        Some(Self { monitor })
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.monitor.snapshot_tx.send_modify(|s| s.is_checking = false);
        self.monitor.in_flight.store(false, Ordering::Release);
    }
}

impl StockMonitor {
    /// 创建监控器（初始为 Idle，空告警集）
    pub fn new(source: Arc<dyn InventorySource>, dispatcher: Arc<NotificationDispatcher>) -> Self {
        let (snapshot_tx, _) = watch::channel(StockSnapshot::default());
        Self {
            source,
            dispatcher,
            in_flight: AtomicBool::new(false),
            snapshot_tx,
        }
    }

    // ===== 展示边界 =====

    /// 当前快照
    pub fn snapshot(&self) -> StockSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// 订阅快照变更
    pub fn subscribe(&self) -> watch::Receiver<StockSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn alerts(&self) -> Vec<StockAlert> {
        self.snapshot_tx.borrow().alerts.to_vec()
    }

    pub fn is_checking(&self) -> bool {
        self.snapshot_tx.borrow().is_checking
    }

    pub fn last_checked_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot_tx.borrow().last_checked_at
    }

    pub fn state(&self) -> MonitorState {
        if self.in_flight.load(Ordering::Acquire) {
            MonitorState::Checking
        } else {
            MonitorState::Idle
        }
    }

    /// 手动刷新，返回最新告警集
    ///
    /// 已有周期在执行时不发起新的查询，直接返回当前告警集
    pub async fn refresh(&self) -> Vec<StockAlert> {
        self.run_cycle().await.alerts.to_vec()
    }

    /// 执行一个检查周期
    pub async fn run_cycle(&self) -> CycleReport {
        let cycle_id = Uuid::new_v4().to_string();

        let _guard = match CycleGuard::acquire(self) {
            Some(guard) => guard,
            None => {
                tracing::debug!("库存检查已在进行中，忽略本次刷新: cycle_id={}", cycle_id);
                return CycleReport {
                    cycle_id,
                    outcome: CycleOutcome::AlreadyRunning,
                    alerts: self.snapshot_tx.borrow().alerts.clone(),
                    dispatch: None,
                    checked_at: None,
                };
            }
        };

        tracing::info!("开始库存检查: cycle_id={}", cycle_id);

        let fetches = StockCategory::ALL.into_iter().map(|category| {
            let source = self.source.clone();
            async move { (category, source.fetch_rows(category).await) }
        });
        let results = join_all(fetches).await;

        let mut alerts = Vec::new();
        let mut failed_categories = Vec::new();
        for (category, result) in results {
            match result {
                Ok(Some(rows)) => {
                    alerts.extend(rows.iter().filter_map(|row| evaluate_row(category, row)));
                }
                Ok(None) => {
                    tracing::debug!("类别无数据源，跳过: category={}", category);
                }
                Err(e) => {
                    tracing::warn!(
                        "库存查询失败，本周期按零行处理: cycle_id={}, category={}, error={}",
                        cycle_id,
                        category,
                        e
                    );
                    failed_categories.push(category);
                }
            }
        }

        let checked_at = Utc::now();
        let alerts: Arc<[StockAlert]> = alerts.into();

        // 整体替换快照；is_checking 由守卫在周期结束时复位
        self.snapshot_tx.send_replace(StockSnapshot {
            alerts: alerts.clone(),
            is_checking: true,
            last_checked_at: Some(checked_at),
        });

        let dispatch = if alerts.is_empty() {
            None
        } else {
            Some(self.dispatcher.send_alert_notification(&alerts).await)
        };

        let outcome = if failed_categories.is_empty() {
            CycleOutcome::Complete
        } else {
            CycleOutcome::Partial { failed_categories }
        };

        tracing::info!(
            "库存检查完成: cycle_id={}, alert_count={}, outcome={:?}",
            cycle_id,
            alerts.len(),
            outcome
        );

        CycleReport {
            cycle_id,
            outcome,
            alerts,
            dispatch,
            checked_at: Some(checked_at),
        }
    }

    /// 启动周期检查：立即执行一次，之后每隔 `interval` 执行一次
    pub fn activate(self: &Arc<Self>, interval: Duration) -> MonitorHandle {
        let token = CancellationToken::new();
        let cancel = token.clone();
        let monitor = Arc::clone(self);

        tracing::info!("库存监控已启动: interval={}s", interval.as_secs());

        let join = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        monitor.run_cycle().await;
                    }
                }
            }
            tracing::info!("库存监控已停止");
        });

        MonitorHandle {
            token,
            join: Some(join),
        }
    }
}

// ==========================================
// MonitorHandle - 监控会话句柄
// ==========================================
/// 停用或丢弃句柄后不再调度新的周期
pub struct MonitorHandle {
    token: CancellationToken,
    join: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// 停用监控（不中断正在执行的周期）
    pub fn deactivate(&self) {
        self.token.cancel();
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// 停用并等待后台任务退出
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(join) = self.join.take() {
            if let Err(e) = join.await {
                tracing::error!("库存监控任务异常退出: {}", e);
            }
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
