// ==========================================
// 石材库存预警系统 - 引擎层
// ==========================================
// 职责: 阈值策略、告警通知分发、库存周期监控
// 红线: Engine 不拼 SQL（数据访问经 InventorySource）
// ==========================================

pub mod email_templates;
pub mod inventory_source;
pub mod notification;
pub mod stock_monitor;
pub mod threshold;

// 重导出核心引擎
pub use inventory_source::{InventorySource, SqliteInventorySource};
pub use notification::{
    DispatchOutcome, EmailMessage, HttpNotificationTransport, NotificationDispatcher,
    NotificationError, NotificationTransport,
};
pub use stock_monitor::{
    CycleOutcome, CycleReport, MonitorHandle, MonitorState, StockMonitor, StockSnapshot,
    DEFAULT_CHECK_INTERVAL,
};
pub use threshold::{evaluate_row, format_alert, should_alert, ThresholdConfig};
