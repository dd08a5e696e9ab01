// ==========================================
// 石材库存预警系统 - 核心库
// ==========================================
// 技术栈: Rust + Tokio + SQLite
// 系统定位: 低库存监控（材料/余料/工具）与邮件告警
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 阈值策略、通知分发、周期监控
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 展示边界
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{InventoryRow, StockAlert, StockCategory};

pub use engine::{
    format_alert, should_alert, DispatchOutcome, NotificationDispatcher, StockMonitor,
    StockSnapshot, ThresholdConfig,
};

pub use api::{StockAlertApi, StockAlertBanner};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "石材库存预警系统";
