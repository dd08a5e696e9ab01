// ==========================================
// 石材库存预警系统 - API 层
// ==========================================
// 职责: 向展示层暴露低库存横幅与告警查询
// ==========================================

pub mod error;
pub mod stock_alert_api;

pub use error::{ApiError, ApiResult};
pub use stock_alert_api::{BannerItem, StockAlertApi, StockAlertBanner};
