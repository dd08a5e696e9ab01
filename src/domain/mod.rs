// ==========================================
// 石材库存预警系统 - 领域模型层
// ==========================================
// 职责: 定义库存类别、库存行、低库存告警
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod stock;
pub mod types;

// 重导出核心类型
pub use stock::{InventoryRow, StockAlert};
pub use types::StockCategory;
