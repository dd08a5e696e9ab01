// ==========================================
// 石材库存预警系统 - 库存数据源
// ==========================================
// 职责: 定义监控所需的库存读取接口，实现依赖倒置
// 说明: Engine 层定义 trait，SQLite 适配器组合各类别仓储
// ==========================================

use crate::domain::stock::InventoryRow;
use crate::domain::types::StockCategory;
use crate::repository::{
    MaterialRepository, RemnantRepository, RepositoryResult, ToolRepository,
};
use async_trait::async_trait;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// 库存数据源
///
/// # 返回约定
/// - `Ok(None)`: 该类别没有数据源（不是错误，按零告警处理）
/// - `Ok(Some(rows))`: 该类别的全部库存行
/// - `Err`: 查询失败
#[async_trait]
pub trait InventorySource: Send + Sync {
    async fn fetch_rows(&self, category: StockCategory)
        -> RepositoryResult<Option<Vec<InventoryRow>>>;
}

// ==========================================
// SqliteInventorySource - SQLite 库存数据源
// ==========================================
pub struct SqliteInventorySource {
    materials: Arc<MaterialRepository>,
    remnants: Arc<RemnantRepository>,
    tools: Arc<ToolRepository>,
}

impl SqliteInventorySource {
    /// 从共享连接创建数据源
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            materials: Arc::new(MaterialRepository::from_connection(conn.clone())),
            remnants: Arc::new(RemnantRepository::from_connection(conn.clone())),
            tools: Arc::new(ToolRepository::from_connection(conn)),
        }
    }
}

#[async_trait]
impl InventorySource for SqliteInventorySource {
    async fn fetch_rows(
        &self,
        category: StockCategory,
    ) -> RepositoryResult<Option<Vec<InventoryRow>>> {
        // rusqlite 为同步调用，放入阻塞线程池
        match category {
            StockCategory::Material => {
                let repo = self.materials.clone();
                let rows = tokio::task::spawn_blocking(move || repo.list_all()).await??;
                Ok(Some(rows))
            }
            StockCategory::Remnant => {
                let repo = self.remnants.clone();
                tokio::task::spawn_blocking(move || repo.list_all()).await?
            }
            StockCategory::Tool => {
                let repo = self.tools.clone();
                let rows = tokio::task::spawn_blocking(move || repo.list_all()).await??;
                Ok(Some(rows))
            }
        }
    }
}
