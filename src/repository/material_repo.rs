// ==========================================
// 石材库存预警系统 - 材料库存仓储
// ==========================================
// 红线: Repository 不含业务逻辑（阈值判断在 engine::threshold）
// ==========================================

use crate::domain::stock::InventoryRow;
use crate::repository::columns::read_quantity;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// MaterialRepository - 材料仓储
// ==========================================
/// 材料仓储
/// 职责: 管理 materials 表的读写
pub struct MaterialRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MaterialRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增材料
    pub fn insert(&self, row: &InventoryRow) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO materials (id, name, quantity) VALUES (?1, ?2, ?3)",
            params![row.id, row.name, row.quantity],
        )?;
        Ok(())
    }

    /// 更新在库数量
    ///
    /// # 返回
    /// - Ok(()): 更新成功
    /// - Err(NotFound): 材料不存在
    pub fn update_quantity(&self, id: &str, quantity: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE materials SET quantity = ?1 WHERE id = ?2",
            params![quantity, id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Material".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 查询全部材料
    pub fn list_all(&self) -> RepositoryResult<Vec<InventoryRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, quantity
            FROM materials
            ORDER BY name ASC
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                let id: String = row.get(0)?;
                let quantity = read_quantity(row, 2, &id)?;
                Ok(InventoryRow {
                    id,
                    name: row.get(1)?,
                    quantity,
                    subcategory: None,
                    compatible_material: None,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rows)
    }
}
