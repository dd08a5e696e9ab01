// ==========================================
// 石材库存预警系统 - 工具库存仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::stock::InventoryRow;
use crate::repository::columns::read_quantity;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// ToolRepository - 工具仓储
// ==========================================
/// 工具仓储
/// 职责: 管理 tools 表的读写
/// 说明: tool_type 映射为 subcategory，compatible_material 为适配材料
pub struct ToolRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ToolRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增工具
    pub fn insert(&self, row: &InventoryRow) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO tools (id, name, quantity, tool_type, compatible_material)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                row.id,
                row.name,
                row.quantity,
                row.subcategory,
                row.compatible_material,
            ],
        )?;
        Ok(())
    }

    /// 更新在库数量
    pub fn update_quantity(&self, id: &str, quantity: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE tools SET quantity = ?1 WHERE id = ?2",
            params![quantity, id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Tool".to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// 查询全部工具
    pub fn list_all(&self) -> RepositoryResult<Vec<InventoryRow>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, quantity, tool_type, compatible_material
            FROM tools
            ORDER BY tool_type ASC, name ASC
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
                    subcategory: row.get(3)?,
                    compatible_material: row.get(4)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(rows)
    }
}
