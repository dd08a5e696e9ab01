// ==========================================
// 石材库存预警系统 - 余料库存仓储
// ==========================================
// 说明: remnants 表为可选数据源，部分部署不存在该表
// ==========================================

use crate::domain::stock::InventoryRow;
use crate::repository::columns::read_quantity;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

/// 余料仓储
/// 职责: 管理 remnants 表的读写；material_type 映射为 subcategory
pub struct RemnantRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RemnantRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 余料数据源是否可用（remnants 表是否存在）
    pub fn is_available(&self) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        Ok(crate::db::table_exists(&conn, "remnants")?)
    }

    /// 新增余料
    pub fn insert(&self, row: &InventoryRow) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO remnants (id, name, quantity, material_type) VALUES (?1, ?2, ?3, ?4)",
            params![row.id, row.name, row.quantity, row.subcategory],
        )?;
        Ok(())
    }

    /// 查询全部余料
    ///
    /// # 返回
    /// - Ok(None): 无余料数据源
    /// - Ok(Some(rows)): 余料列表
    pub fn list_all(&self) -> RepositoryResult<Option<Vec<InventoryRow>>> {
        let conn = self.get_conn()?;
        if !crate::db::table_exists(&conn, "remnants")? {
            return Ok(None);
        }

        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, quantity, material_type
            FROM remnants
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
                    subcategory: row.get(3)?,
                    compatible_material: None,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(Some(rows))
    }
}
