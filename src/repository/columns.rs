// ==========================================
// 石材库存预警系统 - 库存列读取
// ==========================================
// 说明: SQLite 的 INTEGER 亲和性不阻止写入 TEXT/REAL，
//       数量列按单行容错读取，不让一行脏数据拖垮整个类别
// ==========================================

use rusqlite::types::ValueRef;
use rusqlite::{Result as SqliteResult, Row};

/// 读取在库数量列
///
/// # 返回
/// - Some(q): 整数值
/// - None: NULL 或非整数（TEXT / REAL / BLOB），该行不参与告警
pub(crate) fn read_quantity(row: &Row<'_>, idx: usize, id: &str) -> SqliteResult<Option<i64>> {
    match row.get_ref(idx)? {
        ValueRef::Integer(quantity) => Ok(Some(quantity)),
        ValueRef::Null => Ok(None),
        other => {
            tracing::debug!(
                "库存数量不是整数，按数据缺失处理: id={}, type={}",
                id,
                other.data_type()
            );
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn quantities(conn: &Connection) -> Vec<(String, Option<i64>)> {
        let mut stmt = conn
            .prepare("SELECT id, quantity FROM t ORDER BY id")
            .unwrap();
        let rows = stmt
            .query_map([], |row| {
                let id: String = row.get(0)?;
                let quantity = read_quantity(row, 1, &id)?;
                Ok((id, quantity))
            })
            .unwrap()
            .collect::<SqliteResult<Vec<_>>>()
            .unwrap();
        rows
    }

    #[test]
    fn test_non_integer_values_read_as_missing() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE t (id TEXT PRIMARY KEY, quantity INTEGER);
            INSERT INTO t VALUES ('a', 3);
            INSERT INTO t VALUES ('b', 'n/a');
            INSERT INTO t VALUES ('c', 2.5);
            INSERT INTO t VALUES ('d', NULL);
            INSERT INTO t VALUES ('e', '4');
            INSERT INTO t VALUES ('f', X'01');
            "#,
        )
        .unwrap();

        assert_eq!(
            quantities(&conn),
            vec![
                ("a".to_string(), Some(3)),
                ("b".to_string(), None),
                ("c".to_string(), None),
                ("d".to_string(), None),
                // 数字文本经 INTEGER 亲和性转换后按整数存储
                ("e".to_string(), Some(4)),
                ("f".to_string(), None),
            ]
        );
    }
}
