// ==========================================
// 石材库存预警系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 说明: 告警阈值为进程常量，不在此处配置（见 engine::threshold）
// ==========================================

use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置存储访问失败: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("锁获取失败: {0}")]
    Lock(String),

    #[error("配置值无效 (key={key}): {message}")]
    InvalidValue { key: String, message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// MonitorSettings - 监控运行参数快照
// ==========================================
// 启动时读取一次，运行期不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorSettings {
    /// 邮件网关地址
    pub notification_endpoint: String,
    /// 唯一收件人
    pub notification_recipient: String,
    /// 发件人显示名
    pub sender_name: String,
    /// 检查间隔
    pub check_interval: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            notification_endpoint: defaults::NOTIFICATION_ENDPOINT.to_string(),
            notification_recipient: defaults::NOTIFICATION_RECIPIENT.to_string(),
            sender_name: defaults::SENDER_NAME.to_string(),
            check_interval: Duration::from_secs(defaults::INTERVAL_MINUTES * 60),
        }
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn.lock().map_err(|e| ConfigError::Lock(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| ConfigError::Lock(e.to_string()))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 读取配置值，带默认值（空白值视为未配置）
    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_config_value(key)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 配置值（初始化/运维脚本使用）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| ConfigError::Lock(e.to_string()))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 邮件网关地址
    pub fn get_notification_endpoint(&self) -> ConfigResult<String> {
        self.get_config_or_default(
            config_keys::NOTIFICATION_ENDPOINT,
            defaults::NOTIFICATION_ENDPOINT,
        )
    }

    /// 告警收件人
    pub fn get_notification_recipient(&self) -> ConfigResult<String> {
        let recipient = self.get_config_or_default(
            config_keys::NOTIFICATION_RECIPIENT,
            defaults::NOTIFICATION_RECIPIENT,
        )?;
        if !recipient.contains('@') {
            return Err(ConfigError::InvalidValue {
                key: config_keys::NOTIFICATION_RECIPIENT.to_string(),
                message: format!("不是有效的邮箱地址: {}", recipient),
            });
        }
        Ok(recipient)
    }

    /// 发件人显示名
    pub fn get_sender_name(&self) -> ConfigResult<String> {
        self.get_config_or_default(config_keys::SENDER_NAME, defaults::SENDER_NAME)
    }

    /// 检查间隔（分钟，必须 > 0）
    pub fn get_interval_minutes(&self) -> ConfigResult<u64> {
        let raw = self.get_config_or_default(
            config_keys::INTERVAL_MINUTES,
            &defaults::INTERVAL_MINUTES.to_string(),
        )?;
        match raw.parse::<u64>() {
            Ok(v) if v > 0 => Ok(v),
            _ => Err(ConfigError::InvalidValue {
                key: config_keys::INTERVAL_MINUTES.to_string(),
                message: format!("必须为正整数: {}", raw),
            }),
        }
    }

    /// 读取监控运行参数快照
    pub fn load_monitor_settings(&self) -> ConfigResult<MonitorSettings> {
        Ok(MonitorSettings {
            notification_endpoint: self.get_notification_endpoint()?,
            notification_recipient: self.get_notification_recipient()?,
            sender_name: self.get_sender_name()?,
            check_interval: Duration::from_secs(self.get_interval_minutes()? * 60),
        })
    }
}

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    // 通知
    pub const NOTIFICATION_ENDPOINT: &str = "notification.endpoint";
    pub const NOTIFICATION_RECIPIENT: &str = "notification.recipient";
    pub const SENDER_NAME: &str = "notification.sender_name";

    // 监控
    pub const INTERVAL_MINUTES: &str = "monitor.interval_minutes";
}

/// 默认值
pub mod defaults {
    pub const NOTIFICATION_ENDPOINT: &str = "http://localhost:3000/api/send-email";
    pub const NOTIFICATION_RECIPIENT: &str = "inventario@marmoleria.local";
    pub const SENDER_NAME: &str = "Control de Stock";
    pub const INTERVAL_MINUTES: u64 = 30;
}
