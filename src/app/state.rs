// ==========================================
// 石材库存预警系统 - 应用状态
// ==========================================
// 职责: 启动时构建共享状态（配置、仓储、分发器、监控器），按引用分发给使用方
// 红线: 不使用全局单例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::StockAlertApi;
use crate::config::{ConfigManager, MonitorSettings};
use crate::db::{init_inventory_schema, open_sqlite_connection};
use crate::engine::{
    HttpNotificationTransport, NotificationDispatcher, NotificationTransport,
    SqliteInventorySource, StockMonitor,
};
use crate::repository::{MaterialRepository, RemnantRepository, ToolRepository};

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 启动时读取的监控参数
    pub settings: MonitorSettings,

    pub config_manager: Arc<ConfigManager>,

    /// 库存仓储（前台 CRUD 与种子数据使用）
    pub material_repo: Arc<MaterialRepository>,
    pub remnant_repo: Arc<RemnantRepository>,
    pub tool_repo: Arc<ToolRepository>,

    /// 告警通知分发器
    pub dispatcher: Arc<NotificationDispatcher>,

    /// 库存监控器
    pub stock_monitor: Arc<StockMonitor>,

    /// 低库存横幅API
    pub stock_alert_api: Arc<StockAlertApi>,
}

impl AppState {
    /// 创建新的AppState实例（HTTP 通知网关）
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享连接并初始化库存表
    /// 2. 读取监控参数
    /// 3. 创建仓储、分发器、监控器、API
    pub fn new(db_path: String) -> Result<Self, String> {
        Self::build(db_path, None)
    }

    /// 使用指定通知网关创建AppState（测试/替换网关）
    pub fn with_transport(
        db_path: String,
        transport: Arc<dyn NotificationTransport>,
    ) -> Result<Self, String> {
        Self::build(db_path, Some(transport))
    }

    fn build(
        db_path: String,
        transport: Option<Arc<dyn NotificationTransport>>,
    ) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_inventory_schema(&conn).map_err(|e| format!("无法初始化库存表: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // 配置
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let settings = config_manager
            .load_monitor_settings()
            .map_err(|e| format!("无法读取监控配置: {}", e))?;

        // 仓储
        let material_repo = Arc::new(MaterialRepository::from_connection(conn.clone()));
        let remnant_repo = Arc::new(RemnantRepository::from_connection(conn.clone()));
        let tool_repo = Arc::new(ToolRepository::from_connection(conn.clone()));

        // 通知
        let transport: Arc<dyn NotificationTransport> = match transport {
            Some(t) => t,
            None => Arc::new(HttpNotificationTransport::new(
                settings.notification_endpoint.clone(),
                settings.sender_name.clone(),
            )),
        };
        let dispatcher = Arc::new(
            NotificationDispatcher::new(transport, settings.notification_recipient.clone())
                .map_err(|e| format!("无法创建NotificationDispatcher: {}", e))?,
        );

        // 监控
        let source = Arc::new(SqliteInventorySource::from_connection(conn));
        let stock_monitor = Arc::new(StockMonitor::new(source, dispatcher.clone()));
        let stock_alert_api = Arc::new(StockAlertApi::new(stock_monitor.clone()));

        tracing::info!(
            "AppState初始化完成: recipient={}, interval={}s",
            settings.notification_recipient,
            settings.check_interval.as_secs()
        );

        Ok(Self {
            db_path,
            settings,
            config_manager,
            material_repo,
            remnant_repo,
            tool_repo,
            dispatcher,
            stock_monitor,
            stock_alert_api,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 STONE_INVENTORY_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("STONE_INVENTORY_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./stone_inventory.db");

    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        {
            path = data_dir.join("stone-inventory-dev");
        }

        #[cfg(not(debug_assertions))]
        {
            path = data_dir.join("stone-inventory");
        }

        // 确保目录存在
        std::fs::create_dir_all(&path).ok();
        path = path.join("stone_inventory.db");
    }

    path.to_string_lossy().to_string()
}
