// ==========================================
// 石材库存预警系统 - 应用层
// ==========================================
// 职责: 组装共享状态，供守护进程与工具命令使用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
