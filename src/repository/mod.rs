// ==========================================
// 石材库存预警系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供库存数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

mod columns;
pub mod error;
pub mod material_repo;
pub mod remnant_repo;
pub mod tool_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use material_repo::MaterialRepository;
pub use remnant_repo::RemnantRepository;
pub use tool_repo::ToolRepository;
