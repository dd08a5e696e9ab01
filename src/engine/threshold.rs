// ==========================================
// 石材库存预警系统 - 阈值策略
// ==========================================
// 职责: 判断库存是否低于最低库存，并格式化告警文本
// 红线: 纯函数，无副作用，无错误路径
// ==========================================

use crate::domain::stock::{InventoryRow, StockAlert};
use crate::domain::types::StockCategory;

// ==========================================
// ThresholdConfig - 最低库存常量
// ==========================================
// 进程级常量，运行期不可修改
pub struct ThresholdConfig;

impl ThresholdConfig {
    pub const MATERIAL: i64 = 2;
    pub const REMNANT: i64 = 5;
    pub const TOOL: i64 = 5;

    /// 获取类别的最低库存
    pub const fn minimum_for(category: StockCategory) -> i64 {
        match category {
            StockCategory::Material => Self::MATERIAL,
            StockCategory::Remnant => Self::REMNANT,
            StockCategory::Tool => Self::TOOL,
        }
    }
}

/// 是否需要告警
///
/// # 返回
/// - `true`: 0 <= quantity < 最低库存
/// - `false`: 库存充足，或数量为负（数据错误，不视为断货）
pub fn should_alert(quantity: i64, category: StockCategory) -> bool {
    quantity >= 0 && quantity < ThresholdConfig::minimum_for(category)
}

/// 对单个库存行应用阈值策略
///
/// 缺少数量的行按“不告警”处理
pub fn evaluate_row(category: StockCategory, row: &InventoryRow) -> Option<StockAlert> {
    let quantity = match row.quantity {
        Some(q) => q,
        None => {
            tracing::debug!(
                "库存行缺少数量，跳过: category={}, id={}",
                category,
                row.id
            );
            return None;
        }
    };

    if !should_alert(quantity, category) {
        return None;
    }

    Some(StockAlert {
        category,
        id: row.id.clone(),
        name: row.name.clone(),
        current_quantity: quantity,
        minimum_threshold: ThresholdConfig::minimum_for(category),
        subcategory: row.subcategory.clone(),
        compatible_material: row.compatible_material.clone(),
    })
}

/// 单行告警文本
///
/// 格式: `[类别] 名称: 当前 X / 最低 Y`
pub fn format_alert(alert: &StockAlert) -> String {
    format!(
        "[{}] {}: stock actual {} / mínimo {}",
        alert.category.label(),
        alert.name,
        alert.current_quantity,
        alert.minimum_threshold
    )
}
