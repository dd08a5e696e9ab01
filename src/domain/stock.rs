// ==========================================
// 石材库存预警系统 - 库存领域模型
// ==========================================
// 职责: 库存行（数据源读取结果）与低库存告警
// 红线: 告警每个检查周期重新构建，不持久化、不修改
// ==========================================

use crate::domain::types::StockCategory;
use serde::{Deserialize, Serialize};

// ==========================================
// InventoryRow - 库存行
// ==========================================
// 对齐: materials / remnants / tools 表的公共字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub id: String,                          // 库存行ID (不透明字符串)
    pub name: String,                        // 展示名称
    pub quantity: Option<i64>,               // 在库数量 (None 表示数据缺失)
    pub subcategory: Option<String>,         // 子类别 (工具类型等)
    pub compatible_material: Option<String>, // 适配材料 (工具 → 材料)
}

impl InventoryRow {
    /// 创建只含基础字段的库存行
    pub fn new(id: impl Into<String>, name: impl Into<String>, quantity: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity: Some(quantity),
            subcategory: None,
            compatible_material: None,
        }
    }
}

// ==========================================
// StockAlert - 低库存告警
// ==========================================
// 不变式: 0 <= current_quantity < minimum_threshold
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    pub category: StockCategory,
    pub id: String,
    pub name: String,
    pub current_quantity: i64,
    pub minimum_threshold: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatible_material: Option<String>,
}

impl StockAlert {
    /// 缺口数量 (距最低库存还差多少)
    pub fn shortfall(&self) -> i64 {
        (self.minimum_threshold - self.current_quantity).max(0)
    }

    /// 是否已经断货
    pub fn is_out_of_stock(&self) -> bool {
        self.current_quantity == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(quantity: i64, threshold: i64) -> StockAlert {
        StockAlert {
            category: StockCategory::Tool,
            id: "t1".to_string(),
            name: "Disco diamantado".to_string(),
            current_quantity: quantity,
            minimum_threshold: threshold,
            subcategory: Some("disco".to_string()),
            compatible_material: None,
        }
    }

    #[test]
    fn test_shortfall_and_out_of_stock() {
        assert_eq!(alert(3, 5).shortfall(), 2);
        assert!(!alert(3, 5).is_out_of_stock());
        assert!(alert(0, 5).is_out_of_stock());
    }

    #[test]
    fn test_serialize_camel_case_and_skips_missing_fields() {
        let json = serde_json::to_value(alert(1, 5)).unwrap();
        assert_eq!(json["currentQuantity"], 1);
        assert_eq!(json["minimumThreshold"], 5);
        assert_eq!(json["category"], "tool");
        assert!(json.get("compatibleMaterial").is_none());
    }
}
