// ==========================================
// 石材库存预警系统 - 领域类型定义
// ==========================================
// 职责: 库存类别枚举及其数据库/展示表示
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 库存类别 (Stock Category)
// ==========================================
// 序列化格式: lowercase (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockCategory {
    Material, // 板材/原料
    Remnant,  // 余料
    Tool,     // 工具
}

impl StockCategory {
    /// 监控覆盖的全部类别（按展示顺序）
    pub const ALL: [StockCategory; 3] = [
        StockCategory::Material,
        StockCategory::Remnant,
        StockCategory::Tool,
    ];

    /// 转换为数据库字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            StockCategory::Material => "material",
            StockCategory::Remnant => "remnant",
            StockCategory::Tool => "tool",
        }
    }

    /// 从数据库字符串解析
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "material" => Some(StockCategory::Material),
            "remnant" => Some(StockCategory::Remnant),
            "tool" => Some(StockCategory::Tool),
            _ => None,
        }
    }

    /// 展示标签（告警文本固定使用西班牙语）
    pub fn label(&self) -> &'static str {
        match self {
            StockCategory::Material => "Material",
            StockCategory::Remnant => "Retazo",
            StockCategory::Tool => "Herramienta",
        }
    }

    /// 邮件中使用的图标
    pub fn icon(&self) -> &'static str {
        match self {
            StockCategory::Material => "🪨",
            StockCategory::Remnant => "🧩",
            StockCategory::Tool => "🔧",
        }
    }
}

impl fmt::Display for StockCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip_with_db_strings() {
        for category in StockCategory::ALL {
            assert_eq!(StockCategory::parse(category.as_str()), Some(category));
        }
        assert_eq!(StockCategory::parse(" TOOL "), Some(StockCategory::Tool));
        assert_eq!(StockCategory::parse("slab"), None);
    }

    #[test]
    fn test_serde_uses_lowercase() {
        let json = serde_json::to_string(&StockCategory::Remnant).unwrap();
        assert_eq!(json, "\"remnant\"");
    }
}
