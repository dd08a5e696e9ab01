// ==========================================
// 石材库存预警系统 - 低库存横幅 API
// ==========================================
// 职责: 将监控器快照转换为前端横幅可直接渲染的视图模型
// 说明: 只读监控器快照；刷新委托给监控器（带进行中保护）
// ==========================================

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::stock::StockAlert;
use crate::domain::types::StockCategory;
use crate::engine::stock_monitor::{StockMonitor, StockSnapshot};
use crate::engine::threshold::format_alert;

// ==========================================
// 视图模型
// ==========================================

/// 横幅中的单条告警
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BannerItem {
    pub alert: StockAlert,
    /// 单行摘要（与邮件纯文本一致）
    pub summary: String,
    /// 距最低库存的缺口
    pub shortfall: i64,
    pub out_of_stock: bool,
}

/// 低库存横幅
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StockAlertBanner {
    /// 是否显示横幅
    pub visible: bool,
    pub headline: String,
    pub total: usize,
    pub counts_by_category: BTreeMap<StockCategory, usize>,
    pub items: Vec<BannerItem>,
    pub is_checking: bool,
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl StockAlertBanner {
    /// 从快照构建横幅
    ///
    /// 排序: 断货优先，其次按类别、名称
    pub fn from_snapshot(snapshot: &StockSnapshot) -> Self {
        let mut alerts: Vec<&StockAlert> = snapshot.alerts.iter().collect();
        alerts.sort_by(|a, b| {
            b.is_out_of_stock()
                .cmp(&a.is_out_of_stock())
                .then(a.category.cmp(&b.category))
                .then_with(|| a.name.cmp(&b.name))
        });

        let mut counts_by_category = BTreeMap::new();
        for alert in &alerts {
            *counts_by_category.entry(alert.category).or_insert(0) += 1;
        }

        let total = alerts.len();
        let headline = match total {
            0 => "Stock en niveles normales".to_string(),
            1 => "1 artículo con stock bajo".to_string(),
            n => format!("{} artículos con stock bajo", n),
        };

        Self {
            visible: total > 0,
            headline,
            total,
            counts_by_category,
            items: alerts
                .into_iter()
                .map(|alert| BannerItem {
                    summary: format_alert(alert),
                    shortfall: alert.shortfall(),
                    out_of_stock: alert.is_out_of_stock(),
                    alert: alert.clone(),
                })
                .collect(),
            is_checking: snapshot.is_checking,
            last_checked_at: snapshot.last_checked_at,
        }
    }
}

// ==========================================
// StockAlertApi
// ==========================================
pub struct StockAlertApi {
    monitor: Arc<StockMonitor>,
}

impl StockAlertApi {
    pub fn new(monitor: Arc<StockMonitor>) -> Self {
        Self { monitor }
    }

    /// 当前横幅（不触发查询）
    pub fn banner(&self) -> StockAlertBanner {
        StockAlertBanner::from_snapshot(&self.monitor.snapshot())
    }

    /// 手动刷新后返回横幅
    pub async fn refresh_banner(&self) -> StockAlertBanner {
        self.monitor.refresh().await;
        self.banner()
    }

    /// 按类别筛选当前告警
    ///
    /// # 参数
    /// - `category`: 类别字符串（material / remnant / tool）
    pub fn list_by_category(&self, category: &str) -> ApiResult<Vec<StockAlert>> {
        let category = StockCategory::parse(category)
            .ok_or_else(|| ApiError::InvalidInput(format!("未知库存类别: {}", category)))?;

        Ok(self
            .monitor
            .alerts()
            .into_iter()
            .filter(|a| a.category == category)
            .collect())
    }

    /// 查询单条告警
    pub fn get_alert(&self, category: StockCategory, id: &str) -> ApiResult<StockAlert> {
        self.monitor
            .alerts()
            .into_iter()
            .find(|a| a.category == category && a.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("StockAlert({}/{})", category, id)))
    }

    /// 横幅 JSON（供前端直接使用）
    pub fn banner_json(&self) -> ApiResult<String> {
        Ok(serde_json::to_string(&self.banner())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(category: StockCategory, id: &str, name: &str, qty: i64) -> StockAlert {
        StockAlert {
            category,
            id: id.to_string(),
            name: name.to_string(),
            current_quantity: qty,
            minimum_threshold: crate::engine::threshold::ThresholdConfig::minimum_for(category),
            subcategory: None,
            compatible_material: None,
        }
    }

    #[test]
    fn test_empty_snapshot_hides_banner() {
        let banner = StockAlertBanner::from_snapshot(&StockSnapshot::default());
        assert!(!banner.visible);
        assert_eq!(banner.total, 0);
        assert!(banner.last_checked_at.is_none());
    }

    #[test]
    fn test_out_of_stock_first_then_category_and_name() {
        let snapshot = StockSnapshot {
            alerts: vec![
                alert(StockCategory::Tool, "t1", "Disco", 3),
                alert(StockCategory::Material, "m2", "Negro", 1),
                alert(StockCategory::Tool, "t2", "Broca", 0),
                alert(StockCategory::Material, "m1", "Blanco", 1),
            ]
            .into(),
            is_checking: false,
            last_checked_at: Some(Utc::now()),
        };

        let banner = StockAlertBanner::from_snapshot(&snapshot);

        let ids: Vec<&str> = banner.items.iter().map(|i| i.alert.id.as_str()).collect();
        assert_eq!(ids, vec!["t2", "m1", "m2", "t1"]);
        assert_eq!(banner.counts_by_category[&StockCategory::Tool], 2);
        assert_eq!(banner.counts_by_category[&StockCategory::Material], 2);
        assert_eq!(banner.headline, "4 artículos con stock bajo");
        assert!(banner.items[0].out_of_stock);

        let shortfalls: Vec<i64> = banner.items.iter().map(|i| i.shortfall).collect();
        assert_eq!(shortfalls, vec![5, 1, 1, 2]);
    }
}
