// ==========================================
// 石材库存预警系统 - 告警邮件模板
// ==========================================
// 职责: 注册主题/HTML/纯文本模板，并从告警批次渲染邮件内容
// 工具: handlebars（HTML 模板使用内置转义；纯文本使用 {{{ }}} 原样输出）
// ==========================================

use crate::domain::stock::StockAlert;
use crate::engine::threshold::format_alert;
use serde::Serialize;

pub const SUBJECT_TEMPLATE: &str = "low_stock-subject";
pub const HTML_TEMPLATE: &str = "low_stock-html";
pub const TEXT_TEMPLATE: &str = "low_stock-text";

/// 注册告警邮件模板
pub fn register_templates(
    registry: &mut handlebars::Handlebars<'_>,
) -> Result<(), handlebars::TemplateError> {
    registry.register_template_string(
        SUBJECT_TEMPLATE,
        r#"⚠️ Alerta de stock bajo: {{count}} artículo{{#if plural}}s{{/if}}"#,
    )?;

    registry.register_template_string(
        HTML_TEMPLATE,
        r#"<!DOCTYPE html>
<html><body style="font-family:sans-serif">
<h2>Alerta de stock bajo</h2>
<p>Artículos por debajo del stock mínimo: {{count}}</p>
<table border="1" cellpadding="6" style="border-collapse:collapse">
<tr><th>Categoría</th><th>Artículo</th><th>Stock actual</th><th>Mínimo</th><th>Faltan</th></tr>
{{#each items}}
<tr>
<td>{{icon}} {{label}}</td>
<td><strong>{{name}}</strong>{{#if subcategory}}<div>Tipo: {{subcategory}}</div>{{/if}}{{#if compatible_material}}<div>Material compatible: {{compatible_material}}</div>{{/if}}</td>
<td style="color:#c0392b;text-align:right">{{current}}</td>
<td style="text-align:right">{{minimum}}</td>
<td style="text-align:right">{{shortfall}}</td>
</tr>
{{/each}}
</table>
</body></html>
"#,
    )?;

    registry.register_template_string(
        TEXT_TEMPLATE,
        r#"Alerta de stock bajo: {{count}} artículo{{#if plural}}s{{/if}} por debajo del mínimo

{{#each items}}
- {{{line}}}
{{#if subcategory}}
  Tipo: {{{subcategory}}}
{{/if}}
{{#if compatible_material}}
  Material compatible: {{{compatible_material}}}
{{/if}}
{{/each}}
"#,
    )?;

    Ok(())
}

/// 模板渲染数据
#[derive(Debug, Serialize)]
pub struct AlertEmailView<'a> {
    count: usize,
    plural: bool,
    items: Vec<AlertItemView<'a>>,
}

#[derive(Debug, Serialize)]
struct AlertItemView<'a> {
    icon: &'static str,
    label: &'static str,
    name: &'a str,
    current: i64,
    minimum: i64,
    shortfall: i64,
    subcategory: Option<&'a str>,
    compatible_material: Option<&'a str>,
    line: String,
}

impl<'a> AlertEmailView<'a> {
    pub fn from_alerts(alerts: &'a [StockAlert]) -> Self {
        let items = alerts
            .iter()
            .map(|alert| AlertItemView {
                icon: alert.category.icon(),
                label: alert.category.label(),
                name: &alert.name,
                current: alert.current_quantity,
                minimum: alert.minimum_threshold,
                shortfall: alert.shortfall(),
                subcategory: alert.subcategory.as_deref(),
                compatible_material: alert.compatible_material.as_deref(),
                line: format_alert(alert),
            })
            .collect();

        Self {
            count: alerts.len(),
            plural: alerts.len() != 1,
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::StockCategory;
    use handlebars::Handlebars;

    fn registry() -> Handlebars<'static> {
        let mut registry = Handlebars::new();
        register_templates(&mut registry).unwrap();
        registry
    }

    fn alert(name: &str, quantity: i64) -> StockAlert {
        StockAlert {
            category: StockCategory::Remnant,
            id: "r1".to_string(),
            name: name.to_string(),
            current_quantity: quantity,
            minimum_threshold: 5,
            subcategory: Some("encimera".to_string()),
            compatible_material: None,
        }
    }

    #[test]
    fn test_subject_singular_and_plural() {
        let registry = registry();
        let one = [alert("Calacatta", 1)];
        let three = [alert("a", 1), alert("b", 2), alert("c", 3)];

        let subject = registry
            .render(SUBJECT_TEMPLATE, &AlertEmailView::from_alerts(&one))
            .unwrap();
        assert_eq!(subject, "⚠️ Alerta de stock bajo: 1 artículo");

        let subject = registry
            .render(SUBJECT_TEMPLATE, &AlertEmailView::from_alerts(&three))
            .unwrap();
        assert_eq!(subject, "⚠️ Alerta de stock bajo: 3 artículos");
    }

    #[test]
    fn test_html_escapes_names_and_text_does_not() {
        let registry = registry();
        let alerts = [alert("Retazo \"A&B\" <60cm>", 1)];
        let view = AlertEmailView::from_alerts(&alerts);

        let html = registry.render(HTML_TEMPLATE, &view).unwrap();
        assert!(html.contains("&lt;60cm&gt;"));
        assert!(html.contains("A&amp;B"));
        assert!(!html.contains("<60cm>"));
        assert!(html.contains("<div>Tipo: encimera</div>"));
        assert!(!html.contains("Material compatible"));
        assert!(html.contains("🧩 Retazo"));

        let text = registry.render(TEXT_TEMPLATE, &view).unwrap();
        assert!(text.contains("Retazo \"A&B\" <60cm>: stock actual 1 / mínimo 5"));
        assert!(text.contains("Tipo: encimera"));
        assert!(!text.contains("&lt;"));
    }

    #[test]
    fn test_html_shows_shortfall_column() {
        let registry = registry();
        let alerts = [alert("Calacatta", 0)];

        let html = registry
            .render(HTML_TEMPLATE, &AlertEmailView::from_alerts(&alerts))
            .unwrap();

        assert!(html.contains("<th>Faltan</th>"));
        assert!(html.contains(r#"<td style="text-align:right">5</td>"#));
    }
}
