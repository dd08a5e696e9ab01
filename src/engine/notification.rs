// ==========================================
// 石材库存预警系统 - 告警通知分发
// ==========================================
// 职责: 将一批告警渲染为 HTML/纯文本邮件，并通过通知网关发送
// 红线: 每次调用只发送一封邮件；不重试；错误不向调用方抛出
// ==========================================

use crate::domain::stock::StockAlert;
use crate::engine::email_templates::{
    register_templates, AlertEmailView, HTML_TEMPLATE, SUBJECT_TEMPLATE, TEXT_TEMPLATE,
};
use async_trait::async_trait;
use handlebars::Handlebars;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

// ==========================================
// 邮件消息
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// 通知层错误类型
#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("通知网关请求失败: {0}")]
    Transport(String),

    #[error("通知网关拒绝请求: status={status}, body={body}")]
    Rejected { status: u16, body: String },

    #[error("通知消息序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("邮件模板注册失败: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("邮件模板渲染失败: {0}")]
    Render(#[from] handlebars::RenderError),
}

impl From<reqwest::Error> for NotificationError {
    fn from(err: reqwest::Error) -> Self {
        NotificationError::Transport(err.to_string())
    }
}

// ==========================================
// NotificationTransport Trait
// ==========================================
/// 通知网关
///
/// # 实现说明
/// - `HttpNotificationTransport`: POST 到封装邮件服务商的 HTTP 接口
/// - 测试中使用内存实现记录发送的消息
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotificationError>;
}

/// HTTP 通知网关
pub struct HttpNotificationTransport {
    client: reqwest::Client,
    endpoint: String,
    sender_name: String,
}

/// 网关请求体
#[derive(Serialize)]
struct SendEmailRequest<'a> {
    to: &'a str,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
    #[serde(rename = "fromName")]
    from_name: &'a str,
}

impl HttpNotificationTransport {
    pub fn new(endpoint: impl Into<String>, sender_name: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            sender_name: sender_name.into(),
        }
    }
}

#[async_trait]
impl NotificationTransport for HttpNotificationTransport {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotificationError> {
        let body = SendEmailRequest {
            to: &message.to,
            subject: &message.subject,
            html: &message.html,
            text: &message.text,
            from_name: &self.sender_name,
        };

        let response = self.client.post(&self.endpoint).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

// ==========================================
// DispatchOutcome - 分发结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// 已发送
    Sent { alert_count: usize },
    /// 告警为空，未发送
    Skipped,
    /// 发送失败（已记录日志）
    Failed { reason: String },
}

impl DispatchOutcome {
    /// 兼容布尔语义：仅 Sent 为成功
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Sent { .. })
    }
}

// ==========================================
// NotificationDispatcher - 通知分发器
// ==========================================
pub struct NotificationDispatcher {
    transport: Arc<dyn NotificationTransport>,
    recipient: String,
    templates: Handlebars<'static>,
}

impl NotificationDispatcher {
    /// 创建分发器（模板在此一次性注册）
    ///
    /// # 参数
    /// - `transport`: 通知网关
    /// - `recipient`: 唯一收件人（启动时确定，运行期不变）
    pub fn new(
        transport: Arc<dyn NotificationTransport>,
        recipient: impl Into<String>,
    ) -> Result<Self, NotificationError> {
        let mut templates = Handlebars::new();
        register_templates(&mut templates)?;

        Ok(Self {
            transport,
            recipient: recipient.into(),
            templates,
        })
    }

    /// 构建告警邮件
    pub fn build_message(&self, alerts: &[StockAlert]) -> Result<EmailMessage, NotificationError> {
        let view = AlertEmailView::from_alerts(alerts);

        Ok(EmailMessage {
            to: self.recipient.clone(),
            subject: self.templates.render(SUBJECT_TEMPLATE, &view)?,
            html: self.templates.render(HTML_TEMPLATE, &view)?,
            text: self.templates.render(TEXT_TEMPLATE, &view)?,
        })
    }

    /// 发送告警通知
    ///
    /// 告警为空时直接返回 Skipped，不发起网络请求
    pub async fn send_alert_notification(&self, alerts: &[StockAlert]) -> DispatchOutcome {
        if alerts.is_empty() {
            return DispatchOutcome::Skipped;
        }

        let sent = match self.build_message(alerts) {
            Ok(message) => self.transport.send(&message).await,
            Err(e) => Err(e),
        };

        match sent {
            Ok(()) => {
                tracing::info!(
                    "低库存告警邮件已发送: recipient={}, alert_count={}",
                    self.recipient,
                    alerts.len()
                );
                DispatchOutcome::Sent {
                    alert_count: alerts.len(),
                }
            }
            Err(e) => {
                tracing::error!(
                    "低库存告警邮件发送失败: recipient={}, alert_count={}, error={}",
                    self.recipient,
                    alerts.len(),
                    e
                );
                DispatchOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
