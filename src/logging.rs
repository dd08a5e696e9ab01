// ==========================================
// 石材库存预警系统 - 日志初始化
// ==========================================
// 工具: tracing + tracing-subscriber（EnvFilter / fmt / json）
// 约定: RUST_LOG 优先；未设置时使用各入口的默认过滤指令
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 输出格式环境变量
pub const LOG_FORMAT_ENV: &str = "STONE_INVENTORY_LOG_FORMAT";

/// 守护进程默认过滤指令
const DEFAULT_DIRECTIVES: &str = "info";

/// 测试默认过滤指令: 本 crate 的检查周期细节 + 依赖库仅告警
const TEST_DIRECTIVES: &str = "stone_inventory=debug,warn";

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 人类可读的单行格式
    Pretty,
    /// JSON 行（便于日志采集）
    Json,
}

impl LogFormat {
    /// 从 STONE_INVENTORY_LOG_FORMAT 读取，未设置或无法识别时为 Pretty
    pub fn from_env() -> Self {
        Self::parse(std::env::var(LOG_FORMAT_ENV).ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

fn env_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=stone_inventory=debug
/// - STONE_INVENTORY_LOG_FORMAT=json: 输出 JSON 行
///
/// # 示例
/// ```no_run
/// use stone_inventory::logging;
/// logging::init();
/// ```
pub fn init() {
    let filter = env_filter(DEFAULT_DIRECTIVES);

    match LogFormat::from_env() {
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .with_line_number(true)
            .init(),
        LogFormat::Pretty => fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_line_number(true)
            .init(),
    }
}

/// 测试日志（可重复调用）
///
/// 输出交给 libtest 捕获，只有失败用例会打印；RUST_LOG 同样生效
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(env_filter(TEST_DIRECTIVES))
        .without_time()
        .with_target(false)
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse(None), LogFormat::Pretty);
        assert_eq!(LogFormat::parse(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some(" JSON ")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some("text")), LogFormat::Pretty);
    }

    #[test]
    fn test_init_test_is_repeatable() {
        init_test();
        init_test();
        tracing::debug!("日志初始化可重复调用");
    }
}
