// ==========================================
// 学校排课管理系统 - 日志初始化
// ==========================================
// tracing + tracing-subscriber, 级别由 RUST_LOG 控制
// 导入流程的跳过行用 warn!, 生命周期节点用 info!
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 未设置 RUST_LOG 时的缺省过滤器
const DEFAULT_FILTER: &str = "info";

/// 初始化全局日志订阅器
///
/// 过滤器取自 RUST_LOG（如 `RUST_LOG=school_timetable=debug`），
/// 未设置时为 info。进程内只能调用一次。
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// 测试用日志初始化
///
/// 输出交给测试框架捕获; 重复调用不报错（集成测试各用例共享进程）。
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
