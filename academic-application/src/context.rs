use bon::Builder;

/// 应用层上下文（Application Context）
///
/// 承载一次应用层调用（命令/查询）所需的横切信息，
/// 在用例的 tracing span 中作为字段记录。
///
/// ```rust
/// use academic_application::context::AppContext;
///
/// let ctx = AppContext::builder()
///     .correlation_id("cor-123".to_string())
///     .actor_id("secretaria".to_string())
///     .build();
/// assert_eq!(ctx.correlation_id.as_deref(), Some("cor-123"));
/// ```
#[derive(Clone, Debug, Default, Builder)]
pub struct AppContext {
    /// 关联追踪 ID
    pub correlation_id: Option<String>,
    /// 执行者 ID
    pub actor_id: Option<String>,
}
