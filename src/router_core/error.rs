use thiserror::Error;

/// 构造 Router 时的配置错误。
///
/// 这类错误是致命的：Router 不会被创建。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// 两条路由使用了同一个 name，反向查找会产生歧义。
    #[error("route name `{name}` is registered more than once")]
    DuplicateRouteName { name: String },

    /// name 为空字符串。
    #[error("route with path `{path}` has an empty name")]
    EmptyRouteName { path: String },

    /// path pattern 不合法（不以 `/` 开头、空 segment、参数名非法等）。
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// History 模式下没有注入 HistoryBackend。
    #[error("history mode requires a history backend")]
    MissingHistoryBackend,

    /// 配置文档无法解析。
    #[error("failed to parse router config: {0}")]
    Parse(String),
}

/// 导航期间的可恢复错误。
///
/// 以返回值交给调用方，由调用方（例如 not-found 视图）决定用户可见的行为；
/// 发生时 RouterState 保持不变。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("no route matches path `{path}`")]
    RouteNotFound { path: String },

    #[error("no route is named `{name}`")]
    UnknownRouteName { name: String },

    #[error("route `{route}` requires parameter `{param}`")]
    MissingParameter { route: String, param: String },

    /// 参数值为空或包含 `/` `?` `#` `%`，插值后无法匹配回同一条路由。
    #[error("parameter `{param}` of route `{route}` has unusable value `{value}`")]
    InvalidParameter {
        route: String,
        param: String,
        value: String,
    },
}

/// HistoryBackend 调用失败。
///
/// 只会被记录日志，不会让导航失败。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("history backend failed to {operation} `{path}`: {reason}")]
pub struct HistoryError {
    pub operation: &'static str,
    pub path: String,
    pub reason: String,
}

/// 订阅者回调返回的错误。
pub type ListenerError = Box<dyn std::error::Error + 'static>;
