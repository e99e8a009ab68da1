use serde::{Deserialize, Serialize};

use crate::router_core::error::ConfigurationError;
use crate::router_core::route::RouteDefinition;
use crate::router_core::types::RouterMode;

/// Router 的静态配置：路由列表 + 模式。
///
/// 只在构造时读取一次，运行期间不支持重新配置。
///
/// ```json
/// {
///   "mode": "history",
///   "routes": [
///     { "path": "/", "name": "Basics", "view": "Basics" },
///     { "path": "/components/:id/", "name": "Components", "view": "Components" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// 缺省为 hash。
    #[serde(default)]
    pub mode: RouterMode,

    /// 注册顺序即匹配优先级。
    pub routes: Vec<RouteDefinition>,
}

impl RouterConfig {
    pub fn from_json_str(source: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(source).map_err(|err| ConfigurationError::Parse(err.to_string()))
    }
}
