use serde::{Deserialize, Serialize};

use super::pattern::PathPattern;
use crate::router_core::types::{RouteId, ViewKey};

/// 一条路由声明：path pattern、唯一 name、视图引用。
///
/// 这是配置层的值类型，可以直接从配置文档反序列化；
/// 真正参与匹配的是编译后的 [`RouteMeta`]。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// 路由的路径模式。
    ///
    /// 例如：
    /// - "/"
    /// - "/forms/"
    /// - "/components/:id/"
    pub path: String,

    /// 人类可读的唯一名字，例如 "Basics" / "Components"。
    ///
    /// 用于 navigate-by-name 的反向查找。
    pub name: String,

    /// 命中后要渲染的视图。
    #[serde(rename = "view")]
    pub view_key: ViewKey,
}

impl RouteDefinition {
    pub fn new(
        path: impl Into<String>,
        name: impl Into<String>,
        view_key: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            view_key: ViewKey::new(view_key),
        }
    }
}

/// 编译后的单条路由。
///
/// 在 RouteStore 构造时生成，之后只读。
#[derive(Debug)]
pub struct RouteMeta {
    /// 注册顺序下标。
    pub id: RouteId,

    /// 原始声明。
    pub definition: RouteDefinition,

    /// 编译后的 pattern，负责匹配与反向插值。
    pub pattern: PathPattern,
}

impl RouteMeta {
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn view_key(&self) -> &ViewKey {
        &self.definition.view_key
    }
}
