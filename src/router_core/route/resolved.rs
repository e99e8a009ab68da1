use super::meta::RouteMeta;
use crate::router_core::types::{PathParams, RouteId};

/// 基于 path 解析得到的路由结果。
///
/// - 绑定了具体的 RouteMeta
/// - 含 path 参数（例如 ":id" -> "data"）
#[derive(Debug, Clone)]
pub struct ResolvedRoute<'a> {
    /// 路由 ID。
    pub id: RouteId,

    /// 路由元信息引用。
    pub meta: &'a RouteMeta,

    /// path 参数。
    pub path_params: PathParams,
}

/// `RouteStore::match_path` 的结果。
///
/// 没有路由命中是正常结果，不是错误。
#[derive(Debug, Clone)]
pub enum RouteMatch<'a> {
    Found(ResolvedRoute<'a>),
    NotFound,
}

impl<'a> RouteMatch<'a> {
    pub fn is_found(&self) -> bool {
        matches!(self, RouteMatch::Found(_))
    }

    pub fn found(self) -> Option<ResolvedRoute<'a>> {
        match self {
            RouteMatch::Found(resolved) => Some(resolved),
            RouteMatch::NotFound => None,
        }
    }
}
