use crate::router_core::types::{PathParams, QueryParams, RouteId, RouterMode};

//
// ========== 导航状态模型：NavState / RouterState ==========
//

/// 导航状态机。
///
/// - `Unresolved`：第一次成功导航之前
/// - `Resolved`：最近一次成功导航命中的路由与参数
///
/// 只有成功的导航才会迁移；失败的导航是自环，状态不变。没有终止态。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NavState {
    #[default]
    Unresolved,

    Resolved {
        route_id: RouteId,
        params: PathParams,
        query: QueryParams,
    },
}

impl NavState {
    pub fn is_resolved(&self) -> bool {
        matches!(self, NavState::Resolved { .. })
    }

    pub fn route_id(&self) -> Option<RouteId> {
        match self {
            NavState::Resolved { route_id, .. } => Some(*route_id),
            NavState::Unresolved => None,
        }
    }
}

/// Router 当前的状态快照。
///
/// 只能通过 Router 的导航操作修改。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterState {
    /// 当前生效的 path（不含 query），保留调用方传入的写法。
    ///
    /// 不做末尾 `/` 规范化：`navigate_to("/forms/")` 之后这里是 `"/forms/"`，
    /// 需要比较时先经过 `normalize_path`。
    ///
    /// `Unresolved` 时为 None。
    pub current_path: Option<String>,

    /// 构造时确定，之后不变。
    pub mode: RouterMode,

    pub nav: NavState,
}

impl RouterState {
    pub fn new(mode: RouterMode) -> Self {
        Self {
            current_path: None,
            mode,
            nav: NavState::Unresolved,
        }
    }

    /// 一次成功导航后的状态迁移。
    pub(crate) fn resolve(
        &mut self,
        path: String,
        route_id: RouteId,
        params: PathParams,
        query: QueryParams,
    ) {
        self.current_path = Some(path);
        self.nav = NavState::Resolved {
            route_id,
            params,
            query,
        };
    }
}
