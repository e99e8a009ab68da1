use std::fmt;

use tracing::{debug, warn};

use crate::router_core::config::RouterConfig;
use crate::router_core::error::{ConfigurationError, ListenerError, NavigationError};
use crate::router_core::history::HistoryBackend;
use crate::router_core::listener::{ListenerFailure, ListenerRegistry, RouteChange, Subscription};
use crate::router_core::location::Location;
use crate::router_core::route::{RouteDefinition, RouteMatch, RouteMeta, RouteStore};
use crate::router_core::state::{NavState, RouterState};
use crate::router_core::types::{PathParams, QueryParams, RouteId, RouterMode};

/// 导航成功后如何同步到地址栏。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reflect {
    /// 新增一条历史记录。
    Push,
    /// 替换当前历史记录。
    Replace,
    /// 变更本身来自地址栏，不需要回写。
    Skip,
}

/// 一次成功导航的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub route_id: RouteId,

    /// 新的 current_path（不含 query）。
    pub path: String,

    pub params: PathParams,

    pub query: QueryParams,

    /// 写回地址栏用的地址：Hash 模式是 `#/path`，宿主自行赋值给 location.hash。
    pub href: String,

    /// 本次通知中失败的订阅者；导航本身仍然算成功。
    pub listener_failures: Vec<ListenerFailure>,
}

/// 当前生效路由的只读视图。
#[derive(Debug, Clone, Copy)]
pub struct CurrentRoute<'a> {
    pub meta: &'a RouteMeta,
    pub path: &'a str,
    pub params: &'a PathParams,
    pub query: &'a QueryParams,
}

impl CurrentRoute<'_> {
    pub fn definition(&self) -> &RouteDefinition {
        &self.meta.definition
    }
}

/// Router 构造器。
///
/// History 模式必须注入 HistoryBackend；Hash 模式下注入的 backend 不会被调用。
pub struct RouterBuilder {
    routes: Vec<RouteDefinition>,
    mode: RouterMode,
    history: Option<Box<dyn HistoryBackend>>,
}

impl RouterBuilder {
    pub fn mode(mut self, mode: RouterMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn history(mut self, backend: impl HistoryBackend + 'static) -> Self {
        self.history = Some(Box::new(backend));
        self
    }

    pub fn build(self) -> Result<Router, ConfigurationError> {
        if self.mode == RouterMode::History && self.history.is_none() {
            return Err(ConfigurationError::MissingHistoryBackend);
        }

        let store = RouteStore::new(self.routes)?;
        debug!(mode = ?self.mode, routes = store.len(), "router constructed");

        Ok(Router {
            store,
            state: RouterState::new(self.mode),
            listeners: ListenerRegistry::new(),
            history: self.history,
        })
    }
}

impl fmt::Debug for RouterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterBuilder")
            .field("routes", &self.routes)
            .field("mode", &self.mode)
            .field("history", &self.history.as_ref().map(|h| h.name()))
            .finish()
    }
}

/// 客户端路由器。
///
/// - 独占路由表（构造后只读）与导航状态
/// - 导航在 `&mut self` 上同步执行到底：匹配 -> 更新状态 -> 同步地址栏 -> 通知订阅者
/// - 由应用顶层组合创建并按引用传递，没有全局单例
pub struct Router {
    store: RouteStore,
    state: RouterState,
    listeners: ListenerRegistry,
    history: Option<Box<dyn HistoryBackend>>,
}

impl Router {
    pub fn builder(routes: Vec<RouteDefinition>) -> RouterBuilder {
        RouterBuilder {
            routes,
            mode: RouterMode::default(),
            history: None,
        }
    }

    /// Hash 模式的快捷构造。
    pub fn new(routes: Vec<RouteDefinition>) -> Result<Self, ConfigurationError> {
        Self::builder(routes).build()
    }

    /// 从配置文档构造；History 模式需要在返回的 builder 上补充 backend。
    pub fn from_config(config: RouterConfig) -> RouterBuilder {
        Self::builder(config.routes).mode(config.mode)
    }

    pub fn mode(&self) -> RouterMode {
        self.state.mode
    }

    pub fn state(&self) -> &RouterState {
        &self.state
    }

    pub fn current_path(&self) -> Option<&str> {
        self.state.current_path.as_deref()
    }

    pub fn current(&self) -> Option<CurrentRoute<'_>> {
        match &self.state.nav {
            NavState::Resolved {
                route_id,
                params,
                query,
            } => Some(CurrentRoute {
                meta: self.store.get(*route_id)?,
                path: self.state.current_path.as_deref()?,
                params,
                query,
            }),
            NavState::Unresolved => None,
        }
    }

    /// 按注册顺序列出所有路由声明。
    pub fn routes(&self) -> impl Iterator<Item = &RouteDefinition> {
        self.store.metas.iter().map(|meta| &meta.definition)
    }

    pub fn route_by_name(&self, name: &str) -> Option<&RouteDefinition> {
        self.store.by_name(name).map(|meta| &meta.definition)
    }

    /// 纯匹配，不改变状态。query 与 fragment 会被忽略。
    pub fn match_path(&self, path: &str) -> RouteMatch<'_> {
        self.store.match_path(&Location::parse(path).path)
    }

    /// 当前模式下指向 `path` 的链接地址。
    pub fn href(&self, path: &str) -> String {
        self.state.mode.href(&Location::parse(path).to_uri())
    }

    /// 指向某条具名路由的链接地址。
    pub fn href_for(&self, name: &str, params: &PathParams) -> Result<String, NavigationError> {
        let path = self.store.path_for(name, params)?;
        Ok(self.state.mode.href(&path))
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(&RouteChange<'_>) -> Result<(), ListenerError> + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn navigate_to(&mut self, path: &str) -> Result<Navigation, NavigationError> {
        self.navigate(path, Reflect::Push)
    }

    /// 和 `navigate_to` 相同，但 History 模式下替换当前记录而不是新增。
    pub fn replace(&mut self, path: &str) -> Result<Navigation, NavigationError> {
        self.navigate(path, Reflect::Replace)
    }

    pub fn navigate_by_name(
        &mut self,
        name: &str,
        params: &PathParams,
    ) -> Result<Navigation, NavigationError> {
        let path = self.store.path_for(name, params).inspect_err(|err| {
            warn!(route = name, error = %err, "named navigation rejected");
        })?;
        self.navigate_to(&path)
    }

    /// 处理来自宿主地址栏的变更（popstate / hashchange）。
    ///
    /// 地址栏已经是新地址，所以不会再回写。
    pub fn sync_from_address_bar(&mut self, raw: &str) -> Result<Navigation, NavigationError> {
        let location = Location::from_address_bar(self.state.mode, raw);
        self.apply(location, Reflect::Skip)
    }

    fn navigate(&mut self, path: &str, reflect: Reflect) -> Result<Navigation, NavigationError> {
        self.apply(Location::parse(path), reflect)
    }

    fn apply(&mut self, location: Location, reflect: Reflect) -> Result<Navigation, NavigationError> {
        let resolved = match self.store.match_path(&location.path) {
            RouteMatch::Found(resolved) => resolved,
            RouteMatch::NotFound => {
                warn!(path = %location.path, "no route matches path");
                return Err(NavigationError::RouteNotFound {
                    path: location.path,
                });
            }
        };

        let meta = resolved.meta;
        let route_id = resolved.id;
        let params = resolved.path_params;
        let uri = location.to_uri();

        self.state.resolve(
            location.path.clone(),
            route_id,
            params.clone(),
            location.query.clone(),
        );
        debug!(
            route = %meta.definition.name,
            path = %location.path,
            view = %meta.definition.view_key,
            "navigated"
        );

        if self.state.mode == RouterMode::History {
            if let Some(history) = self.history.as_mut() {
                let reflected = match reflect {
                    Reflect::Push => history.push_path(&uri),
                    Reflect::Replace => history.replace_path(&uri),
                    Reflect::Skip => Ok(()),
                };
                if let Err(err) = reflected {
                    warn!(backend = history.name(), error = %err, "failed to reflect navigation");
                }
            }
        }

        let change = RouteChange {
            route_id,
            definition: &meta.definition,
            path: &location.path,
            params: &params,
            query: &location.query,
        };
        let listener_failures = self.listeners.notify(&change);

        Ok(Navigation {
            route_id,
            href: self.state.mode.href(&uri),
            path: location.path,
            params,
            query: location.query,
            listener_failures,
        })
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("store", &self.store)
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .field("history", &self.history.as_ref().map(|h| h.name()))
            .finish()
    }
}
