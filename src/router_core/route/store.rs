use std::collections::HashMap;

use tracing::debug;

use super::meta::{RouteDefinition, RouteMeta};
use super::pattern::PathPattern;
use super::resolved::{ResolvedRoute, RouteMatch};
use crate::router_core::error::{ConfigurationError, NavigationError};
use crate::router_core::location::normalize_path;
use crate::router_core::types::{PathParams, RouteId};

/// 参数值里不能出现的字符：`/` 会拆出新 segment，`?` `#` 会被当成 query / fragment 截断，
/// `%` 会和百分号编码混淆。
const RESERVED_IN_PARAM: [char; 4] = ['/', '?', '#', '%'];

/// 路由表存储结构：
///
/// - 所有 RouteMeta（Vec），索引下标就是 RouteId 的值
/// - name -> RouteId 索引
///
/// 构造后只读，不支持运行期注册。
#[derive(Debug)]
pub struct RouteStore {
    /// 所有路由的元信息，按注册顺序排列，也就是匹配优先级。
    pub metas: Vec<RouteMeta>,

    /// name-based 索引："Components" -> RouteId
    pub name_index: HashMap<String, RouteId>,
}

impl RouteStore {
    /// 编译并校验一组路由声明。
    ///
    /// name 重复、name 为空或 pattern 非法都会让构造失败。
    pub fn new(definitions: Vec<RouteDefinition>) -> Result<Self, ConfigurationError> {
        let mut metas = Vec::with_capacity(definitions.len());
        let mut name_index = HashMap::with_capacity(definitions.len());

        for (index, definition) in definitions.into_iter().enumerate() {
            if definition.name.is_empty() {
                return Err(ConfigurationError::EmptyRouteName {
                    path: definition.path,
                });
            }

            let id = RouteId(index as u32);
            if name_index.insert(definition.name.clone(), id).is_some() {
                return Err(ConfigurationError::DuplicateRouteName {
                    name: definition.name,
                });
            }

            let pattern = PathPattern::parse(&definition.path)?;
            metas.push(RouteMeta {
                id,
                definition,
                pattern,
            });
        }

        debug!(routes = metas.len(), "route store compiled");
        Ok(Self { metas, name_index })
    }

    pub fn len(&self) -> usize {
        self.metas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metas.is_empty()
    }

    pub fn get(&self, id: RouteId) -> Option<&RouteMeta> {
        self.metas.get(id.0 as usize)
    }

    pub fn by_name(&self, name: &str) -> Option<&RouteMeta> {
        self.name_index.get(name).and_then(|id| self.get(*id))
    }

    /// 按注册顺序扫描，返回第一条命中的路由。
    ///
    /// 匹配前先规范化末尾 `/`，所以 `/forms` 与 `/forms/` 结果相同。
    pub fn match_path(&self, path: &str) -> RouteMatch<'_> {
        let normalized = normalize_path(path);
        self.metas
            .iter()
            .find_map(|meta| {
                meta.pattern.matches(normalized).map(|path_params| ResolvedRoute {
                    id: meta.id,
                    meta,
                    path_params,
                })
            })
            .map_or(RouteMatch::NotFound, RouteMatch::Found)
    }

    /// 由 name + 参数反向拼出具体 path。
    pub fn path_for(&self, name: &str, params: &PathParams) -> Result<String, NavigationError> {
        let meta = self
            .by_name(name)
            .ok_or_else(|| NavigationError::UnknownRouteName {
                name: name.to_owned(),
            })?;

        for param in meta.pattern.param_names() {
            if let Some(value) = params.get(param) {
                if value.is_empty() || value.contains(RESERVED_IN_PARAM) {
                    return Err(NavigationError::InvalidParameter {
                        route: name.to_owned(),
                        param: param.to_owned(),
                        value: value.to_owned(),
                    });
                }
            }
        }

        meta.pattern
            .interpolate(params)
            .map_err(|param| NavigationError::MissingParameter {
                route: name.to_owned(),
                param: param.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(routes: &[(&str, &str)]) -> RouteStore {
        RouteStore::new(
            routes
                .iter()
                .map(|(path, name)| RouteDefinition::new(*path, *name, *name))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let err = RouteStore::new(vec![
            RouteDefinition::new("/", "Home", "Home"),
            RouteDefinition::new("/home/", "Home", "Home"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::DuplicateRouteName {
                name: "Home".into()
            }
        );
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = RouteStore::new(vec![RouteDefinition::new("/", "", "Home")]).unwrap_err();
        assert!(matches!(err, ConfigurationError::EmptyRouteName { .. }));
    }

    #[test]
    fn first_registered_route_wins() {
        let param_first = store(&[("/components/:id/", "Component"), ("/components/data/", "Data")]);
        let resolved = param_first.match_path("/components/data/").found().unwrap();
        assert_eq!(resolved.meta.name(), "Component");
        assert_eq!(resolved.path_params.get("id"), Some("data"));

        let static_first = store(&[("/components/data/", "Data"), ("/components/:id/", "Component")]);
        let resolved = static_first.match_path("/components/data").found().unwrap();
        assert_eq!(resolved.meta.name(), "Data");
    }

    #[test]
    fn unknown_path_is_not_found() {
        let store = store(&[("/", "Home"), ("/forms/", "Forms")]);
        assert!(!store.match_path("/nonexistent/").is_found());
    }

    #[test]
    fn path_for_interpolates_params() {
        let store = store(&[("/components/:id/", "Components")]);
        let params: PathParams = [("id", "data")].into_iter().collect();
        assert_eq!(store.path_for("Components", &params).unwrap(), "/components/data/");
    }

    #[test]
    fn path_for_reports_errors() {
        let store = store(&[("/components/:id/", "Components")]);
        assert_eq!(
            store.path_for("Missing", &PathParams::new()),
            Err(NavigationError::UnknownRouteName {
                name: "Missing".into()
            })
        );
        assert_eq!(
            store.path_for("Components", &PathParams::new()),
            Err(NavigationError::MissingParameter {
                route: "Components".into(),
                param: "id".into()
            })
        );

        let params: PathParams = [("id", "a/b")].into_iter().collect();
        assert!(matches!(
            store.path_for("Components", &params),
            Err(NavigationError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn path_for_rejects_query_and_fragment_markers() {
        let store = store(&[("/components/:id/", "Components")]);
        for value in ["a?b", "x#y", "100%"] {
            let params: PathParams = [("id", value)].into_iter().collect();
            assert_eq!(
                store.path_for("Components", &params),
                Err(NavigationError::InvalidParameter {
                    route: "Components".into(),
                    param: "id".into(),
                    value: value.into(),
                }),
                "{value} should be rejected"
            );
        }
    }
}
