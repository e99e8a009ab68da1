use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// 路由的内部标识。
///
/// 数值即注册顺序下标，越小越先参与匹配。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(pub u32);

/// 命中路由后交给渲染方的视图引用。
///
/// 对 Router 来说是不透明的：只存储、只转交，从不解析。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewKey(pub String);

impl ViewKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 地址栏同步方式。
///
/// 构造时确定，运行期间不可变。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterMode {
    /// path 编码在 `#` 之后，由宿主环境原生同步。
    #[default]
    Hash,

    /// path 直接写入地址栏，需要通过注入的 HistoryBackend 同步（不刷新页面）。
    History,
}

impl RouterMode {
    /// 生成可直接用于链接的地址。
    ///
    /// - Hash：`/forms/` -> `#/forms/`
    /// - History：`/forms/` -> `/forms/`
    pub fn href(self, uri: &str) -> String {
        match self {
            RouterMode::Hash => format!("#{uri}"),
            RouterMode::History => uri.to_owned(),
        }
    }
}

/// path 参数绑定，例如 `:id` -> `"data"`。
///
/// 用 BTreeMap 保证迭代顺序稳定，便于比较和调试输出。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathParams {
    pub map: BTreeMap<String, String>,
}

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.map.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for PathParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// query 参数（`?tab=2&q=x`）。
///
/// 同名 key 出现多次时后者覆盖前者。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams {
    pub map: BTreeMap<String, String>,
}

impl QueryParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// 订阅者的内部标识，按订阅顺序递增。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn href_depends_on_mode() {
        assert_eq!(RouterMode::Hash.href("/forms/"), "#/forms/");
        assert_eq!(RouterMode::History.href("/forms/"), "/forms/");
    }

    #[test]
    fn mode_defaults_to_hash_and_serializes_lowercase() {
        assert_eq!(RouterMode::default(), RouterMode::Hash);
        assert_eq!(
            serde_json::to_string(&RouterMode::History).unwrap(),
            "\"history\""
        );
    }

    #[test]
    fn params_collect_from_pairs() {
        let params: PathParams = [("id", "data")].into_iter().collect();
        assert_eq!(params.get("id"), Some("data"));
        assert_eq!(params.len(), 1);
    }
}
