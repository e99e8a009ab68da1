use url::form_urlencoded;

use crate::router_core::types::{QueryParams, RouterMode};

/// 一次导航请求的地址拆分结果。
///
/// - `path`：参与匹配的部分，保证以 `/` 开头
/// - `query`：`?` 之后解码出的参数
///
/// fragment 在 History 模式下直接丢弃；Hash 模式下 fragment 本身就是地址。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: QueryParams,
}

impl Location {
    /// 解析应用内的地址，例如 `/forms/?tab=2`。
    pub fn parse(raw: &str) -> Self {
        let without_fragment = raw.split_once('#').map_or(raw, |(head, _)| head);
        let (path, query) = match without_fragment.split_once('?') {
            Some((path, query)) => (path, parse_query(query)),
            None => (without_fragment, QueryParams::default()),
        };

        Self {
            path: ensure_leading_slash(path),
            query,
        }
    }

    /// 解析宿主地址栏传来的值（popstate / hashchange）。
    ///
    /// Hash 模式下只看 `#` 之后的部分，没有 fragment 视为 `/`。
    pub fn from_address_bar(mode: RouterMode, raw: &str) -> Self {
        match mode {
            RouterMode::Hash => {
                let fragment = raw.split_once('#').map_or("", |(_, fragment)| fragment);
                Self::parse(fragment)
            }
            RouterMode::History => Self::parse(raw),
        }
    }

    /// 还原成可以写回地址栏的 path + query。
    pub fn to_uri(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }

        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.map.iter())
            .finish();
        format!("{}?{}", self.path, query)
    }
}

fn parse_query(query: &str) -> QueryParams {
    form_urlencoded::parse(query.as_bytes()).collect()
}

fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_owned()
    } else {
        format!("/{path}")
    }
}

/// 匹配前的规范化：末尾单个 `/` 无意义（根路径 `/` 除外）。
///
/// `/forms` 与 `/forms/` 规范化后都是 `/forms`。
pub fn normalize_path(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => path,
    }
}
