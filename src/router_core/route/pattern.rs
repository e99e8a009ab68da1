use std::collections::HashSet;
use std::fmt;

use matchit::Router as MatchitRouter;

use crate::router_core::error::ConfigurationError;
use crate::router_core::location::normalize_path;
use crate::router_core::types::PathParams;

/// pattern 中的一段。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    /// 必须逐字相等。
    Static(String),

    /// `:name`，匹配任意非空且不含 `/` 的子串。
    Param(String),
}

/// 编译后的 path pattern。
///
/// 每个 pattern 持有一个只注册了自身的 matchit router：
/// matchit 在同一棵树里按"静态优先"排序，而我们要的是按注册顺序 first-match-wins，
/// 所以由 RouteStore 逐条扫描，matchit 只负责单条 pattern 的 segment 匹配与参数捕获。
pub struct PathPattern {
    /// 注册时的原始写法，例如 "/components/:id/"。
    source: String,

    segments: Vec<PatternSegment>,

    /// 原始写法是否以 `/` 结尾；反向插值时保留。
    trailing_slash: bool,

    matcher: MatchitRouter<()>,
}

impl PathPattern {
    pub fn parse(source: &str) -> Result<Self, ConfigurationError> {
        let invalid = |reason: &str| ConfigurationError::InvalidPattern {
            pattern: source.to_owned(),
            reason: reason.to_owned(),
        };

        if !source.starts_with('/') {
            return Err(invalid("pattern must start with `/`"));
        }

        let normalized = normalize_path(source);
        if normalized == "/" && source.len() > 1 {
            return Err(invalid("pattern contains an empty segment"));
        }
        let trailing_slash = normalized.len() != source.len();

        let mut segments = Vec::new();
        let mut seen = HashSet::new();
        if normalized != "/" {
            for raw in normalized[1..].split('/') {
                if raw.is_empty() {
                    return Err(invalid("pattern contains an empty segment"));
                }

                match raw.strip_prefix(':') {
                    Some(name) => {
                        if name.is_empty()
                            || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                        {
                            return Err(invalid(&format!("invalid parameter name `{name}`")));
                        }
                        if !seen.insert(name.to_owned()) {
                            return Err(invalid(&format!("parameter `{name}` appears twice")));
                        }
                        segments.push(PatternSegment::Param(name.to_owned()));
                    }
                    None => segments.push(PatternSegment::Static(raw.to_owned())),
                }
            }
        }

        let mut matcher = MatchitRouter::new();
        matcher
            .insert(to_matchit_route(&segments), ())
            .map_err(|err| invalid(&err.to_string()))?;

        Ok(Self {
            source: source.to_owned(),
            segments,
            trailing_slash,
            matcher,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    pub fn is_static(&self) -> bool {
        self.param_names().next().is_none()
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            PatternSegment::Param(name) => Some(name.as_str()),
            PatternSegment::Static(_) => None,
        })
    }

    /// 对已经规范化的 path 做匹配，命中时返回捕获的参数。
    pub fn matches(&self, normalized_path: &str) -> Option<PathParams> {
        let matched = self.matcher.at(normalized_path).ok()?;
        Some(matched.params.iter().collect())
    }

    /// 用参数拼出具体 path，保留原始写法的末尾 `/`。
    ///
    /// 缺少参数时返回缺失的参数名。
    pub fn interpolate<'p>(&'p self, params: &PathParams) -> Result<String, &'p str> {
        if self.segments.is_empty() {
            return Ok("/".to_owned());
        }

        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                PatternSegment::Static(text) => path.push_str(text),
                PatternSegment::Param(name) => path.push_str(params.get(name).ok_or(name.as_str())?),
            }
        }
        if self.trailing_slash {
            path.push('/');
        }
        Ok(path)
    }
}

impl fmt::Debug for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathPattern")
            .field("source", &self.source)
            .field("segments", &self.segments)
            .field("trailing_slash", &self.trailing_slash)
            .finish()
    }
}

/// `:id` 写法转换成 matchit 的 `{id}`，静态段里的花括号需要转义。
fn to_matchit_route(segments: &[PatternSegment]) -> String {
    if segments.is_empty() {
        return "/".to_owned();
    }

    let mut route = String::new();
    for segment in segments {
        route.push('/');
        match segment {
            PatternSegment::Static(text) => {
                route.push_str(&text.replace('{', "{{").replace('}', "}}"));
            }
            PatternSegment::Param(name) => {
                route.push('{');
                route.push_str(name);
                route.push('}');
            }
        }
    }
    route
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_pattern_matches_exactly() {
        let pattern = PathPattern::parse("/forms/").unwrap();
        assert!(pattern.is_static());
        assert_eq!(pattern.matches("/forms"), Some(PathParams::new()));
        assert_eq!(pattern.matches("/forms/extra"), None);
        assert_eq!(pattern.matches("/form"), None);
    }

    #[test]
    fn root_pattern_matches_root_only() {
        let pattern = PathPattern::parse("/").unwrap();
        assert!(pattern.matches("/").is_some());
        assert!(pattern.matches("/forms").is_none());
    }

    #[test]
    fn param_segment_binds_value() {
        let pattern = PathPattern::parse("/components/:id/").unwrap();
        let params = pattern.matches("/components/data").unwrap();
        assert_eq!(params.get("id"), Some("data"));
        assert_eq!(pattern.param_names().collect::<Vec<_>>(), vec!["id"]);
    }

    #[test]
    fn param_segment_rejects_empty_and_slash() {
        let pattern = PathPattern::parse("/components/:id/").unwrap();
        assert!(pattern.matches("/components").is_none());
        assert!(pattern.matches("/components/a/b").is_none());
    }

    #[test]
    fn literal_braces_are_escaped() {
        let pattern = PathPattern::parse("/odd/{x}").unwrap();
        assert!(pattern.matches("/odd/{x}").is_some());
        assert!(pattern.matches("/odd/y").is_none());
    }

    #[test]
    fn interpolate_keeps_trailing_slash() {
        let pattern = PathPattern::parse("/components/:id/").unwrap();
        let params: PathParams = [("id", "data")].into_iter().collect();
        assert_eq!(pattern.interpolate(&params).unwrap(), "/components/data/");

        let bare = PathPattern::parse("/users/:user/posts/:post").unwrap();
        let params: PathParams = [("user", "7"), ("post", "42")].into_iter().collect();
        assert_eq!(bare.interpolate(&params).unwrap(), "/users/7/posts/42");
    }

    #[test]
    fn interpolate_reports_missing_param() {
        let pattern = PathPattern::parse("/components/:id/").unwrap();
        assert_eq!(pattern.interpolate(&PathParams::new()), Err("id"));
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        for source in ["forms", "//", "/a//b", "/:", "/:a-b", "/:id/:id"] {
            assert!(
                matches!(
                    PathPattern::parse(source),
                    Err(ConfigurationError::InvalidPattern { .. })
                ),
                "{source} should be rejected"
            );
        }
    }
}
