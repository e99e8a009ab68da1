use std::cell::RefCell;
use std::rc::Rc;

use crate::router_core::error::HistoryError;

/// 宿主环境的地址栏同步能力（History 模式专用）。
///
/// Router 只通过这个 trait 写地址栏，从不直接接触环境；
/// 两个操作都不影响 Router 自身状态，失败只记日志。
pub trait HistoryBackend {
    /// 新增一条可后退的记录（pushState）。
    fn push_path(&mut self, path: &str) -> Result<(), HistoryError>;

    /// 替换当前记录（replaceState）。
    fn replace_path(&mut self, path: &str) -> Result<(), HistoryError>;

    /// 可选：返回一个描述性名称，用于调试。
    fn name(&self) -> &str {
        "unnamed_history"
    }
}

#[derive(Debug, Default)]
struct MemoryHistoryInner {
    entries: Vec<String>,
    cursor: usize,
}

/// 纯内存的 HistoryBackend：记录列表 + 游标。
///
/// 用于没有浏览器的宿主和测试。clone 出来的句柄共享同一份记录，
/// 注入 Router 之后仍然可以在外部观察。
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    inner: Rc<RefCell<MemoryHistoryInner>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从第一条记录开始（通常是应用启动时的地址）。
    pub fn starting_at(path: impl Into<String>) -> Self {
        let history = Self::default();
        history.inner.borrow_mut().entries.push(path.into());
        history
    }

    pub fn entries(&self) -> Vec<String> {
        self.inner.borrow().entries.clone()
    }

    pub fn current(&self) -> Option<String> {
        let inner = self.inner.borrow();
        inner.entries.get(inner.cursor).cloned()
    }

    /// 后退一步，返回新的当前地址；已在最早记录时返回 None。
    ///
    /// 宿主应把返回值交给 `Router::sync_from_address_bar`，相当于 popstate。
    pub fn back(&self) -> Option<String> {
        let mut inner = self.inner.borrow_mut();
        if inner.cursor == 0 || inner.entries.is_empty() {
            return None;
        }
        inner.cursor -= 1;
        inner.entries.get(inner.cursor).cloned()
    }

    /// 前进一步，返回新的当前地址；没有可前进的记录时返回 None。
    pub fn forward(&self) -> Option<String> {
        let mut inner = self.inner.borrow_mut();
        if inner.cursor + 1 >= inner.entries.len() {
            return None;
        }
        inner.cursor += 1;
        inner.entries.get(inner.cursor).cloned()
    }
}

impl HistoryBackend for MemoryHistory {
    fn push_path(&mut self, path: &str) -> Result<(), HistoryError> {
        let mut inner = self.inner.borrow_mut();
        // push 会丢弃当前位置之后的前进记录
        if !inner.entries.is_empty() {
            let keep = inner.cursor + 1;
            inner.entries.truncate(keep);
        }
        inner.entries.push(path.to_owned());
        inner.cursor = inner.entries.len() - 1;
        Ok(())
    }

    fn replace_path(&mut self, path: &str) -> Result<(), HistoryError> {
        let mut inner = self.inner.borrow_mut();
        let cursor = inner.cursor;
        if cursor < inner.entries.len() {
            inner.entries[cursor] = path.to_owned();
        } else {
            inner.entries.push(path.to_owned());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_truncates_forward_entries() {
        let mut history = MemoryHistory::starting_at("/");
        history.push_path("/forms/").unwrap();
        history.push_path("/events/").unwrap();

        assert_eq!(history.back().as_deref(), Some("/forms/"));
        history.push_path("/components/").unwrap();

        assert_eq!(history.entries(), vec!["/", "/forms/", "/components/"]);
        assert_eq!(history.forward(), None);
    }

    #[test]
    fn replace_overwrites_current_entry() {
        let mut history = MemoryHistory::starting_at("/");
        history.push_path("/forms/").unwrap();
        history.replace_path("/events/").unwrap();

        assert_eq!(history.entries(), vec!["/", "/events/"]);
        assert_eq!(history.current().as_deref(), Some("/events/"));
    }

    #[test]
    fn back_and_forward_stop_at_edges() {
        let mut history = MemoryHistory::new();
        assert_eq!(history.back(), None);

        history.push_path("/").unwrap();
        history.push_path("/forms/").unwrap();
        assert_eq!(history.back().as_deref(), Some("/"));
        assert_eq!(history.back(), None);
        assert_eq!(history.forward().as_deref(), Some("/forms/"));
        assert_eq!(history.forward(), None);
    }

    #[test]
    fn clones_share_entries() {
        let observer = MemoryHistory::new();
        let mut backend = observer.clone();
        backend.push_path("/forms/").unwrap();
        assert_eq!(observer.current().as_deref(), Some("/forms/"));
    }
}
