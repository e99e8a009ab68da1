use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use tracing::error;

use crate::router_core::error::ListenerError;
use crate::router_core::route::RouteDefinition;
use crate::router_core::types::{ListenerId, PathParams, QueryParams, RouteId};

/// 一次成功导航后推送给订阅者的内容。
///
/// 渲染方通常只关心 `definition.view_key` 和参数。
#[derive(Debug, Clone, Copy)]
pub struct RouteChange<'a> {
    pub route_id: RouteId,

    /// 命中的路由声明。
    pub definition: &'a RouteDefinition,

    /// 导航后的 current_path（不含 query）。
    pub path: &'a str,

    pub params: &'a PathParams,

    pub query: &'a QueryParams,
}

type ListenerFn = dyn FnMut(&RouteChange<'_>) -> Result<(), ListenerError>;

struct ListenerEntry {
    id: ListenerId,
    callback: Rc<RefCell<Box<ListenerFn>>>,
}

impl fmt::Debug for ListenerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerEntry").field("id", &self.id).finish()
    }
}

type SharedEntries = Rc<RefCell<Vec<ListenerEntry>>>;

/// 某个订阅者在一次通知中失败的记录。
///
/// 失败包括返回 Err 和 panic；两者都被隔离，不影响后续订阅者，也不影响导航结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerFailure {
    pub listener: ListenerId,
    pub message: String,
}

/// 订阅者列表。
///
/// 按订阅顺序通知。单线程使用，内部用 Rc<RefCell> 让 Subscription
/// 可以在 Router 之外（包括通知过程中）取消订阅。
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    entries: SharedEntries,
    next_id: Cell<u64>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: FnMut(&RouteChange<'_>) -> Result<(), ListenerError> + 'static,
    {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        self.entries.borrow_mut().push(ListenerEntry {
            id,
            callback: Rc::new(RefCell::new(Box::new(callback))),
        });

        Subscription {
            id,
            entries: Rc::downgrade(&self.entries),
            active: true,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn contains(&self, id: ListenerId) -> bool {
        self.entries.borrow().iter().any(|entry| entry.id == id)
    }

    /// 同步通知所有订阅者，返回失败记录。
    pub fn notify(&self, change: &RouteChange<'_>) -> Vec<ListenerFailure> {
        // 先拍快照再逐个调用，回调里取消订阅不会和这里的借用冲突
        let snapshot: Vec<(ListenerId, Rc<RefCell<Box<ListenerFn>>>)> = self
            .entries
            .borrow()
            .iter()
            .map(|entry| (entry.id, Rc::clone(&entry.callback)))
            .collect();

        let mut failures = Vec::new();
        for (id, callback) in snapshot {
            // 被前面的订阅者取消了
            if !self.contains(id) {
                continue;
            }

            let outcome = match callback.try_borrow_mut() {
                Ok(mut callback) => {
                    panic::catch_unwind(AssertUnwindSafe(|| (*callback)(change)))
                        .unwrap_or_else(|payload| Err(panic_message(&*payload).into()))
                }
                Err(_) => Err("listener is already running".into()),
            };

            if let Err(err) = outcome {
                let message = err.to_string();
                error!(
                    listener = id.0,
                    route = %change.definition.name,
                    path = change.path,
                    error = %message,
                    "route listener failed"
                );
                failures.push(ListenerFailure {
                    listener: id,
                    message,
                });
            }
        }
        failures
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("listener panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("listener panicked: {message}")
    } else {
        "listener panicked".to_owned()
    }
}

/// 订阅句柄。
///
/// - `unsubscribe()` 只会真正移除一次，重复调用是 no-op
/// - drop 时自动取消订阅；需要在 Router 生命周期内一直监听时调用 `detach()`
#[must_use = "dropping a Subscription unsubscribes the listener"]
#[derive(Debug)]
pub struct Subscription {
    id: ListenerId,
    entries: Weak<RefCell<Vec<ListenerEntry>>>,
    active: bool,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// 取消订阅。返回这次调用是否真的移除了订阅者。
    pub fn unsubscribe(&mut self) -> bool {
        if !std::mem::replace(&mut self.active, false) {
            return false;
        }

        let Some(entries) = self.entries.upgrade() else {
            return false;
        };
        let mut entries = entries.borrow_mut();
        let before = entries.len();
        entries.retain(|entry| entry.id != self.id);
        entries.len() != before
    }

    /// 放弃句柄但保留订阅，订阅者随 Router 一起销毁。
    pub fn detach(mut self) {
        self.active = false;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
