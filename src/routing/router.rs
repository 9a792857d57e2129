//! Route table: registration and lookup.
//!
//! # Responsibilities
//! - Store one handler per (method, path) key
//! - Look up the handler for a request
//! - Return a matched route or an explicit miss
//!
//! # Design Decisions
//! - Exact keys live in a HashMap keyed by `RouteKey`; lookup is byte-for-byte
//! - Re-registering a key replaces the handler, no error is raised
//! - Template routes are a fallback behind exact keys, most literal segments first,
//!   ties resolved by registration order
//! - The table is built with `&mut self` and then moved into a `Dispatcher`,
//!   after which it is only ever read (shared without locks)

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::dispatch::Handler;
use crate::routing::key::{Method, RouteKey};
use crate::routing::matcher::{PathParams, PathPattern};

struct TemplateRoute {
    method: Method,
    pattern: PathPattern,
    handler: Arc<dyn Handler>,
}

/// A successful lookup.
pub struct RouteMatch<'a> {
    pub handler: &'a Arc<dyn Handler>,
    pub params: PathParams,
}

/// Mapping from route key to handler.
#[derive(Default)]
pub struct RouteTable {
    exact: HashMap<RouteKey, Arc<dyn Handler>>,
    templates: Vec<TemplateRoute>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the handler for `(method, path)`.
    ///
    /// Returns `true` when an earlier handler was replaced.
    pub fn register(&mut self, method: Method, path: &str, handler: impl Handler) -> bool {
        self.register_shared(method, path, Arc::new(handler))
    }

    /// Like [`register`](Self::register) for a handler shared between several keys.
    pub fn register_shared(
        &mut self,
        method: Method,
        path: &str,
        handler: Arc<dyn Handler>,
    ) -> bool {
        let replaced = match PathPattern::parse(path) {
            Some(pattern) => self.insert_template(method, pattern, handler),
            None => self
                .exact
                .insert(RouteKey::new(method, path), handler)
                .is_some(),
        };

        if replaced {
            tracing::debug!(method = %method, path = %path, "Route replaced");
        } else {
            tracing::trace!(method = %method, path = %path, "Route registered");
        }
        replaced
    }

    /// Templates that differ only in capture names occupy the same slot; the
    /// newer registration replaces both the handler and the names.
    fn insert_template(
        &mut self,
        method: Method,
        pattern: PathPattern,
        handler: Arc<dyn Handler>,
    ) -> bool {
        let existing = self
            .templates
            .iter_mut()
            .find(|r| r.method == method && r.pattern.same_shape(&pattern));

        match existing {
            Some(route) => {
                route.pattern = pattern;
                route.handler = handler;
                true
            }
            None => {
                self.templates.push(TemplateRoute {
                    method,
                    pattern,
                    handler,
                });
                false
            }
        }
    }

    /// Find the handler for `(method, path)`.
    pub fn lookup(&self, method: Method, path: &str) -> Option<RouteMatch<'_>> {
        if let Some(handler) = self.exact.get(&RouteKey::new(method, path)) {
            return Some(RouteMatch {
                handler,
                params: PathParams::default(),
            });
        }

        let mut best: Option<(&TemplateRoute, PathParams)> = None;
        for route in self.templates.iter().filter(|r| r.method == method) {
            if let Some((current, _)) = &best {
                if route.pattern.specificity() <= current.pattern.specificity() {
                    continue;
                }
            }
            if let Some(params) = route.pattern.matches(path) {
                best = Some((route, params));
            }
        }

        best.map(|(route, params)| RouteMatch {
            handler: &route.handler,
            params,
        })
    }

    /// All registered keys, sorted by method then path.
    pub fn keys(&self) -> Vec<RouteKey> {
        let mut keys: Vec<RouteKey> = self
            .exact
            .keys()
            .cloned()
            .chain(
                self.templates
                    .iter()
                    .map(|r| RouteKey::new(r.method, r.pattern.as_str())),
            )
            .collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.keys())
            .finish()
    }
}
