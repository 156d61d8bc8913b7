//! Route table: registration, lookup and reverse.
//!
//! # Responsibilities
//! - Store compiled routes in declaration order
//! - Resolve a relative path to the first matching route plus captures
//! - Reverse a route name plus params into a concrete path
//!
//! # Design Decisions
//! - Built through [`RouteTableBuilder`]; no table exists until every
//!   registration succeeded
//! - Immutable after construction (thread-safe without locks)
//! - O(n) pattern scan, first match wins
//! - O(1) name lookup via HashMap for reverse
//! - Explicit NoMatchingRoute rather than a silent default

use std::collections::HashMap;

use crate::routing::error::{RouteError, RouteResult};
use crate::routing::params::Params;
use crate::routing::pattern::RoutePattern;

/// One (pattern, handler, name) binding.
#[derive(Debug, Clone)]
pub struct Route<H> {
    pattern: RoutePattern,
    handler: H,
    name: String,
}

impl<H> Route<H> {
    pub fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A successful resolution.
#[derive(Debug)]
pub struct ResolvedRoute<'a, H> {
    pub route: &'a Route<H>,
    pub params: Params,
}

impl<'a, H> ResolvedRoute<'a, H> {
    pub fn name(&self) -> &'a str {
        self.route.name()
    }

    pub fn handler(&self) -> &'a H {
        self.route.handler()
    }
}

/// Collects route declarations, rejecting duplicate names and bad templates.
#[derive(Debug)]
pub struct RouteTableBuilder<H> {
    routes: Vec<Route<H>>,
    by_name: HashMap<String, usize>,
}

impl<H> Default for RouteTableBuilder<H> {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<H> RouteTableBuilder<H> {
    /// Add one route after all previously registered ones.
    pub fn register(mut self, pattern: &str, handler: H, name: &str) -> RouteResult<Self> {
        if self.by_name.contains_key(name) {
            return Err(RouteError::DuplicateRouteName(name.to_string()));
        }

        let compiled = RoutePattern::parse(pattern).map_err(|e| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        self.by_name.insert(name.to_string(), self.routes.len());
        self.routes.push(Route {
            pattern: compiled,
            handler,
            name: name.to_string(),
        });

        Ok(self)
    }

    /// Freeze the registrations into an immutable table.
    pub fn build(self) -> RouteTable<H> {
        RouteTable {
            routes: self.routes,
            by_name: self.by_name,
        }
    }
}

/// Immutable, ordered route table.
#[derive(Debug)]
pub struct RouteTable<H> {
    routes: Vec<Route<H>>,
    by_name: HashMap<String, usize>,
}

impl<H> RouteTable<H> {
    pub fn builder() -> RouteTableBuilder<H> {
        RouteTableBuilder::default()
    }

    /// Find the first route whose pattern matches `path`.
    ///
    /// `path` is relative: no leading slash, mount prefix already removed.
    pub fn resolve(&self, path: &str) -> RouteResult<ResolvedRoute<'_, H>> {
        self.routes
            .iter()
            .find_map(|route| {
                route
                    .pattern
                    .matches(path)
                    .map(|params| ResolvedRoute { route, params })
            })
            .ok_or_else(|| RouteError::NoMatchingRoute(path.to_string()))
    }

    /// Build the relative path for a named route.
    pub fn reverse(&self, name: &str, params: &Params) -> RouteResult<String> {
        let route = self
            .get(name)
            .ok_or_else(|| RouteError::UnknownRouteName(name.to_string()))?;

        let mismatch = |reason: String| RouteError::ParameterMismatch {
            name: name.to_string(),
            reason,
        };

        let path = route.pattern.render(params).map_err(mismatch)?;

        // The rendered path must resolve back to this same route
        match self.resolve(&path) {
            Ok(resolved) if resolved.name() == name => {}
            Ok(resolved) => {
                return Err(mismatch(format!(
                    "rendered path {:?} resolves to '{}'",
                    path,
                    resolved.name()
                )));
            }
            Err(_) => {
                return Err(mismatch(format!("rendered path {:?} does not match its pattern", path)));
            }
        }

        Ok(path)
    }

    pub fn get(&self, name: &str) -> Option<&Route<H>> {
        self.by_name.get(name).map(|&i| &self.routes[i])
    }

    /// Routes in declaration order.
    pub fn routes(&self) -> impl Iterator<Item = &Route<H>> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
