//! Route table: named templates, first-match-wins resolution.
//!
//! A [`RouteTable`] is an ordered list of named [`Template`]s. It resolves a
//! URL to the first route that matches, and reverses a route by name.
//!
//! # Relationship to config types
//!
//! | Config type | Runtime type | Loader |
//! |-------------|--------------|--------|
//! | [`RouteTableConfig`] | [`RouteTable`] | [`RouteTable::from_config`] |
//! | [`RouteConfig`] | one named [`Template`] | [`RouteTable::add`] |
//!
//! With the `serde` feature the config types deserialize from JSON or YAML:
//!
//! ```yaml
//! routes:
//!   - name: user
//!     template: /user/:id<\d+>
//!   - name: search
//!     template: /search?q=:q&page?=:page<\d+>
//! ```

use crate::template::parse_candidate;
use crate::{Params, ReverseError, TableError, Template, MAX_ROUTES};

/// Configuration for one route.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteConfig {
    /// Unique route name.
    pub name: String,
    /// The route template.
    pub template: String,
}

/// Configuration for a [`RouteTable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteTableConfig {
    /// Routes in resolution order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub routes: Vec<RouteConfig>,
}

#[derive(Debug, Clone)]
struct Route {
    name: String,
    template: Template,
}

/// A successful [`RouteTable::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'t> {
    /// Name of the matching route.
    pub name: &'t str,
    /// Parameters captured by the route's template.
    pub params: Params,
}

/// Ordered, named templates.
///
/// # INV: first-match-wins
///
/// [`resolve`](Self::resolve) returns the first route, in insertion order,
/// whose template matches. Later routes are not evaluated.
///
/// # Example
///
/// ```
/// use teki::{Params, RouteTable};
///
/// let table = RouteTable::new()
///     .with_route("user", "/user/:id<\\d+>").unwrap()
///     .with_route("fallback", "/:any").unwrap();
///
/// let hit = table.resolve("/user/7").unwrap();
/// assert_eq!(hit.name, "user");
/// assert_eq!(hit.params.get("id"), Some("7"));
///
/// assert_eq!(table.resolve("/about").unwrap().name, "fallback");
/// assert_eq!(table.reverse("user", &Params::new().with("id", "9")).unwrap(), "/user/9");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile every route of a config.
    ///
    /// # Errors
    ///
    /// - [`TableError::TooManyRoutes`] if the config exceeds [`MAX_ROUTES`]
    /// - [`TableError::DuplicateRoute`] if two routes share a name
    /// - [`TableError::Template`] if a template does not compile
    pub fn from_config(config: &RouteTableConfig) -> Result<Self, TableError> {
        if config.routes.len() > MAX_ROUTES {
            return Err(TableError::TooManyRoutes {
                count: config.routes.len(),
                max: MAX_ROUTES,
            });
        }

        let mut table = Self::new();
        for route in &config.routes {
            table.add(&route.name, &route.template)?;
        }
        tracing::debug!(routes = table.len(), "loaded route table");
        Ok(table)
    }

    /// Compile and append a route.
    ///
    /// # Errors
    ///
    /// Same as [`from_config`](Self::from_config), for a single route.
    pub fn add(&mut self, name: &str, template: &str) -> Result<(), TableError> {
        if self.routes.len() >= MAX_ROUTES {
            return Err(TableError::TooManyRoutes {
                count: self.routes.len() + 1,
                max: MAX_ROUTES,
            });
        }
        if self.get(name).is_some() {
            return Err(TableError::DuplicateRoute {
                name: name.to_string(),
            });
        }

        let template = Template::compile(template).map_err(|source| TableError::Template {
            route: name.to_string(),
            source,
        })?;
        self.routes.push(Route {
            name: name.to_string(),
            template,
        });
        Ok(())
    }

    /// Compile and append a route (builder pattern).
    ///
    /// # Errors
    ///
    /// Same as [`add`](Self::add).
    pub fn with_route(mut self, name: &str, template: &str) -> Result<Self, TableError> {
        self.add(name, template)?;
        Ok(self)
    }

    /// Resolve a URL to the first matching route.
    ///
    /// The URL is parsed once and then tested against each route in order.
    #[must_use]
    pub fn resolve(&self, url: &str) -> Option<RouteMatch<'_>> {
        let url = parse_candidate(url).ok()?;
        let hit = self.routes.iter().find_map(|route| {
            route.template.matches_parsed(&url).map(|params| RouteMatch {
                name: route.name.as_str(),
                params,
            })
        });
        if hit.is_none() {
            tracing::trace!(url = %url, "no route matched");
        }
        hit
    }

    /// Reverse the named route.
    ///
    /// # Errors
    ///
    /// - [`ReverseError::UnknownRoute`] if no route has this name
    /// - [`ReverseError::MissingParameter`] or
    ///   [`ReverseError::UnrepresentablePathValue`] from the route's template
    pub fn reverse(&self, name: &str, params: &Params) -> Result<String, ReverseError> {
        let template = self.get(name).ok_or_else(|| ReverseError::UnknownRoute {
            name: name.to_string(),
            available: self.names().map(String::from).collect(),
        })?;
        template.reverse(params)
    }

    /// The template registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.routes
            .iter()
            .find(|route| route.name == name)
            .map(|route| &route.template)
    }

    /// Route names in resolution order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|route| route.name.as_str())
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if the table has no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
