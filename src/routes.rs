//! Route table for the web surface
//!
//! Declares which (method, path) pairs exist and which controller action
//! each one reaches. The table is pure data: it resolves requests to actions
//! and generates paths, but holds no handlers.
//!
//! Nested resources follow the usual REST conventions: the parent's ID is
//! captured as `:<parent>_id` and the leaf's as `:id`. Routes nested inside a
//! resource block are declared before the resource's own routes, and entries
//! match in declaration order.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// HTTP request method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PATCH" => Ok(Method::Patch),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            other => Err(format!("Unknown HTTP method: {}", other)),
        }
    }
}

/// Controller handling a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Controller {
    Groups,
    GroupUsers,
    Items,
    UserItems,
    Registrations,
    Sessions,
}

impl Controller {
    pub fn as_str(&self) -> &'static str {
        match self {
            Controller::Groups => "groups",
            Controller::GroupUsers => "group_users",
            Controller::Items => "items",
            Controller::UserItems => "user_items",
            Controller::Registrations => "registrations",
            Controller::Sessions => "sessions",
        }
    }
}

/// Controller action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Action {
    Index,
    New,
    Create,
    Show,
    Edit,
    Update,
    Destroy,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Index => "index",
            Action::New => "new",
            Action::Create => "create",
            Action::Show => "show",
            Action::Edit => "edit",
            Action::Update => "update",
            Action::Destroy => "destroy",
        }
    }

    /// All seven standard resource actions
    pub const ALL: [Action; 7] = [
        Action::Index,
        Action::Create,
        Action::New,
        Action::Edit,
        Action::Show,
        Action::Update,
        Action::Destroy,
    ];
}

/// One entry of the route table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    /// Path helper name (e.g. "group_item"); only the first route
    /// declared for a path carries one
    pub name: Option<String>,
    pub method: Method,
    /// Path pattern with `:param` segments
    pub pattern: String,
    pub controller: Controller,
    pub action: Action,
}

impl Route {
    /// "controller#action"
    pub fn endpoint(&self) -> String {
        format!("{}#{}", self.controller.as_str(), self.action.as_str())
    }

    /// Names of the `:param` segments, in order
    pub fn param_names(&self) -> Vec<&str> {
        segments(&self.pattern)
            .filter_map(|s| s.strip_prefix(':'))
            .collect()
    }

    fn matches(&self, path: &str) -> Option<Vec<(String, String)>> {
        let mut pattern = segments(&self.pattern);
        let mut actual = segments(path);
        let mut params = Vec::new();

        loop {
            match (pattern.next(), actual.next()) {
                (None, None) => return Some(params),
                (Some(p), Some(a)) => {
                    if let Some(param) = p.strip_prefix(':') {
                        params.push((param.to_string(), a.to_string()));
                    } else if p != a {
                        return None;
                    }
                }
                _ => return None,
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.method, self.pattern, self.endpoint())
    }
}

/// A resolved request: the route plus captured path parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'r> {
    pub route: &'r Route,
    pub params: Vec<(String, String)>,
}

impl<'r> RouteMatch<'r> {
    pub fn controller(&self) -> Controller {
        self.route.controller
    }

    pub fn action(&self) -> Action {
        self.route.action
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Ordered, immutable set of routes
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// The bill splitter's routes
    pub fn standard() -> Self {
        let mut builder = Builder::default();

        // groups/:group_id/users
        builder.resources(
            "/groups/:group_id",
            "users",
            ("group_user", "group_users"),
            Controller::GroupUsers,
            &[Action::Show, Action::Create, Action::Destroy],
        );
        // groups/:group_id/items/:item_id/users
        builder.resources(
            "/groups/:group_id/items/:item_id",
            "users",
            ("group_item_user", "group_item_users"),
            Controller::UserItems,
            &[Action::Create, Action::Destroy],
        );
        builder.resources(
            "/groups/:group_id",
            "items",
            ("group_item", "group_items"),
            Controller::Items,
            &[
                Action::Create,
                Action::New,
                Action::Edit,
                Action::Update,
                Action::Destroy,
            ],
        );
        builder.resources(
            "",
            "groups",
            ("group", "groups"),
            Controller::Groups,
            &Action::ALL,
        );

        builder.get("sign_up", "/sign_up", Controller::Registrations, Action::New);
        builder.get("log_in", "/log_in", Controller::Sessions, Action::New);
        builder.get("log_out", "/log_out", Controller::Sessions, Action::Destroy);
        builder.get("root", "/", Controller::Groups, Action::Index);

        Self {
            routes: builder.routes,
        }
    }

    /// Find the first route matching `method` and `path`
    ///
    /// The query string and a trailing slash are ignored.
    pub fn resolve(&self, method: Method, path: &str) -> Option<RouteMatch<'_>> {
        let path = path.split(['?', '#']).next().unwrap_or("");
        self.routes
            .iter()
            .filter(|r| r.method == method)
            .find_map(|route| {
                route
                    .matches(path)
                    .map(|params| RouteMatch { route, params })
            })
    }

    /// Build the path for a named route
    ///
    /// Returns `None` for an unknown name or a missing parameter.
    pub fn path_for(&self, name: &str, params: &[(&str, &str)]) -> Option<String> {
        let route = self
            .routes
            .iter()
            .find(|r| r.name.as_deref() == Some(name))?;

        let mut path = String::new();
        for segment in segments(&route.pattern) {
            let value = match segment.strip_prefix(':') {
                Some(param) => params.iter().find(|(k, _)| *k == param)?.1,
                None => segment,
            };
            path.push('/');
            path.push_str(value);
        }

        if path.is_empty() {
            path.push('/');
        }
        Some(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[derive(Default)]
struct Builder {
    routes: Vec<Route>,
}

impl Builder {
    fn push(
        &mut self,
        name: Option<String>,
        method: Method,
        pattern: String,
        controller: Controller,
        action: Action,
    ) {
        // helper names belong to the first route for a pattern
        let name = name.filter(|_| !self.routes.iter().any(|r| r.pattern == pattern));
        self.routes.push(Route {
            name,
            method,
            pattern,
            controller,
            action,
        });
    }

    fn get(&mut self, name: &str, pattern: &str, controller: Controller, action: Action) {
        self.push(
            Some(name.to_string()),
            Method::Get,
            pattern.to_string(),
            controller,
            action,
        );
    }

    /// Expand a resource in standard action order, keeping only `only`
    fn resources(
        &mut self,
        prefix: &str,
        segment: &str,
        (singular, plural): (&str, &str),
        controller: Controller,
        only: &[Action],
    ) {
        let collection = format!("{}/{}", prefix, segment);
        let member = format!("{}/:id", collection);

        for action in Action::ALL.iter().filter(|a| only.contains(a)) {
            let entries: Vec<(Option<String>, Method, String)> = match action {
                Action::Index => vec![(Some(plural.to_string()), Method::Get, collection.clone())],
                Action::Create => vec![(Some(plural.to_string()), Method::Post, collection.clone())],
                Action::New => vec![(
                    Some(format!("new_{}", singular)),
                    Method::Get,
                    format!("{}/new", collection),
                )],
                Action::Edit => vec![(
                    Some(format!("edit_{}", singular)),
                    Method::Get,
                    format!("{}/edit", member),
                )],
                Action::Show => vec![(Some(singular.to_string()), Method::Get, member.clone())],
                Action::Update => vec![
                    (Some(singular.to_string()), Method::Patch, member.clone()),
                    (Some(singular.to_string()), Method::Put, member.clone()),
                ],
                Action::Destroy => vec![(Some(singular.to_string()), Method::Delete, member.clone())],
            };

            for (name, method, pattern) in entries {
                self.push(name, method, pattern, controller, *action);
            }
        }
    }
}
