//! Route table display
//!
//! Renders the route table in the familiar prefix/verb/pattern/endpoint
//! layout.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::routes::{RouteMatch, RouteTable};

#[derive(Tabled)]
struct RouteRow {
    #[tabled(rename = "Prefix")]
    prefix: String,
    #[tabled(rename = "Verb")]
    verb: &'static str,
    #[tabled(rename = "URI Pattern")]
    pattern: String,
    #[tabled(rename = "Controller#Action")]
    endpoint: String,
}

/// Format every route as a table
pub fn format_route_table(table: &RouteTable) -> String {
    let rows: Vec<RouteRow> = table
        .iter()
        .map(|route| RouteRow {
            prefix: route.name.clone().unwrap_or_default(),
            verb: route.method.as_str(),
            pattern: route.pattern.clone(),
            endpoint: route.endpoint(),
        })
        .collect();

    let mut rendered = Table::new(rows);
    rendered.with(Style::psql());
    rendered.to_string()
}

/// Format a resolved request
pub fn format_route_match(route_match: &RouteMatch<'_>) -> String {
    let mut output = format!(
        "{} {} -> {}\n",
        route_match.route.method,
        route_match.route.pattern,
        route_match.route.endpoint()
    );

    for (name, value) in &route_match.params {
        output.push_str(&format!("  {} = {}\n", name, value));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::Method;

    #[test]
    fn test_route_table_lists_every_route() {
        let table = RouteTable::standard();
        let output = format_route_table(&table);

        assert!(output.contains("Controller#Action"));
        assert!(output.contains("/groups/:group_id/items/:item_id/users/:id"));
        assert!(output.contains("sessions#destroy"));
        // header, separator, one line per route
        assert_eq!(output.lines().count(), table.len() + 2);
    }

    #[test]
    fn test_route_match() {
        let table = RouteTable::standard();
        let route_match = table.resolve(Method::Delete, "/groups/1/users/2").unwrap();
        let output = format_route_match(&route_match);

        assert!(output.starts_with("DELETE /groups/:group_id/users/:id -> group_users#destroy"));
        assert!(output.contains("group_id = 1"));
        assert!(output.contains("id = 2"));
    }
}
