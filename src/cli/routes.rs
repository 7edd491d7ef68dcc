//! `routes` command: list the route table or resolve one request

use crate::display::routes::{format_route_match, format_route_table};
use crate::error::{SplitterError, SplitterResult};
use crate::routes::{Method, RouteTable};

/// Parse "METHOD /path" into its parts
pub fn parse_request(request: &str) -> SplitterResult<(Method, String)> {
    let mut parts = request.split_whitespace();
    let (Some(method), Some(path), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(SplitterError::Validation(format!(
            "Expected \"METHOD /path\", got \"{}\"",
            request
        )));
    };

    let method = method.parse::<Method>().map_err(SplitterError::Validation)?;
    Ok((method, path.to_string()))
}

/// Handle the routes command
pub fn handle_routes_command(resolve: Option<String>) -> SplitterResult<()> {
    let table = RouteTable::standard();

    match resolve {
        None => println!("{}", format_route_table(&table)),
        Some(request) => {
            let (method, path) = parse_request(&request)?;
            let route_match = table
                .resolve(method, &path)
                .ok_or_else(|| SplitterError::NotFound {
                    entity_type: "Route",
                    identifier: format!("{} {}", method, path),
                })?;
            print!("{}", format_route_match(&route_match));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_request() {
        let (method, path) = parse_request("delete /groups/1").unwrap();
        assert_eq!(method, Method::Delete);
        assert_eq!(path, "/groups/1");
    }

    #[test]
    fn test_parse_request_rejects_malformed() {
        assert!(parse_request("/groups").is_err());
        assert!(parse_request("GET /a /b").is_err());
        assert!(parse_request("FETCH /groups").unwrap_err().is_validation());
    }
}
