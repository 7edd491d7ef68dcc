//! User display formatting

use crate::models::{Group, User};

/// Format a list of users as a table
pub fn format_user_list(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }

    let name_width = users
        .iter()
        .map(|u| u.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<12}  {}\n",
        "Name",
        "ID",
        "Email",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<12}  {:-<5}\n",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for user in users {
        output.push_str(&format!(
            "{:<name_width$}  {:<12}  {}\n",
            user.name,
            user.id.to_string(),
            user.email.as_deref().unwrap_or(""),
            name_width = name_width,
        ));
    }

    output
}

/// Format one user with the groups they belong to
pub fn format_user_details(user: &User, groups: &[Group]) -> String {
    let mut output = String::new();

    output.push_str(&format!("User: {}\n", user.name));
    output.push_str(&format!("  ID:      {}\n", user.id));
    if let Some(email) = &user.email {
        output.push_str(&format!("  Email:   {}\n", email));
    }
    output.push_str(&format!(
        "  Joined:  {}\n",
        user.created_at.format("%Y-%m-%d")
    ));

    if groups.is_empty() {
        output.push_str("  Groups:  (none)\n");
    } else {
        let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
        output.push_str(&format!("  Groups:  {}\n", names.join(", ")));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_list() {
        let users = vec![
            User::with_email("Alice", "alice@example.com"),
            User::new("Bob"),
        ];
        let output = format_user_list(&users);
        assert!(output.contains("alice@example.com"));
        assert!(output.contains("Bob"));
        assert_eq!(format_user_list(&[]), "No users found.");
    }

    #[test]
    fn test_user_details() {
        let user = User::new("Alice");
        let groups = vec![Group::new("Roommates"), Group::new("Ski Trip")];
        let output = format_user_details(&user, &groups);
        assert!(output.contains("User: Alice"));
        assert!(output.contains("Groups:  Roommates, Ski Trip"));
    }
}
