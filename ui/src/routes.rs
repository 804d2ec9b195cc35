//! Pages served by the admin binary.

use admin_business::{AdminConfig, Column, ConfigError, PageConfig, Permission};
use serde_json::Value;

/// Users may not delete administrators; published posts are frozen.
pub fn default_routes(config: &AdminConfig) -> Result<Vec<PageConfig>, ConfigError> {
    let users = PageConfig::builder()
        .title("Users")
        .endpoint("users")
        .columns(vec![
            Column::new("id", "ID"),
            Column::new("name", "Name"),
            Column::new("email", "Email"),
            Column::new("role", "Role"),
        ])
        .is_deletable(Permission::new(|record| {
            record.get("role").and_then(Value::as_str) != Some("admin")
        }))
        .maybe_page_size(config.page_size())
        .build()?;

    let posts = PageConfig::builder()
        .title("Posts")
        .endpoint("posts")
        .columns(vec![
            Column::new("id", "ID"),
            Column::new("title", "Title"),
            Column::new("author", "Author"),
            Column::new("published", "Published").with_renderer(|value| {
                match value.as_bool() {
                    Some(true) => "yes".to_owned(),
                    Some(false) => "no".to_owned(),
                    None => value.to_string(),
                }
            }),
        ])
        .is_editable(Permission::new(|record| {
            record.get("published").and_then(Value::as_bool) != Some(true)
        }))
        .maybe_page_size(config.page_size())
        .build()?;

    Ok(vec![users, posts])
}

#[cfg(test)]
mod tests {
    use super::*;
    use admin_business::Record;
    use serde_json::json;

    #[test]
    fn test_default_routes_are_valid() {
        let routes = default_routes(&AdminConfig::new("http://localhost:1")).expect("valid routes");
        let titles: Vec<_> = routes.iter().map(PageConfig::title).collect();
        assert_eq!(titles, ["Users", "Posts"]);
        assert!(routes.iter().all(|route| route.page_size().is_none()));
    }

    #[test]
    fn test_admins_cannot_be_deleted() {
        let routes = default_routes(&AdminConfig::new("http://localhost:1")).expect("valid routes");
        let admin = Record::try_from(json!({"id": 1, "role": "admin"})).expect("object");
        let member = Record::try_from(json!({"id": 2, "role": "member"})).expect("object");

        assert!(!routes[0].is_deletable().allows(&admin));
        assert!(routes[0].is_deletable().allows(&member));
        assert!(routes[0].is_editable().allows(&admin));
    }
}
