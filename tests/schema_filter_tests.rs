use async_trait::async_trait;
use sqlkeeper::error::Result;
use sqlkeeper::mysql::{filter_system_schemas, list_databases, SchemaSource, SYSTEM_SCHEMAS};
use sqlkeeper::ui::keeper::KeeperApp;
use sqlkeeper::ui::models::PopupState;
use sqlkeeper::error::KeeperError;
use sqlkeeper::tools::ToolLocator;
use sqlkeeper::ui::models::ConnectionConfig;

struct FakeServer(Vec<String>);

#[async_trait]
impl SchemaSource for FakeServer {
    async fn show_databases(&mut self) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_only_user_databases_are_listed() {
    let mut server = FakeServer(names(&["app_db", "information_schema", "mysql"]));
    let databases = list_databases(&mut server).await.unwrap();
    assert_eq!(databases, vec!["app_db"]);
}

#[tokio::test]
async fn test_no_system_schema_survives_in_any_position() {
    let orders = [
        vec!["sys", "app_db", "performance_schema", "mysql", "information_schema", "shop"],
        vec!["app_db", "shop", "information_schema", "performance_schema", "mysql", "sys"],
        vec!["information_schema", "mysql", "performance_schema", "sys", "app_db", "shop"],
    ];
    for order in orders {
        let mut server = FakeServer(names(&order));
        let databases = list_databases(&mut server).await.unwrap();
        assert!(databases.iter().all(|d| !SYSTEM_SCHEMAS.contains(&d.as_str())));
        let mut sorted = databases.clone();
        sorted.sort();
        assert_eq!(sorted, vec!["app_db", "shop"]);
    }
}

#[tokio::test]
async fn test_server_with_only_system_schemas_lists_nothing() {
    let mut server = FakeServer(names(&SYSTEM_SCHEMAS));
    assert!(list_databases(&mut server).await.unwrap().is_empty());
}

#[test]
fn test_filter_is_case_sensitive() {
    // Schema names on disk are case sensitive on most platforms
    let filtered = filter_system_schemas(names(&["MySQL", "mysql", "Sys"]));
    assert_eq!(filtered, vec!["MySQL", "Sys"]);
}

#[test]
fn test_listing_result_feeds_the_browser() {
    let mut app = KeeperApp::new(ConnectionConfig::default(), ToolLocator::new("/nonexistent"));
    app.apply_database_list(Ok(filter_system_schemas(names(&["app_db", "mysql", "shop"]))));
    assert_eq!(app.browser.databases, vec!["app_db", "shop"]);
    assert_eq!(app.browser.selected_database(), None);
}

#[test]
fn test_listing_failure_shows_error_popup() {
    let mut app = KeeperApp::new(ConnectionConfig::default(), ToolLocator::new("/nonexistent"));
    app.apply_database_list(Err(KeeperError::Query("Access denied; you need the SHOW DATABASES privilege".into())));
    match &app.popup_state {
        PopupState::Error { title, message } => {
            assert_eq!(title, "Error");
            assert!(message.contains("Access denied"));
        }
        other => panic!("expected error popup, got {:?}", other),
    }
    assert!(app.browser.databases.is_empty());
}
