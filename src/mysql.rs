// This module contains the MySQL side of sqlkeeper: opening the single
// server connection the application works with and listing the databases
// that can be backed up or restored.

use async_trait::async_trait;
use log::{debug, info, warn, LevelFilter};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{ConnectOptions, Connection, Row};

use crate::error::{KeeperError, Result};
use crate::ui::models::ConnectionConfig;

/// Schemas the server reserves for its own metadata; never shown to the user
pub const SYSTEM_SCHEMAS: [&str; 4] = ["information_schema", "mysql", "performance_schema", "sys"];

/// A live connection to one MySQL server
///
/// The application holds at most one of these at a time. It is owned by the
/// controller and closed explicitly through [`MySqlSession::close`].
pub struct MySqlSession {
    conn: MySqlConnection,
    host: String,
    port: u16,
}

impl std::fmt::Debug for MySqlSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlSession")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

/// Connect to a MySQL server
///
/// The port is parsed here; anything that is not a valid `u16` is reported
/// as a connection error, the same as a refused connection or bad
/// credentials. No other validation happens before the driver sees the
/// values.
///
/// # Arguments
///
/// * `config` - Connection parameters as typed by the user
///
/// # Returns
///
/// A Result containing the open session or a `KeeperError::Connection`
pub async fn connect(config: &ConnectionConfig) -> Result<MySqlSession> {
    let port = config.parse_port()?;
    debug!("Connecting to MySQL at {}:{} as {}", config.host, port, config.user);

    let options = MySqlConnectOptions::new()
        .host(&config.host)
        .port(port)
        .username(&config.user)
        .password(&config.password)
        .log_statements(LevelFilter::Debug);

    let conn = options.connect().await.map_err(|e| {
        warn!("Failed to connect to MySQL at {}:{}: {}", config.host, port, e);
        KeeperError::Connection(e.to_string())
    })?;

    info!("Connected to MySQL server {}:{}", config.host, port);
    Ok(MySqlSession {
        conn,
        host: config.host.clone(),
        port,
    })
}

impl MySqlSession {
    /// `host:port` of the server this session talks to
    pub fn server(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Close the connection, sending COM_QUIT to the server
    pub async fn close(self) -> Result<()> {
        debug!("Closing MySQL connection to {}:{}", self.host, self.port);
        self.conn
            .close()
            .await
            .map_err(|e| KeeperError::Connection(e.to_string()))
    }
}

/// Anything that can answer `SHOW DATABASES`
#[async_trait]
pub trait SchemaSource: Send {
    /// Every database name the server reports, in server order
    async fn show_databases(&mut self) -> Result<Vec<String>>;
}

#[async_trait]
impl SchemaSource for MySqlSession {
    async fn show_databases(&mut self) -> Result<Vec<String>> {
        let rows = sqlx::query("SHOW DATABASES").fetch_all(&mut self.conn).await?;

        rows.iter().map(database_name).collect()
    }
}

// Some server versions report SHOW output as binary strings
fn database_name(row: &MySqlRow) -> Result<String> {
    match row.try_get::<String, _>(0) {
        Ok(name) => Ok(name),
        Err(_) => row
            .try_get::<Vec<u8>, _>(0)
            .map(|raw| String::from_utf8_lossy(&raw).into_owned())
            .map_err(|e| KeeperError::Query(e.to_string())),
    }
}

pub fn is_system_schema(name: &str) -> bool {
    SYSTEM_SCHEMAS.contains(&name)
}

/// Drop system schemas, keeping the order of everything else
pub fn filter_system_schemas(names: Vec<String>) -> Vec<String> {
    names.into_iter().filter(|n| !is_system_schema(n)).collect()
}

/// List the user databases available on the server
///
/// # Arguments
///
/// * `source` - The session (or any other schema source) to query
///
/// # Returns
///
/// The database names in server order with system schemas removed
pub async fn list_databases<S: SchemaSource + ?Sized>(source: &mut S) -> Result<Vec<String>> {
    debug!("Retrieving list of databases");
    let all = source.show_databases().await?;
    let total = all.len();
    let databases = filter_system_schemas(all);
    debug!("Server reported {} databases, {} after filtering system schemas", total, databases.len());
    Ok(databases)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(Vec<&'static str>);

    #[async_trait]
    impl SchemaSource for Canned {
        async fn show_databases(&mut self) -> Result<Vec<String>> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    struct Broken;

    #[async_trait]
    impl SchemaSource for Broken {
        async fn show_databases(&mut self) -> Result<Vec<String>> {
            Err(KeeperError::Query("Lost connection to MySQL server during query".into()))
        }
    }

    #[tokio::test]
    async fn list_keeps_server_order() {
        let mut source = Canned(vec!["zeta", "mysql", "alpha", "sys", "beta"]);
        let dbs = list_databases(&mut source).await.unwrap();
        assert_eq!(dbs, vec!["zeta", "alpha", "beta"]);
    }

    #[tokio::test]
    async fn list_propagates_query_errors() {
        let err = list_databases(&mut Broken).await.unwrap_err();
        assert!(matches!(err, KeeperError::Query(_)));
    }

    #[test]
    fn system_schema_names_are_exact() {
        assert!(is_system_schema("performance_schema"));
        assert!(!is_system_schema("mysql_app"));
        assert!(!is_system_schema("my_sys"));
    }

    #[tokio::test]
    async fn bad_port_is_a_connection_error() {
        let config = ConnectionConfig {
            port: "33o6".to_string(),
            ..ConnectionConfig::default()
        };
        let err = connect(&config).await.unwrap_err();
        assert!(matches!(err, KeeperError::Connection(_)));
    }
}
