use crate::error::{KeeperError, Result};

/// Connection parameters for the MySQL server
///
/// The port is kept as typed so the form can hold anything; it is parsed
/// when a connection or a tool invocation needs it.
#[derive(Clone, PartialEq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: String,
    pub user: String,
    pub password: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: String::from("localhost"),
            port: String::from("3306"),
            user: String::from("root"),
            password: String::new(),
        }
    }
}

// Password stays out of logs and snapshots
impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.masked_password())
            .finish()
    }
}

impl ConnectionConfig {
    /// Parse the port field, reporting garbage as a connection error
    pub fn parse_port(&self) -> Result<u16> {
        self.port
            .trim()
            .parse::<u16>()
            .map_err(|e| KeeperError::Connection(format!("invalid port '{}': {}", self.port, e)))
    }

    /// Get all focus fields for the connection panel
    pub fn focus_fields() -> &'static [super::FocusField] {
        use super::FocusField;
        &[
            FocusField::Host,
            FocusField::Port,
            FocusField::User,
            FocusField::Password,
        ]
    }

    /// Get the field value for a given focus field
    pub fn get_field_value(&self, field: super::FocusField) -> String {
        use super::FocusField;
        match field {
            FocusField::Host => self.host.clone(),
            FocusField::Port => self.port.clone(),
            FocusField::User => self.user.clone(),
            FocusField::Password => self.password.clone(),
            _ => String::new(),
        }
    }

    /// Set a field value from a string
    pub fn set_field_value(&mut self, field: super::FocusField, value: String) {
        use super::FocusField;
        match field {
            FocusField::Host => self.host = value,
            FocusField::Port => self.port = value,
            FocusField::User => self.user = value,
            FocusField::Password => self.password = value,
            _ => {}
        }
    }

    /// Check if a focus field belongs to this config
    pub fn contains_field(field: super::FocusField) -> bool {
        use super::FocusField;
        matches!(
            field,
            FocusField::Host | FocusField::Port | FocusField::User | FocusField::Password
        )
    }

    /// `[hidden]` for a set password, empty for an empty one
    pub fn masked_password(&self) -> String {
        if self.password.is_empty() {
            String::new()
        } else {
            "[hidden]".to_string()
        }
    }

    /// Value shown in the connection panel for the password row
    pub fn password_display(&self, editing: bool, input_buffer: &str) -> String {
        if editing {
            input_buffer.to_string()
        } else {
            self.masked_password()
        }
    }
}
