//! Built-in object transformers, one module per supported object type.

pub mod address;
pub mod domain_name;
pub mod email_message;
pub mod file;
pub mod http_session;
pub mod network_connection;
