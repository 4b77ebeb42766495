//! Blocking client for the iSENSE data collection API.
//!
//! A [`Session`] fetches a project's fields, collects values pushed by field
//! name and uploads them as a new dataset or as an append to an existing one:
//!
//! - **Fields** are parsed from `GET /projects/{id}` into ordered [`FieldDescriptor`]s
//! - **Values** are queued per field name in push order ([`FieldValues`])
//! - **Upload documents** key every field's values by field ID, with number
//!   fields sent as JSON numbers ([`upload::build`])
//!
//! # Usage
//!
//! ```rust,no_run
//! use isense_client::{Configuration, Session};
//!
//! fn main() -> Result<(), isense_client::errors::SessionError> {
//!     let mut session = Session::new(Configuration::dev())?;
//!     session.set_project_id("929");
//!     session.set_title("Weather station");
//!     session.set_contributor_key("classroom-key");
//!
//!     session.load_schema()?;
//!     session.push("Temperature", "21.5");
//!     session.push("Timestamp", isense_client::generate_timestamp());
//!
//!     session.build()?;
//!     println!("{}", session.report());
//!     session.upload()?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod schema;
pub mod session;
pub mod transport;
pub mod types;
pub mod upload;
pub mod values;

use std::path::Path;

use serde::Deserialize;

use errors::SessionError;
pub use session::{Session, SessionState};
pub use transport::{BasicAuth, HttpTransport, Transport};
pub use types::{Credential, FieldDescriptor, FieldType, Project, Response, UploadDocument};
pub use values::FieldValues;

/// Production server.
pub const LIVE_URL: &str = "https://isenseproject.org/api/v1";

/// Development server.
pub const DEV_URL: &str = "http://rsense-dev.cs.uml.edu/api/v1";

/// Client configuration.
///
/// Every key is optional when loaded from TOML:
///
/// ```toml
/// base_url = "http://rsense-dev.cs.uml.edu/api/v1"
/// timeout_secs = 30
/// connect_timeout_secs = 10
/// contributor_name = "cURL"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Configuration
{
    /// API root, without a trailing `/projects` (default: the live server)
    pub base_url: String,

    /// Whole-request timeout in seconds (default: 30)
    pub timeout_secs: u64,

    /// Connection timeout in seconds (default: 10)
    pub connect_timeout_secs: u64,

    /// Contributor name used when a session sets none (default: "cURL")
    pub contributor_name: String,
}

impl Default for Configuration
{
    fn default() -> Self
    {
        Self {
            base_url: LIVE_URL.to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            contributor_name: upload::DEFAULT_CONTRIBUTOR_NAME.to_string(),
        }
    }
}

impl Configuration
{
    /// Defaults, pointed at the development server.
    pub fn dev() -> Self
    {
        Self {
            base_url: DEV_URL.to_string(),
            ..Default::default()
        }
    }

    /// Reads a TOML configuration file. Missing keys take their default values.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SessionError>
    {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| SessionError::Config {
            file: path.display().to_string(),
            details: e.to_string(),
        })?;

        toml::from_str(&text).map_err(|e| SessionError::Config {
            file: path.display().to_string(),
            details: e.to_string(),
        })
    }

    /// Full URL of an API path such as `projects/929`.
    pub fn endpoint(&self, path: &str) -> String
    {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Current UTC time as an ISO 8601 timestamp, e.g. `2014-06-26T15:04:05Z`.
///
/// Handy for timestamp fields; the value still has to be pushed.
pub fn generate_timestamp() -> String
{
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
