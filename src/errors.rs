use std::fmt;

use crate::session::SessionState;

/// Errors raised while parsing a project's field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError
{
    /// A field carries a type code outside the known range 1-5
    UnknownType
    {
        /// Position of the field in the schema array
        index: usize,
        /// The offending `type` value, as it appeared in the JSON
        code: String,
    },

    /// A field object (or the project object) lacks a required key
    MissingField
    {
        /// Position of the field in the schema array, `None` for the project object itself
        index: Option<usize>,
        /// Name of the missing key
        field: &'static str,
    },

    /// The input is not JSON, or not shaped like a field list
    Malformed
    {
        /// Details about what was expected
        details: String,
    },
}

impl fmt::Display for SchemaError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Self::UnknownType { index, code } => {
                write!(f, "Field #{} has unknown type code {} (expected 1-5)", index, code)
            }
            Self::MissingField { index: Some(index), field } => {
                write!(f, "Field #{} is missing its '{}' key", index, field)
            }
            Self::MissingField { index: None, field } => {
                write!(f, "Project response is missing its '{}' key", field)
            }
            Self::Malformed { details } => write!(f, "Malformed field list: {}", details),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Precondition failures detected while building an upload document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError
{
    /// No project ID has been set
    MissingProjectID,

    /// No dataset title has been set
    MissingTitle,

    /// Neither a contributor key nor an email/password pair has been set
    MissingCredential,

    /// The project's fields have not been fetched, or the project has none
    SchemaNotLoaded,

    /// No values have been pushed at all
    NoData,

    /// A field of the project has no pushed values
    FieldHasNoData(String),

    /// A value pushed for a number field does not parse as a number
    InvalidNumber
    {
        /// Name of the number field
        field: String,
        /// The rejected value
        value: String,
    },
}

impl fmt::Display for BuildError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Self::MissingProjectID => write!(f, "Project ID not set: set a project ID before uploading"),
            Self::MissingTitle => write!(f, "Dataset title not set: set a title before uploading"),
            Self::MissingCredential => {
                write!(f, "No credential set: set a contributor key or an email and password")
            }
            Self::SchemaNotLoaded => {
                write!(f, "Project fields not loaded: fetch the project's fields before uploading")
            }
            Self::NoData => write!(f, "No data pushed: push at least one value per field"),
            Self::FieldHasNoData(name) => write!(f, "Field '{}' has no data: push at least one value", name),
            Self::InvalidNumber { field, value } => {
                write!(f, "Field '{}' is a number field but '{}' is not a number", field, value)
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// Failures reported by the HTTP collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError
{
    /// The request could not be sent or the response could not be read
    ConnectFailed
    {
        /// The URL that was requested
        url: String,
        /// Details from the HTTP client
        details: String,
    },

    /// The request did not complete within the configured timeout
    Timeout
    {
        /// The URL that was requested
        url: String,
    },

    /// The service answered with a status outside 2xx
    NonSuccessStatus
    {
        /// The URL that was requested
        url: String,
        /// HTTP status code
        status: u16,
        /// Response body, lossily decoded
        body: String,
    },
}

impl fmt::Display for TransportError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Self::ConnectFailed { url, details } => write!(f, "Request to {} failed: {}", url, details),
            Self::Timeout { url } => write!(f, "Request to {} timed out", url),
            Self::NonSuccessStatus { url, status, body } => {
                write!(f, "{} answered HTTP {}: {}", url, status, body)
            }
        }
    }
}

impl std::error::Error for TransportError {}

/// Errors surfaced by [`crate::Session`] operations.
#[derive(Debug)]
pub enum SessionError
{
    /// The project's field list could not be parsed
    Schema(SchemaError),

    /// The upload document could not be built
    Build(BuildError),

    /// The HTTP exchange failed
    Transport(TransportError),

    /// The session already uploaded (or failed to) and must be replaced
    Finished(SessionState),

    /// The configuration file could not be read or parsed
    Config
    {
        /// Path to the configuration file
        file: String,
        /// Details about the failure
        details: String,
    },
}

impl fmt::Display for SessionError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            Self::Schema(err) => write!(f, "{}", err),
            Self::Build(err) => write!(f, "{}", err),
            Self::Transport(err) => write!(f, "{}", err),
            Self::Finished(state) => {
                write!(f, "Session is {:?}: create a new session to upload again", state)
            }
            Self::Config { file, details } => write!(f, "Invalid configuration '{}': {}", file, details),
        }
    }
}

impl std::error::Error for SessionError
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)>
    {
        match self {
            Self::Schema(err) => Some(err),
            Self::Build(err) => Some(err),
            Self::Transport(err) => Some(err),
            Self::Finished(_) | Self::Config { .. } => None,
        }
    }
}

impl From<SchemaError> for SessionError
{
    fn from(error: SchemaError) -> Self
    {
        SessionError::Schema(error)
    }
}

impl From<BuildError> for SessionError
{
    fn from(error: BuildError) -> Self
    {
        SessionError::Build(error)
    }
}

impl From<TransportError> for SessionError
{
    fn from(error: TransportError) -> Self
    {
        SessionError::Transport(error)
    }
}
