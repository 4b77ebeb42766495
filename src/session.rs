//! A single upload attempt against one project.
//!
//! A [`Session`] owns everything an upload needs: project identity, credentials,
//! the fetched fields, the pushed values and the last built document. Network
//! I/O only happens in [`Session::load_schema`], [`Session::upload`],
//! [`Session::append`] and [`Session::check_user`].

use std::fmt;

use tracing::{debug, info, warn};

use crate::errors::{BuildError, SessionError, TransportError};
use crate::schema;
use crate::transport::{BasicAuth, HttpTransport, Transport};
use crate::types::{Credential, FieldDescriptor, Project, Response, UploadDocument};
use crate::upload::{self, BuildRequest};
use crate::values::FieldValues;
use crate::Configuration;

/// Where a session is in its lifecycle.
///
/// `Empty -> SchemaLoading -> SchemaLoaded -> Formatting -> Formatted -> Uploading -> Uploaded | Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState
{
    Empty,
    SchemaLoading,
    SchemaLoaded,
    Formatting,
    Formatted,
    Uploading,
    Uploaded,
    Failed,
}

/// Client state for one dataset upload.
pub struct Session<T: Transport = HttpTransport>
{
    config: Configuration,
    transport: T,
    project_id: Option<String>,
    title: Option<String>,
    contributor_name: Option<String>,
    credential: Option<Credential>,
    dataset_id: Option<String>,
    project: Option<Project>,
    values: FieldValues,
    document: Option<UploadDocument>,
    state: SessionState,
    upload_attempted: bool,
}

impl Session<HttpTransport>
{
    /// Creates a session talking to the configured server over HTTP.
    pub fn new(config: Configuration) -> Result<Self, SessionError>
    {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> Session<T>
{
    pub fn with_transport(config: Configuration, transport: T) -> Self
    {
        Self {
            config,
            transport,
            project_id: None,
            title: None,
            contributor_name: None,
            credential: None,
            dataset_id: None,
            project: None,
            values: FieldValues::new(),
            document: None,
            state: SessionState::Empty,
            upload_attempted: false,
        }
    }

    /// Builder form of [`Session::set_project_all`].
    pub fn with_project(mut self, project_id: &str, title: &str, contributor_name: &str, contributor_key: &str) -> Self
    {
        self.set_project_all(project_id, title, contributor_name, contributor_key);
        self
    }

    /// Sets project, title, contributor name and contributor key in one call.
    pub fn set_project_all(&mut self, project_id: &str, title: &str, contributor_name: &str, contributor_key: &str)
    {
        self.set_project_id(project_id);
        self.set_title(title);
        self.set_contributor_name(contributor_name);
        self.set_contributor_key(contributor_key);
    }

    /// Sets the project. Fields fetched for a different project are dropped;
    /// call [`Session::load_schema`] to fetch the new ones.
    pub fn set_project_id(&mut self, project_id: impl Into<String>)
    {
        let project_id = project_id.into();
        if self.project_id.as_deref() == Some(project_id.as_str()) {
            return;
        }

        self.project_id = Some(project_id);
        self.project = None;
        self.invalidate_document();
        if !self.is_finished() {
            self.state = SessionState::Empty;
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>)
    {
        self.title = Some(title.into());
        self.invalidate_document();
    }

    /// Label shown next to the contribution. Defaults to the configured contributor name.
    pub fn set_contributor_name(&mut self, name: impl Into<String>)
    {
        self.contributor_name = Some(name.into());
        self.invalidate_document();
    }

    pub fn set_contributor_key(&mut self, key: impl Into<String>)
    {
        self.set_credential(Credential::Key(key.into()));
    }

    /// Uses an iSENSE account instead of a contributor key.
    pub fn set_account(&mut self, email: impl Into<String>, password: impl Into<String>)
    {
        self.set_credential(Credential::Account {
            email: email.into(),
            password: password.into(),
        });
    }

    pub fn set_credential(&mut self, credential: Credential)
    {
        self.credential = Some(credential);
        self.invalidate_document();
    }

    /// Targets an existing dataset: the next upload appends to it.
    pub fn set_dataset_id(&mut self, dataset_id: impl Into<String>)
    {
        self.dataset_id = Some(dataset_id.into());
        self.invalidate_document();
    }

    /// Queues `value` for the field named `field_name`.
    pub fn push(&mut self, field_name: impl Into<String>, value: impl Into<String>)
    {
        self.values.push(field_name, value);
        self.invalidate_document();
    }

    /// Drops every queued value.
    pub fn clear_values(&mut self)
    {
        self.values.clear();
        self.invalidate_document();
    }

    /// Fetches the project's fields, replacing any previously loaded ones.
    ///
    /// A failed fetch leaves the session `Failed` with no fields; calling this
    /// again retries.
    pub fn load_schema(&mut self) -> Result<&Project, SessionError>
    {
        self.ensure_open()?;
        let url = self.project_url().ok_or(BuildError::MissingProjectID)?;

        self.state = SessionState::SchemaLoading;
        self.project = None;
        self.invalidate_document();

        let loaded = self
            .transport
            .get(&url, None)
            .map_err(SessionError::from)
            .and_then(|body| schema::load_project(&body).map_err(SessionError::from));

        match loaded {
            Ok(project) => {
                info!("Loaded {} fields from {}", project.fields.len(), url);
                self.state = SessionState::SchemaLoaded;
                Ok(&*self.project.insert(project))
            }
            Err(err) => {
                warn!("Failed to load fields from {}: {}", url, err);
                self.state = SessionState::Failed;
                Err(err)
            }
        }
    }

    /// Builds the upload document from the current metadata, fields and values.
    ///
    /// On error no document is kept and a loaded session stays `SchemaLoaded`.
    pub fn build(&mut self) -> Result<&UploadDocument, SessionError>
    {
        self.ensure_open()?;

        let previous = self.state;
        if self.project.is_some() {
            self.state = SessionState::Formatting;
        }

        let built = upload::build(&self.build_request());
        match built {
            Ok(document) => {
                debug!("Built upload document with {} fields", self.fields().len());
                self.state = SessionState::Formatted;
                Ok(&*self.document.insert(document))
            }
            Err(err) => {
                self.document = None;
                self.state = if self.project.is_some() {
                    SessionState::SchemaLoaded
                } else {
                    previous
                };
                Err(err.into())
            }
        }
    }

    /// Posts the document, building it first if needed.
    ///
    /// Creates a new dataset, or appends when a dataset ID was set. Either
    /// outcome ends the session.
    pub fn upload(&mut self) -> Result<Response, SessionError>
    {
        self.ensure_open()?;

        let body = match self.document.as_ref() {
            Some(document) => document.to_json_bytes(),
            None => self.build()?.to_json_bytes(),
        };

        let url = match &self.dataset_id {
            Some(_) => self.config.endpoint("data_sets/append"),
            None => self.upload_url().ok_or(BuildError::MissingProjectID)?,
        };
        let auth = self.basic_auth();

        self.state = SessionState::Uploading;
        self.upload_attempted = true;

        match self.transport.post_json(&url, body, auth.as_ref()) {
            Ok(response) => {
                info!("Uploaded to {} (HTTP {})", url, response.status);
                self.state = SessionState::Uploaded;
                Ok(response)
            }
            Err(err) => {
                warn!("Upload to {} failed: {}", url, err);
                self.state = SessionState::Failed;
                Err(err.into())
            }
        }
    }

    /// Appends the pushed values to the existing dataset `dataset_id`.
    pub fn append(&mut self, dataset_id: impl Into<String>) -> Result<Response, SessionError>
    {
        self.ensure_open()?;
        self.set_dataset_id(dataset_id);
        self.upload()
    }

    /// Asks the service whether the account credentials are valid.
    ///
    /// Returns `Ok(false)` when the service rejects them with HTTP 401 or 403,
    /// and an error for any other failure.
    pub fn check_user(&self) -> Result<bool, SessionError>
    {
        let auth = self.basic_auth().ok_or(BuildError::MissingCredential)?;
        let url = self.config.endpoint("users/myInfo");

        match self.transport.get(&url, Some(&auth)) {
            Ok(_) => Ok(true),
            Err(TransportError::NonSuccessStatus { status: status @ (401 | 403), .. }) => {
                debug!("User check for {} answered HTTP {}", auth.username, status);
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn state(&self) -> SessionState
    {
        self.state
    }

    pub fn config(&self) -> &Configuration
    {
        &self.config
    }

    pub fn project_id(&self) -> Option<&str>
    {
        self.project_id.as_deref()
    }

    pub fn title(&self) -> Option<&str>
    {
        self.title.as_deref()
    }

    pub fn contributor_name(&self) -> Option<&str>
    {
        self.contributor_name.as_deref()
    }

    pub fn credential(&self) -> Option<&Credential>
    {
        self.credential.as_ref()
    }

    pub fn dataset_id(&self) -> Option<&str>
    {
        self.dataset_id.as_deref()
    }

    pub fn project(&self) -> Option<&Project>
    {
        self.project.as_ref()
    }

    /// Loaded fields in the service's order; empty before a successful load.
    pub fn fields(&self) -> &[FieldDescriptor]
    {
        self.project.as_ref().map(|p| p.fields.as_slice()).unwrap_or(&[])
    }

    pub fn values(&self) -> &FieldValues
    {
        &self.values
    }

    /// The last successfully built document, if it is still current.
    pub fn document(&self) -> Option<&UploadDocument>
    {
        self.document.as_ref()
    }

    /// `GET` URL of the project, once a project ID is set.
    pub fn project_url(&self) -> Option<String>
    {
        self.nonblank_project_id()
            .map(|id| self.config.endpoint(&format!("projects/{}", id)))
    }

    /// `POST` URL for a new dataset, once a project ID is set.
    pub fn upload_url(&self) -> Option<String>
    {
        self.nonblank_project_id()
            .map(|id| self.config.endpoint(&format!("projects/{}/jsonDataUpload", id)))
    }

    /// A printable dump of the session for checking data before uploading.
    pub fn report(&self) -> SessionReport<'_, T>
    {
        SessionReport { session: self }
    }

    fn build_request(&self) -> BuildRequest<'_>
    {
        BuildRequest {
            project_id: self.project_id.as_deref(),
            title: self.title.as_deref(),
            credential: self.credential.as_ref(),
            contributor_name: self.contributor_name.as_deref(),
            default_contributor_name: &self.config.contributor_name,
            dataset_id: self.dataset_id.as_deref(),
            fields: self.fields(),
            values: &self.values,
        }
    }

    fn basic_auth(&self) -> Option<BasicAuth>
    {
        match &self.credential {
            Some(Credential::Account { email, password }) => Some(BasicAuth {
                username: email.clone(),
                password: password.clone(),
            }),
            _ => None,
        }
    }

    fn nonblank_project_id(&self) -> Option<&str>
    {
        self.project_id.as_deref().filter(|id| !id.trim().is_empty())
    }

    fn invalidate_document(&mut self)
    {
        if self.document.take().is_some() && self.state == SessionState::Formatted {
            self.state = SessionState::SchemaLoaded;
        }
    }

    fn is_finished(&self) -> bool
    {
        self.state == SessionState::Uploaded || (self.state == SessionState::Failed && self.upload_attempted)
    }

    fn ensure_open(&self) -> Result<(), SessionError>
    {
        if self.is_finished() {
            return Err(SessionError::Finished(self.state));
        }
        Ok(())
    }
}

/// Display adapter returned by [`Session::report`]. Secrets are masked.
pub struct SessionReport<'a, T: Transport>
{
    session: &'a Session<T>,
}

impl<T: Transport> fmt::Display for SessionReport<'_, T>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let s = self.session;
        let unset = "(not set)";

        writeln!(f, "Dataset title:     {}", s.title().unwrap_or(unset))?;
        writeln!(f, "Project ID:        {}", s.project_id().unwrap_or(unset))?;
        if let Some(name) = s.project().and_then(|p| p.name.as_deref()) {
            writeln!(f, "Project name:      {}", name)?;
        }
        match s.credential() {
            Some(Credential::Key(key)) => writeln!(f, "Contributor key:   {}", mask(key))?,
            Some(Credential::Account { email, .. }) => writeln!(f, "Account:           {} (password hidden)", email)?,
            None => writeln!(f, "Credential:        {}", unset)?,
        }
        writeln!(
            f,
            "Contributor name:  {}",
            s.contributor_name()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or(&s.config.contributor_name)
        )?;
        if let Some(dataset_id) = s.dataset_id() {
            writeln!(f, "Append to dataset: {}", dataset_id)?;
        }
        writeln!(f, "GET URL:           {}", s.project_url().as_deref().unwrap_or(unset))?;
        writeln!(f, "Upload URL:        {}", s.upload_url().as_deref().unwrap_or(unset))?;
        writeln!(f, "State:             {:?}", s.state())?;

        match s.document() {
            Some(document) => writeln!(f, "\nUpload data:\n{}", document)?,
            None => writeln!(f, "\nUpload data:       (not built)")?,
        }

        if s.fields().is_empty() {
            return writeln!(f, "\nNo fields loaded.");
        }

        for field in s.fields() {
            writeln!(f, "\nField ID:   {}", field.id)?;
            writeln!(f, "Field name: {} ({})", field.name, field.field_type)?;
            match s.values().get(&field.name) {
                Some(values) if !values.is_empty() => {
                    for value in values {
                        writeln!(f, "  {}", value)?;
                    }
                }
                _ => writeln!(f, "  no data")?,
            }
        }

        Ok(())
    }
}

fn mask(secret: &str) -> String
{
    let shown: String = secret.chars().take(2).collect();
    format!("{}{}", shown, "*".repeat(secret.chars().count().saturating_sub(2)))
}
