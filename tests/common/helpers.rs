use isense_client::{Configuration, Session};
use serde_json::Value;

use super::fake::FakeTransport;

pub const BASE_URL: &str = "http://isense.test/api/v1";
pub const PROJECT_ID: &str = "929";

/// A project with one field of every type.
pub const PROJECT_BODY: &str = r#"{
    "id": 929,
    "name": "Olsen Hall Weather",
    "featured": false,
    "fields": [
        { "id": "4242", "name": "Timestamp", "type": 1, "unit": "" },
        { "id": "4243", "name": "Number", "type": 2, "unit": "m" },
        { "id": "4244", "name": "Text", "type": 3, "unit": "" },
        { "id": "4245", "name": "Latitude", "type": 4, "unit": "deg" },
        { "id": "4246", "name": "Longitude", "type": 5, "unit": "deg" }
    ]
}"#;

pub fn test_config() -> Configuration
{
    Configuration {
        base_url: BASE_URL.to_string(),
        ..Default::default()
    }
}

pub fn project_url(project_id: &str) -> String
{
    format!("{BASE_URL}/projects/{project_id}")
}

/// A session with project, title and key set, whose transport serves `body`
/// for the project URL. The schema is not loaded yet.
pub fn session_with_project(body: &str) -> (Session<FakeTransport>, FakeTransport)
{
    let transport = FakeTransport::new();
    transport.fake_body(&project_url(PROJECT_ID), body);

    let session = Session::with_transport(test_config(), transport.clone()).with_project(
        PROJECT_ID,
        "Weather 2014-06-26",
        "",
        "classroom-key",
    );

    (session, transport)
}

/// Pushes one value for every field of [`PROJECT_BODY`].
pub fn push_one_of_each(session: &mut Session<FakeTransport>)
{
    session.push("Timestamp", "2014-06-26T15:04:05Z");
    session.push("Number", "42");
    session.push("Text", "sunny");
    session.push("Latitude", "42.654761");
    session.push("Longitude", "-71.326674");
}

pub fn parse_json(bytes: &[u8]) -> Value
{
    serde_json::from_slice(bytes).expect("Body should be valid JSON")
}
