mod common;

use std::net::TcpListener;

use common::{config_for, OneShotServer};
use isense_client::errors::TransportError;
use isense_client::{BasicAuth, HttpTransport, Session, Transport};

fn account() -> BasicAuth
{
    BasicAuth {
        username: "student@example.com".to_string(),
        password: "hunter2".to_string(),
    }
}

#[test]
fn test_post_sends_json_headers_and_body()
{
    let server = OneShotServer::start(200, "OK", r#"{ "id": 7001 }"#);
    let transport = HttpTransport::new(&server.config()).unwrap();
    let url = server.url("projects/929/jsonDataUpload");

    let response = transport
        .post_json(&url, br#"{"title":"t"}"#.to_vec(), None)
        .expect("Upload should succeed");

    assert_eq!(response.status, 200);
    assert_eq!(response.dataset_id().as_deref(), Some("7001"));

    let request = server.received();
    assert_eq!(request.request_line, "POST /api/v1/projects/929/jsonDataUpload HTTP/1.1");
    assert_eq!(request.header("accept"), Some("application/json"));
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.header("accept-charset"), Some("utf-8"));
    assert_eq!(request.header("authorization"), None);
    assert_eq!(request.body, br#"{"title":"t"}"#);
}

#[test]
fn test_account_is_sent_as_basic_auth()
{
    let server = OneShotServer::start(200, "OK", "{}");
    let transport = HttpTransport::new(&server.config()).unwrap();
    let url = server.url("data_sets/append");

    transport.post_json(&url, b"{}".to_vec(), Some(&account())).unwrap();

    let request = server.received();
    // base64 of "student@example.com:hunter2"
    assert_eq!(
        request.header("authorization"),
        Some("Basic c3R1ZGVudEBleGFtcGxlLmNvbTpodW50ZXIy")
    );
    assert!(!String::from_utf8_lossy(&request.body).contains("hunter2"));
}

#[test]
fn test_get_returns_body()
{
    let server = OneShotServer::start(200, "OK", r#"{ "name": "Olsen Hall Weather" }"#);
    let transport = HttpTransport::new(&server.config()).unwrap();

    let body = transport.get(&server.url("projects/929"), None).unwrap();

    assert_eq!(body, br#"{ "name": "Olsen Hall Weather" }"#);
    let request = server.received();
    assert_eq!(request.request_line, "GET /api/v1/projects/929 HTTP/1.1");
    assert_eq!(request.header("accept"), Some("application/json"));
}

#[test]
fn test_non_success_status_keeps_body()
{
    let server = OneShotServer::start(404, "Not Found", r#"{ "error": "Project not found" }"#);
    let transport = HttpTransport::new(&server.config()).unwrap();
    let url = server.url("projects/12345");

    match transport.get(&url, None) {
        Err(TransportError::NonSuccessStatus { url: failed, status, body }) => {
            assert_eq!(failed, url);
            assert_eq!(status, 404);
            assert!(body.contains("Project not found"));
        }
        other => panic!("Expected NonSuccessStatus error, got {:?}", other),
    }
    server.received();
}

#[test]
fn test_silent_server_times_out()
{
    // Connections queue in the backlog but nothing ever answers
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let config = config_for(listener.local_addr().unwrap());
    let transport = HttpTransport::new(&config).unwrap();
    let url = config.endpoint("projects/929");

    match transport.get(&url, None) {
        Err(TransportError::Timeout { url: failed }) => assert_eq!(failed, url),
        other => panic!("Expected Timeout error, got {:?}", other),
    }
    drop(listener);
}

#[test]
fn test_refused_connection_is_connect_failed()
{
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let config = config_for(addr);
    let transport = HttpTransport::new(&config).unwrap();

    match transport.post_json(&config.endpoint("data_sets/append"), b"{}".to_vec(), None) {
        Err(TransportError::ConnectFailed { details, .. }) => assert!(!details.is_empty()),
        other => panic!("Expected ConnectFailed error, got {:?}", other),
    }
}

#[test]
fn test_check_user_over_http()
{
    let server = OneShotServer::start(401, "Unauthorized", r#"{ "msg": "Unauthorized" }"#);
    let mut session = Session::new(server.config()).unwrap();
    session.set_account("student@example.com", "wrong");

    assert!(!session.check_user().unwrap());

    let request = server.received();
    assert_eq!(request.request_line, "GET /api/v1/users/myInfo HTTP/1.1");
    assert!(request
        .header("authorization")
        .map_or(false, |value| value.starts_with("Basic ")));
}
