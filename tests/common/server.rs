use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread::{self, JoinHandle};

use isense_client::Configuration;

/// One request as received on the wire.
#[derive(Debug, Clone)]
pub struct ReceivedRequest
{
    /// e.g. `POST /api/v1/projects/929/jsonDataUpload HTTP/1.1`
    pub request_line: String,
    /// Header lines, names lowercased
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ReceivedRequest
{
    pub fn header(&self, name: &str) -> Option<&str>
    {
        self.headers
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A local HTTP server answering exactly one request with a canned response.
pub struct OneShotServer
{
    addr: SocketAddr,
    handle: JoinHandle<ReceivedRequest>,
}

impl OneShotServer
{
    pub fn start(status: u16, reason: &str, body: &str) -> Self
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reason,
            body.len(),
            body
        );

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let request = read_request(&mut reader);

            let mut stream = reader.into_inner();
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            request
        });

        Self { addr, handle }
    }

    pub fn config(&self) -> Configuration
    {
        config_for(self.addr)
    }

    pub fn url(&self, path: &str) -> String
    {
        self.config().endpoint(path)
    }

    /// Waits for the request to be served and returns it.
    pub fn received(self) -> ReceivedRequest
    {
        self.handle.join().unwrap()
    }
}

/// Configuration pointed at `addr` with one-second timeouts.
pub fn config_for(addr: SocketAddr) -> Configuration
{
    Configuration {
        base_url: format!("http://{}/api/v1", addr),
        timeout_secs: 1,
        connect_timeout_secs: 1,
        ..Default::default()
    }
}

fn read_request(reader: &mut impl BufRead) -> ReceivedRequest
{
    let mut request_line = String::new();
    reader.read_line(&mut request_line).unwrap();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
        }
    }

    let length = headers
        .iter()
        .find(|(name, _)| name == "content-length")
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0; length];
    reader.read_exact(&mut body).unwrap();

    ReceivedRequest {
        request_line: request_line.trim_end().to_string(),
        headers,
        body,
    }
}
