//! Minimal clients for driving both transports over real sockets.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::{Duration, Instant};

use serde_json::Value;
use tungstenite::{Error as WsError, Message, WebSocket};

const IO_TIMEOUT: Duration = Duration::from_secs(2);

/// Blocking WebSocket client.
pub struct WsClient {
    socket: WebSocket<TcpStream>,
}

impl WsClient {
    /// Connects and completes the handshake.
    #[must_use]
    pub fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).expect("connect websocket");
        stream
            .set_read_timeout(Some(IO_TIMEOUT))
            .expect("set read timeout");
        let (socket, _) =
            tungstenite::client(format!("ws://{addr}/"), stream).expect("websocket handshake");
        Self { socket }
    }

    /// Sends one text message.
    pub fn send(&mut self, text: &str) {
        self.socket
            .send(Message::text(text.to_owned()))
            .expect("send websocket message");
    }

    /// Waits for the next reply envelope.
    pub fn receive(&mut self) -> Value {
        let deadline = Instant::now() + IO_TIMEOUT;
        while Instant::now() < deadline {
            match self.socket.read().expect("read websocket reply") {
                Message::Text(text) => {
                    return serde_json::from_str(text.as_str()).expect("reply is JSON");
                }
                Message::Close(_) => panic!("connection closed while awaiting a reply"),
                _ => {}
            }
        }
        panic!("no websocket reply within {IO_TIMEOUT:?}");
    }

    /// Sends `text` and returns the reply.
    pub fn exchange(&mut self, text: &str) -> Value {
        self.send(text);
        self.receive()
    }

    /// Returns `true` once the server has closed the connection.
    pub fn is_closed_by_server(&mut self) -> bool {
        let deadline = Instant::now() + IO_TIMEOUT;
        while Instant::now() < deadline {
            match self.socket.read() {
                Ok(Message::Close(_)) => return true,
                Ok(_) => {}
                Err(WsError::Io(error)) if error.kind() == std::io::ErrorKind::WouldBlock => {}
                Err(_) => return true,
            }
        }
        false
    }
}

/// Status line and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl HttpReply {
    /// Body parsed as JSON; `None` when empty.
    pub fn json(&self) -> Option<Value> {
        if self.body.is_empty() {
            None
        } else {
            Some(serde_json::from_str(&self.body).expect("HTTP body is JSON"))
        }
    }
}

/// Issues one HTTP/1.0 request and reads the full response.
pub fn http_request(addr: SocketAddr, method: &str, path: &str, body: &str) -> HttpReply {
    let mut stream = TcpStream::connect(addr).expect("connect http");
    stream
        .set_read_timeout(Some(IO_TIMEOUT))
        .expect("set read timeout");
    let request = format!(
        "{method} {path} HTTP/1.0\r\nHost: {addr}\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    stream
        .write_all(request.as_bytes())
        .expect("write http request");

    let mut raw = String::new();
    stream.read_to_string(&mut raw).expect("read http response");
    parse_response(&raw)
}

fn parse_response(raw: &str) -> HttpReply {
    let (head, body) = raw.split_once("\r\n\r\n").expect("response has a header block");
    let mut lines = head.lines();
    let status = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|code| code.parse().ok())
        .expect("response has a status line");
    let content_type = lines.find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.eq_ignore_ascii_case("content-type")
            .then(|| value.trim().to_owned())
    });
    HttpReply {
        status,
        content_type,
        body: body.to_owned(),
    }
}
