//! WebSocket adapter for the streaming transport.
//!
//! Each accepted connection completes the WebSocket handshake on its own
//! thread and then reads messages in a loop, dispatching them one at a time.
//! The socket sits behind a mutex shared with the connection's
//! [`WebSocketSink`]; the reader holds it only for one short poll so that
//! streaming handlers writing from other threads are never starved.

use std::io;
use std::net::TcpStream;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::{debug, info, warn};
use tungstenite::protocol::CloseFrame;
use tungstenite::protocol::frame::coding::CloseCode;
use tungstenite::{Error as WsError, Message, WebSocket};

use crate::dispatch::{DispatchError, Dispatcher, Reply, ReplySink, Transport};

use super::{ConnectionHandler, TRANSPORT_TARGET};

const READ_POLL: Duration = Duration::from_millis(50);
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

type SharedSocket = Arc<Mutex<WebSocket<TcpStream>>>;

/// Reply sink bound to one WebSocket connection.
#[derive(Clone)]
pub struct WebSocketSink {
    socket: SharedSocket,
}

impl WebSocketSink {
    fn lock(&self) -> Result<MutexGuard<'_, WebSocket<TcpStream>>, DispatchError> {
        self.socket
            .lock()
            .map_err(|_| DispatchError::delivery("websocket lock poisoned"))
    }
}

impl ReplySink for WebSocketSink {
    fn transport(&self) -> Transport {
        Transport::Streaming
    }

    fn deliver(&self, reply: Reply) -> Result<(), DispatchError> {
        let encoded = reply.encode_envelope()?;
        let text = String::from_utf8(encoded)
            .map_err(|error| DispatchError::delivery_with_source("reply is not UTF-8", error))?;
        self.lock()?
            .send(Message::text(text))
            .map_err(|error| DispatchError::delivery_with_source("websocket write failed", error))
    }
}

/// Connection handler speaking WebSocket.
pub(crate) struct WebSocketConnectionHandler {
    dispatcher: Dispatcher,
}

impl WebSocketConnectionHandler {
    pub(crate) fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}

impl ConnectionHandler for WebSocketConnectionHandler {
    fn handle(&self, stream: TcpStream) {
        let peer = stream
            .peer_addr()
            .map_or_else(|_| String::from("unknown"), |addr| addr.to_string());
        if let Err(error) = stream.set_read_timeout(Some(HANDSHAKE_TIMEOUT)) {
            warn!(
                target: TRANSPORT_TARGET,
                peer,
                error = %error,
                "failed to set websocket handshake timeout"
            );
            return;
        }
        let socket = match tungstenite::accept(stream) {
            Ok(socket) => socket,
            Err(error) => {
                warn!(
                    target: TRANSPORT_TARGET,
                    peer,
                    error = %error,
                    "websocket handshake failed"
                );
                return;
            }
        };
        if let Err(error) = socket.get_ref().set_read_timeout(Some(READ_POLL)) {
            warn!(
                target: TRANSPORT_TARGET,
                peer,
                error = %error,
                "failed to set websocket read timeout"
            );
            return;
        }
        debug!(target: TRANSPORT_TARGET, peer, "websocket connection opened");

        let sink = WebSocketSink {
            socket: Arc::new(Mutex::new(socket)),
        };
        serve_connection(&self.dispatcher, &sink, &peer);
        debug!(target: TRANSPORT_TARGET, peer, "websocket connection closed");
    }
}

enum Poll {
    Message(Vec<u8>),
    Idle,
    Closed,
}

fn serve_connection(dispatcher: &Dispatcher, sink: &WebSocketSink, peer: &str) {
    loop {
        if dispatcher.root_context().is_cancelled() {
            close(sink, peer);
            return;
        }
        match poll(sink, peer) {
            Poll::Message(bytes) => dispatcher.dispatch(&bytes, sink),
            Poll::Idle => {}
            Poll::Closed => return,
        }
    }
}

fn poll(sink: &WebSocketSink, peer: &str) -> Poll {
    let Ok(mut socket) = sink.lock() else {
        return Poll::Closed;
    };
    match socket.read() {
        Ok(Message::Text(text)) => Poll::Message(text.as_bytes().to_vec()),
        Ok(Message::Binary(bytes)) => Poll::Message(bytes.to_vec()),
        Ok(Message::Close(_)) => Poll::Idle,
        Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => Poll::Idle,
        Err(WsError::Io(error))
            if matches!(
                error.kind(),
                io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
            ) =>
        {
            Poll::Idle
        }
        Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => Poll::Closed,
        Err(error) => {
            info!(
                target: TRANSPORT_TARGET,
                peer,
                error = %error,
                "websocket connection failed"
            );
            Poll::Closed
        }
    }
}

fn close(sink: &WebSocketSink, peer: &str) {
    let Ok(mut socket) = sink.lock() else {
        return;
    };
    let frame = CloseFrame {
        code: CloseCode::Away,
        reason: "server shutting down".into(),
    };
    if let Err(error) = socket.close(Some(frame)).and_then(|()| socket.flush()) {
        debug!(
            target: TRANSPORT_TARGET,
            peer,
            error = %error,
            "websocket close failed"
        );
    }
}
