//! HTTP adapter: one `POST /<name>` request in, one reply out.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::thread;

use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{debug, info, warn};

use dashboard_config::ListenEndpoint;

use crate::dispatch::{
    CommandEnvelope, DispatchError, Dispatcher, Reply, ReplySink, STATUS_BAD_REQUEST,
    STATUS_METHOD_NOT_ALLOWED, Transport,
};

use super::{TRANSPORT_TARGET, TransportError};

/// Reply sink bound to a single HTTP request.
///
/// The first delivery answers the request; later deliveries fail with
/// `DispatchError::Delivery`. A request dropped without a reply is answered
/// with `500` by the server.
pub struct HttpSink {
    request: Mutex<Option<Request>>,
}

impl HttpSink {
    fn new(request: Request) -> Self {
        Self {
            request: Mutex::new(Some(request)),
        }
    }
}

impl ReplySink for HttpSink {
    fn transport(&self) -> Transport {
        Transport::Http
    }

    fn deliver(&self, reply: Reply) -> Result<(), DispatchError> {
        let body = reply.encode_body()?;
        let request = self
            .request
            .lock()
            .map_err(|_| DispatchError::delivery("http sink lock poisoned"))?
            .take()
            .ok_or_else(|| DispatchError::delivery("reply already sent"))?;

        let has_body = !body.is_empty();
        let mut response = Response::from_data(body).with_status_code(reply.status());
        if has_body {
            response = response.with_header(json_content_type()?);
        }
        request
            .respond(response)
            .map_err(|error| DispatchError::delivery_with_source("http write failed", error))
    }
}

fn json_content_type() -> Result<Header, DispatchError> {
    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .map_err(|()| DispatchError::delivery("invalid content type header"))
}

/// Bound HTTP server not yet serving requests.
pub(crate) struct HttpListener {
    addr: SocketAddr,
    server: Server,
}

impl HttpListener {
    pub(crate) fn bind(endpoint: &ListenEndpoint) -> Result<Self, TransportError> {
        let addr = endpoint.resolve()?;
        let server =
            Server::http(addr).map_err(|source| TransportError::BindHttp { addr, source })?;
        let addr = server.server_addr().to_ip().unwrap_or(addr);
        Ok(Self { addr, server })
    }

    pub(crate) fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serves requests on a background thread, each on its own thread.
    pub(crate) fn start(self, dispatcher: Dispatcher) -> HttpHandle {
        let server = Arc::new(self.server);
        let accept = Arc::clone(&server);
        let addr = self.addr;
        let handle = thread::spawn(move || run_request_loop(&accept, addr, &dispatcher));
        HttpHandle {
            addr,
            server,
            handle: Some(handle),
        }
    }
}

/// Handle to the background HTTP server.
pub(crate) struct HttpHandle {
    addr: SocketAddr,
    server: Arc<Server>,
    handle: Option<thread::JoinHandle<()>>,
}

impl HttpHandle {
    pub(crate) fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub(crate) fn shutdown(&self) {
        self.server.unblock();
    }

    pub(crate) fn join(mut self) -> Result<(), TransportError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| TransportError::ThreadPanic {
                transport: Transport::Http,
            }),
            None => Ok(()),
        }
    }
}

impl Drop for HttpHandle {
    fn drop(&mut self) {
        self.server.unblock();
    }
}

fn run_request_loop(server: &Server, addr: SocketAddr, dispatcher: &Dispatcher) {
    info!(
        target: TRANSPORT_TARGET,
        transport = %Transport::Http,
        addr = %addr,
        "http listener active"
    );
    for request in server.incoming_requests() {
        if dispatcher.root_context().is_cancelled() {
            break;
        }
        let dispatcher = dispatcher.clone();
        thread::spawn(move || handle_request(&dispatcher, request));
    }
    info!(
        target: TRANSPORT_TARGET,
        transport = %Transport::Http,
        "http listener stopped"
    );
}

fn handle_request(dispatcher: &Dispatcher, mut request: Request) {
    let method = request.method().clone();
    let name = route_name(request.url()).to_owned();
    debug!(
        target: TRANSPORT_TARGET,
        method = %method,
        name,
        "http request received"
    );

    let mut payload = Vec::new();
    let read = request.as_reader().read_to_end(&mut payload);
    let sink = HttpSink::new(request);

    if method != Method::Post {
        respond(&sink, Reply::empty(STATUS_METHOD_NOT_ALLOWED));
        return;
    }
    if let Err(error) = read {
        warn!(
            target: TRANSPORT_TARGET,
            name,
            error = %error,
            "failed to read http request body"
        );
        respond(&sink, Reply::empty(STATUS_BAD_REQUEST));
        return;
    }

    match CommandEnvelope::from_route(&name, payload) {
        Ok(envelope) => dispatcher.dispatch_command(&envelope, &sink),
        Err(error) => {
            info!(
                target: TRANSPORT_TARGET,
                error = %error,
                "misdirected http request"
            );
            respond(&sink, Reply::misdirected());
        }
    }
}

fn respond(sink: &HttpSink, reply: Reply) {
    if let Err(error) = sink.deliver(reply) {
        warn!(
            target: TRANSPORT_TARGET,
            transport = %Transport::Http,
            error = %error,
            "failed to deliver reply"
        );
    }
}

/// Routing key carried by a request target such as `/echo?verbose`.
fn route_name(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.trim_start_matches('/')
}
