//! Scenario world shared by the server behavioural suites.

use std::cell::RefCell;
use std::sync::Arc;

use rstest::fixture;
use serde_json::Value;

use crate::bootstrap::{BootstrapError, ConfigLoader, bootstrap_with};
use crate::process::{RunningServer, start};

use super::{HttpReply, RecordingHealthReporter, TestConfigLoader, WsClient, http_request};

/// State carried between steps.
pub struct DashboardWorld {
    loader: TestConfigLoader,
    pub reporter: Arc<RecordingHealthReporter>,
    server: Option<RunningServer>,
    pub bootstrap_error: Option<BootstrapError>,
    client: Option<WsClient>,
    pub ws_replies: Vec<Value>,
    pub http_replies: Vec<HttpReply>,
    pub closed_by_server: Option<bool>,
}

impl DashboardWorld {
    fn new(loader: TestConfigLoader) -> Self {
        Self {
            loader,
            reporter: Arc::new(RecordingHealthReporter::default()),
            server: None,
            bootstrap_error: None,
            client: None,
            ws_replies: Vec::new(),
            http_replies: Vec::new(),
            closed_by_server: None,
        }
    }

    /// Replaces the loader before the server starts.
    pub fn use_loader(&mut self, loader: TestConfigLoader) {
        self.loader = loader;
    }

    /// Bootstraps and, on success, starts the server.
    pub fn start_server(&mut self) {
        let loader: &dyn ConfigLoader = &self.loader;
        match bootstrap_with(loader, self.reporter.clone()) {
            Ok(server) => {
                self.server = Some(start(&server).expect("start transports"));
            }
            Err(error) => self.bootstrap_error = Some(error),
        }
    }

    /// Stops the server and records whether the open connection was closed.
    pub fn stop_server(&mut self) {
        let server = self.server.take().expect("server running");
        server.stop().expect("stop server");
        if let Some(client) = self.client.as_mut() {
            self.closed_by_server = Some(client.is_closed_by_server());
        }
    }

    fn server(&self) -> &RunningServer {
        self.server.as_ref().expect("server running")
    }

    /// Opens the streaming connection used by later steps.
    pub fn connect(&mut self) {
        let addr = self.server().stream_addr();
        self.client = Some(WsClient::connect(addr));
    }

    /// Sends a raw envelope over the streaming connection.
    pub fn send_ws(&mut self, envelope: &str) {
        if self.client.is_none() {
            self.connect();
        }
        let reply = self
            .client
            .as_mut()
            .expect("websocket connected")
            .exchange(envelope);
        self.ws_replies.push(reply);
    }

    /// Issues an HTTP request against the running server.
    pub fn send_http(&mut self, method: &str, name: &str, body: &str) {
        let addr = self.server().http_addr();
        let reply = http_request(addr, method, &format!("/{name}"), body);
        self.http_replies.push(reply);
    }

    pub fn last_ws_reply(&self) -> &Value {
        self.ws_replies.last().expect("a websocket reply")
    }

    pub fn last_http_reply(&self) -> &HttpReply {
        self.http_replies.last().expect("an http reply")
    }
}

impl Drop for DashboardWorld {
    fn drop(&mut self) {
        if let Some(server) = self.server.take() {
            let _ = server.stop();
        }
    }
}

#[fixture]
pub fn world() -> RefCell<DashboardWorld> {
    RefCell::new(DashboardWorld::new(TestConfigLoader::new()))
}
