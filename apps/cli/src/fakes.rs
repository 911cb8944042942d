//! Stand-in resources for the demo.

use serde_json::{Value, json};
use warden_resource::{BoxError, Capabilities, Manageable};

/// Where a fake resource should fail, if anywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// Both hooks succeed.
    #[default]
    None,
    /// `open` fails.
    OnOpen,
    /// `close` fails.
    OnClose,
}

/// Returned by a fake resource told to fail.
#[derive(Debug, thiserror::Error)]
#[error("{service} refused the connection")]
pub struct ConnectError {
    /// Which fake failed.
    pub service: &'static str,
}

/// Pretend database connection.
#[derive(Debug, Default)]
pub struct FakeDatabase {
    failure: FailureMode,
    connected: bool,
}

impl FakeDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure(mut self, failure: FailureMode) -> Self {
        self.failure = failure;
        self
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn query(&self, sql: &str) -> &'static str {
        tracing::info!(sql, "Running query");
        "query result"
    }
}

impl Manageable for FakeDatabase {
    fn capabilities(&self) -> Capabilities {
        Capabilities::Both
    }

    fn open(&mut self) -> Result<(), BoxError> {
        if self.failure == FailureMode::OnOpen {
            return Err(Box::new(ConnectError { service: "database" }));
        }
        self.connected = true;
        tracing::info!("Database connection established.");
        Ok(())
    }

    fn close(&mut self) -> Result<(), BoxError> {
        if self.failure == FailureMode::OnClose {
            return Err(Box::new(ConnectError { service: "database" }));
        }
        self.connected = false;
        tracing::info!("Database connection closed.");
        Ok(())
    }
}

/// Pretend API client session.
#[derive(Debug, Default)]
pub struct FakeApi {
    failure: FailureMode,
    session_open: bool,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure(mut self, failure: FailureMode) -> Self {
        self.failure = failure;
        self
    }

    pub fn is_session_open(&self) -> bool {
        self.session_open
    }

    pub fn fetch_data(&self) -> Value {
        tracing::info!("Fetching data from API...");
        json!({ "data": 123 })
    }
}

impl Manageable for FakeApi {
    fn capabilities(&self) -> Capabilities {
        Capabilities::Both
    }

    fn open(&mut self) -> Result<(), BoxError> {
        if self.failure == FailureMode::OnOpen {
            return Err(Box::new(ConnectError { service: "api" }));
        }
        self.session_open = true;
        tracing::info!("API session started.");
        Ok(())
    }

    fn close(&mut self) -> Result<(), BoxError> {
        if self.failure == FailureMode::OnClose {
            return Err(Box::new(ConnectError { service: "api" }));
        }
        self.session_open = false;
        tracing::info!("API session ended.");
        Ok(())
    }
}
