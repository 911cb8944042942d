//! Shared test doubles for scope integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use warden_resource::{BoxError, Capabilities, Manageable, RecordingObserver, ResourceScope};

/// Error a probe returns when told to fail.
#[derive(Debug, thiserror::Error)]
#[error("connection refused by {0}")]
pub struct ConnectError(pub String);

/// A lifecycle call observed by a probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Open(String),
    Close(String),
}

/// Ordered log of hook calls shared between probes.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Call>>>);

impl Journal {
    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn opens(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Open(name) => Some(name),
                Call::Close(_) => None,
            })
            .collect()
    }

    pub fn closes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Close(name) => Some(name),
                Call::Open(_) => None,
            })
            .collect()
    }

    fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }
}

/// Resource that writes every hook call to a journal.
#[derive(Debug)]
pub struct Probe {
    pub label: String,
    journal: Journal,
    capabilities: Capabilities,
    fail_open: bool,
    fail_close: bool,
}

impl Probe {
    pub fn new(label: impl Into<String>, journal: &Journal) -> Self {
        Self {
            label: label.into(),
            journal: journal.clone(),
            capabilities: Capabilities::Both,
            fail_open: false,
            fail_close: false,
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }
}

impl Manageable for Probe {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn open(&mut self) -> Result<(), BoxError> {
        self.journal.push(Call::Open(self.label.clone()));
        if self.fail_open {
            return Err(Box::new(ConnectError(self.label.clone())));
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), BoxError> {
        self.journal.push(Call::Close(self.label.clone()));
        if self.fail_close {
            return Err(Box::new(ConnectError(self.label.clone())));
        }
        Ok(())
    }
}

/// A scope wired to a fresh recorder.
pub fn recorded_scope() -> (ResourceScope, RecordingObserver) {
    let recorder = RecordingObserver::new();
    let scope = ResourceScope::enter(Arc::new(recorder.clone()));
    (scope, recorder)
}
