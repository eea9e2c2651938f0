//! Stub dispatch harness
//!
//! A [`Stubber`] holds an ordered queue of [`Stub`]s. Every call pops the next
//! stub, checks that the operation and input are the ones the test expected,
//! then answers with the canned output or the injected error.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::Mutex;

use crate::bedrock::{InvokeModelRequest, InvokeModelResponse, ModelRuntime};
use crate::error::{CoreError, Result};

/// Error a stub raises instead of returning its output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubError {
    pub code: String,
    pub message: String,
}

impl StubError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    fn into_core_error(self, operation: &str) -> CoreError {
        CoreError::Service {
            operation: operation.to_string(),
            code: Some(self.code),
            message: self.message,
        }
    }
}

/// One expected call: operation, expected input, canned output, optional error
#[derive(Debug, Clone)]
pub struct Stub<I, O> {
    pub operation_name: String,
    pub input: I,
    pub output: O,
    pub error: Option<StubError>,
}

/// Replays stubs in order and checks each call against them
#[derive(Debug)]
pub struct Stubber<I, O> {
    stubs: Mutex<VecDeque<Stub<I, O>>>,
}

impl<I, O> Stubber<I, O>
where
    I: PartialEq + Debug,
{
    pub fn new(stubs: Vec<Stub<I, O>>) -> Self {
        Self {
            stubs: Mutex::new(stubs.into()),
        }
    }

    /// Number of stubs not yet consumed
    pub fn remaining(&self) -> usize {
        self.stubs.lock().unwrap().len()
    }

    /// Answer a call with the next stub
    ///
    /// # Panics
    ///
    /// When no stub is left, or the operation or input differ from the stub.
    pub fn dispatch(&self, operation: &str, input: &I) -> Result<O> {
        let stub = self
            .stubs
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected {operation} call: no stubs left"));

        assert_eq!(
            stub.operation_name, operation,
            "called {operation} but the next stub is for {}",
            stub.operation_name
        );
        assert_eq!(&stub.input, input, "{operation} input did not match the stub");

        match stub.error {
            Some(err) => Err(err.into_core_error(operation)),
            None => Ok(stub.output),
        }
    }

    /// # Panics
    ///
    /// When any queued stub was never called.
    pub fn verify_all_stubs_called(&self) {
        let remaining = self.remaining();
        assert_eq!(remaining, 0, "{remaining} stub(s) were never called");
    }
}

#[async_trait]
impl ModelRuntime for Stubber<InvokeModelRequest, InvokeModelResponse> {
    async fn invoke_model(&self, request: InvokeModelRequest) -> Result<InvokeModelResponse> {
        self.dispatch("InvokeModel", &request)
    }
}
