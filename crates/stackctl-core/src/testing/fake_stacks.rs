//! Scripted in-memory [`StackApi`]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::{CoreError, Result};
use crate::stacks::{StackApi, StackStatus, StackSummary};

/// A call the fake received, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackCall {
    Create { name: String, template_body: String },
    List(Vec<StackStatus>),
    Delete(String),
    Describe(String),
}

/// Mutating or listing call that should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Create,
    List,
    Delete,
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<StackCall>,
    describe_script: VecDeque<Option<StackStatus>>,
    describes_served: usize,
}

/// Fake stack service
///
/// Describe answers come from a script; the last entry repeats once the
/// script runs out, and an empty script means the stack does not exist.
#[derive(Debug, Default)]
pub struct FakeStackApi {
    state: Mutex<State>,
    stacks: Vec<StackSummary>,
    fail_at: Option<FailAt>,
    fail_describe_after: Option<usize>,
}

impl FakeStackApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statuses returned by successive describe calls
    pub fn with_describe_script(self, script: Vec<Option<StackStatus>>) -> Self {
        self.state.lock().unwrap().describe_script = script.into();
        self
    }

    /// Stacks returned by list calls
    pub fn with_stacks(mut self, stacks: Vec<StackSummary>) -> Self {
        self.stacks = stacks;
        self
    }

    pub fn fail_at(mut self, step: FailAt) -> Self {
        self.fail_at = Some(step);
        self
    }

    /// Let `n` describe calls succeed, then fail every one after
    pub fn fail_describe_after(mut self, n: usize) -> Self {
        self.fail_describe_after = Some(n);
        self
    }

    /// Every call received so far
    pub fn calls(&self) -> Vec<StackCall> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, call: StackCall) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn check(&self, step: FailAt, operation: &str) -> Result<()> {
        if self.fail_at == Some(step) {
            return Err(injected(operation));
        }
        Ok(())
    }
}

fn injected(operation: &str) -> CoreError {
    CoreError::Service {
        operation: operation.to_string(),
        code: Some("InjectedFault".to_string()),
        message: "injected failure".to_string(),
    }
}

#[async_trait]
impl StackApi for FakeStackApi {
    async fn create_stack(&self, name: &str, template_body: &str) -> Result<Option<String>> {
        self.record(StackCall::Create {
            name: name.to_string(),
            template_body: template_body.to_string(),
        });
        self.check(FailAt::Create, "CreateStack")?;
        Ok(Some(format!("arn:aws:cloudformation:fake:000000000000:stack/{name}/1")))
    }

    async fn list_stacks(&self, status_filter: &[StackStatus]) -> Result<Vec<StackSummary>> {
        self.record(StackCall::List(status_filter.to_vec()));
        self.check(FailAt::List, "ListStacks")?;
        Ok(self.stacks.clone())
    }

    async fn delete_stack(&self, name: &str) -> Result<()> {
        self.record(StackCall::Delete(name.to_string()));
        self.check(FailAt::Delete, "DeleteStack")
    }

    async fn describe_stack_status(&self, name: &str) -> Result<Option<StackStatus>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(StackCall::Describe(name.to_string()));

        if let Some(limit) = self.fail_describe_after
            && state.describes_served >= limit
        {
            return Err(injected("DescribeStacks"));
        }
        state.describes_served += 1;

        let status = if state.describe_script.len() > 1 {
            state.describe_script.pop_front().flatten()
        } else {
            state.describe_script.front().cloned().flatten()
        };
        Ok(status)
    }
}
