//! Test support: canned fixtures and scripted fakes
//!
//! Enabled for this crate's own tests and, for downstream crates, through the
//! `test-support` feature.
//!
//! ```rust,ignore
//! use stackctl_core::bedrock::{ClaudeRequest, invoke_claude};
//! use stackctl_core::testing::{Stubber, stub_invoke_claude};
//!
//! let body = ClaudeRequest::new("hello").to_bytes()?;
//! let stubber = Stubber::new(vec![stub_invoke_claude(body, None)]);
//!
//! assert_eq!(invoke_claude(&stubber, "hello").await?, "A fake response");
//! stubber.verify_all_stubs_called();
//! ```

mod fake_stacks;
mod stubber;
mod stubs;

pub use fake_stacks::{FailAt, FakeStackApi, StackCall};
pub use stubber::{Stub, StubError, Stubber};
pub use stubs::{FAKE_COMPLETION, stub_invoke_claude};
