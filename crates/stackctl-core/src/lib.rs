//! # stackctl-core
//!
//! Shared engine for the `stackctl` CLI. The remote orchestration service owns
//! every stack state transition; this crate only issues requests, waits for a
//! terminal status, and reports what happened.
//!
//! ## Layers
//!
//! - **API seams** - [`stacks::StackApi`] and [`bedrock::ModelRuntime`] are the
//!   injected capabilities. The real implementations wrap the AWS SDK clients;
//!   tests substitute fakes.
//! - **Workflows** - "create and wait", "delete and wait", and list, composed
//!   from the seam calls in [`stacks::workflows`].
//! - **Progress** - the poll loop in [`progress`] with optional callbacks for
//!   spinners.
//! - **Config** - TOML profiles in [`config`].
//! - **Testing** - stub fixtures and fakes in `testing`, behind the
//!   `test-support` feature.
//!
//! ## Example
//!
//! ```rust,ignore
//! use stackctl_core::stacks::{CloudFormationApi, workflows};
//! use stackctl_core::WaitOptions;
//!
//! let sdk_config = aws_config::load_from_env().await;
//! let api = CloudFormationApi::new(&sdk_config);
//!
//! workflows::create_stack_and_wait(
//!     &api,
//!     "my-stack",
//!     "template.yaml".as_ref(),
//!     &WaitOptions::default(),
//!     None,
//! )
//! .await?;
//! ```

pub mod bedrock;
pub mod config;
pub mod error;
mod aws_error;
pub mod progress;
pub mod stacks;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use config::{Config, ConfigError, Profile};
pub use error::{CoreError, Result};
pub use progress::{ProgressCallback, ProgressEvent, WaitOptions, WaitTarget, wait_for_stack};
pub use stacks::{StackApi, StackStatus, StackSummary};
