//! Infrastructure stacks: the API seam, status model and workflows

pub mod api;
pub mod aws;
pub mod status;
pub mod workflows;

pub use api::{StackApi, StackSummary};
pub use aws::CloudFormationApi;
pub use status::StackStatus;
pub use workflows::{
    create_stack, create_stack_and_wait, delete_stack, delete_stack_and_wait,
    generate_stack_name, list_stacks, read_template,
};
