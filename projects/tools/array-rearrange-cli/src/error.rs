use array_rearrange::RearrangeError;
use array_rearrange_common::allocate::AllocateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Rearrange(#[from] RearrangeError),
    #[error(transparent)]
    Allocate(#[from] AllocateError),
    #[error("Invalid {name} list entry '{entry}': {reason}")]
    InvalidList {
        name: &'static str,
        entry: String,
        reason: String,
    },
    /// A benchmark scenario produced output which does not match the expected arrangement.
    #[error("Verification failed for {scenario}: {details}")]
    Verification {
        scenario: String,
        details: String,
    },
}
