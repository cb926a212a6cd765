use thiserror::Error;

use crate::identity::ModelIdentity;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
///
/// Construction problems and runtime contract violations are kept as
/// separate categories so callers can tell a misconfigured group apart
/// from a bug in the calling code. Failures raised by an underlying
/// model unit are wrapped in [`Error::Execution`] and abort the whole
/// call they occurred in; no partial results are committed and no retry
/// is attempted internally.
#[derive(Debug, Error)]
pub enum Error {
    /// The composite could not be built from the given group.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A caller broke a contract that construction guarantees holds.
    #[error(transparent)]
    Invariant(#[from] InvariantError),

    /// A model unit's own execution failed.
    #[error("model execution failed: {0}")]
    Execution(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wraps a collaborator failure for propagation.
    pub fn execution<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Execution(err.into())
    }
}

/// Construction-time failure. Fatal and non-retryable: the group as
/// configured can never be co-served.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Prefix sharing needs at least two sessions to share anything.
    #[error("prefix sharing requires at least two sessions, got {0}")]
    GroupTooSmall(usize),

    /// No positive shared prefix length exists across the group.
    #[error("no prefix layers shared among sessions")]
    NoSharedPrefix,

    /// A stage unit exposes other than exactly one output tensor.
    #[error("session {session} exposes {count} output tensors, exactly one is supported")]
    MultipleOutputs {
        /// The offending session.
        session: ModelIdentity,
        /// How many outputs it exposes.
        count: usize,
    },
}

/// Runtime contract violation by the caller, or a bug.
#[derive(Debug, Error)]
pub enum InvariantError {
    /// A request's session was never part of the configured group.
    #[error("session {0} is not part of the configured group")]
    SessionOutsideGroup(ModelIdentity),

    /// The batch has no output buffer bound under the expected name.
    #[error("batch has no output bound under `{0}`")]
    MissingOutputBinding(String),

    /// The caller-supplied output buffer cannot hold the batch's results.
    #[error("output buffer holds {declared} elements, at least {required} required")]
    OutputBufferTooSmall {
        /// Elements the call needs.
        required: usize,
        /// Elements the caller bound.
        declared: usize,
    },

    /// An attempt to stage more samples than the executing unit allows.
    #[error("batch is full: capacity {0}")]
    BatchOverCapacity(usize),

    /// A stage produced a result list that does not cover its inputs.
    #[error("stage produced {produced} results for {expected} inputs")]
    ResultCountMismatch {
        /// Inputs staged into the stage.
        expected: usize,
        /// Results it handed back.
        produced: usize,
    },
}
