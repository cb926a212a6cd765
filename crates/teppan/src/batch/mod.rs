//! # Batch Data Model
//!
//! The units flowing through a forward call: a [`Request`] is one
//! inference call bound to a model variant, a [`Batch`] groups staged
//! [`SampleInput`]s behind shared buffer bindings for one stage
//! invocation, and a [`SampleResult`] ties a produced output slice back
//! to its originating request.

#[allow(clippy::module_inception)]
mod batch;
mod request;
mod sample;

pub use batch::Batch;
pub use request::Request;
pub use sample::{SampleInput, SampleResult};
