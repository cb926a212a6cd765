use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::backend::DeviceBuffer;
use crate::batch::{Batch, Request};
use crate::error::Result;
use crate::shape::Shape;
use crate::unit::UnitConfig;

/// One model variant's execution capability.
///
/// A `ModelUnit` runs some contiguous span of a network's layers on one
/// device. Leaf implementations wrap an actual execution engine; the
/// prefix-sharing composite implements the same trait so a scheduler can
/// nest or substitute it without special-casing.
///
/// # Forward contract
///
/// [`ModelUnit::forward`] consumes the batch's staged inputs, writes into
/// the batch's bound output buffers, and installs exactly one
/// [`SampleResult`](crate::batch::SampleResult) per staged input. Each
/// result views the sample's slice of the output buffer and carries the
/// originating request's linkage through unchanged. Result list order is
/// an implementation artifact; results are matched to requests by id and
/// index, never by position.
#[async_trait]
pub trait ModelUnit<B: DeviceBuffer>: Send + Sync {
    /// Shape of one batch of raw input, batch dimension included.
    fn input_shape(&self) -> Shape;

    /// The output tensors this unit produces, by name.
    fn output_shapes(&self) -> HashMap<String, Shape>;

    /// Largest batch this unit accepts.
    fn max_batch(&self) -> usize;

    /// Allocates a reusable device buffer sized for this unit's input.
    fn create_input_buffer(&self) -> Result<B>;

    /// The unit's own pre-bound output buffers, by name.
    ///
    /// Empty when the unit does not support in-place output and the
    /// caller must always bind its own buffers.
    fn output_buffers(&self) -> HashMap<String, B>;

    /// Encodes a request's raw input into its device input.
    ///
    /// Safe to call concurrently with [`ModelUnit::forward`].
    async fn preprocess(&self, request: &mut Request<B>) -> Result<()>;

    /// Runs the forward pass over every staged sample in `batch`.
    async fn forward(&self, batch: &mut Batch<B>) -> Result<()>;

    /// Decodes a request's result back into caller-facing form.
    async fn postprocess(&self, request: &mut Request<B>) -> Result<()>;
}

/// Builds model units from layer-range configurations.
///
/// A factory is bound to one device at construction; the configuration
/// carries no placement information.
pub trait ModelUnitFactory<B: DeviceBuffer>: Send + Sync {
    /// Creates the unit described by `config`, or fails if the variant
    /// cannot be provisioned.
    fn create(&self, config: &UnitConfig) -> Result<Arc<dyn ModelUnit<B>>>;
}
