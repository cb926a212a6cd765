use std::collections::HashMap;

use crate::backend::DeviceBuffer;
use crate::batch::{SampleInput, SampleResult};
use crate::error::{InvariantError, Result};

/// One grouped execution unit of staged samples sharing buffer bindings.
///
/// A batch is transient: the scheduler constructs one per stage
/// invocation, a [`ModelUnit`](crate::unit::ModelUnit) consumes its
/// staged inputs and installs one result per sample, and the batch is
/// discarded once its results have been handed back to their requests.
/// Its size is bounded by the capacity of whichever unit executes it.
#[derive(Debug)]
pub struct Batch<B> {
    batch_id: u64,
    max_batch: usize,
    inputs: Vec<SampleInput<B>>,
    input_buffer: Option<B>,
    output_buffers: HashMap<String, B>,
    results: Vec<SampleResult<B>>,
}

impl<B: DeviceBuffer> Batch<B> {
    /// An empty batch for execution `batch_id`, holding at most
    /// `max_batch` samples.
    pub fn new(batch_id: u64, max_batch: usize) -> Self {
        Self {
            batch_id,
            max_batch,
            inputs: Vec::new(),
            input_buffer: None,
            output_buffers: HashMap::new(),
            results: Vec::new(),
        }
    }

    /// The execution id shared by every stage of one forward call.
    pub fn batch_id(&self) -> u64 {
        self.batch_id
    }

    /// Number of staged samples.
    pub fn size(&self) -> usize {
        self.inputs.len()
    }

    /// Capacity bound of the unit executing this batch.
    pub fn max_batch(&self) -> usize {
        self.max_batch
    }

    /// Stages one sample, enforcing the capacity bound.
    pub fn push_input(&mut self, input: SampleInput<B>) -> Result<()> {
        if self.inputs.len() >= self.max_batch {
            return Err(InvariantError::BatchOverCapacity(self.max_batch).into());
        }
        self.inputs.push(input);
        Ok(())
    }

    /// The staged samples, in staging order.
    pub fn inputs(&self) -> &[SampleInput<B>] {
        &self.inputs
    }

    /// Binds the device buffer batched sample inputs are copied into.
    pub fn set_input_buffer(&mut self, buffer: B) {
        self.input_buffer = Some(buffer);
    }

    /// The bound input buffer, if any.
    pub fn input_buffer(&self) -> Option<&B> {
        self.input_buffer.as_ref()
    }

    /// Binds an output buffer under `name`.
    pub fn bind_output(&mut self, name: impl Into<String>, buffer: B) {
        self.output_buffers.insert(name.into(), buffer);
    }

    /// The output buffer bound under `name`, if any.
    pub fn output_buffer(&self, name: &str) -> Option<&B> {
        self.output_buffers.get(name)
    }

    /// Swaps the whole output binding map, returning the previous one.
    ///
    /// Lets a composite redirect a stage into its own storage and
    /// restore the caller's bindings afterwards.
    pub fn replace_output_buffers(&mut self, buffers: HashMap<String, B>) -> HashMap<String, B> {
        std::mem::replace(&mut self.output_buffers, buffers)
    }

    /// Installs the batch's result list.
    pub fn set_results(&mut self, results: Vec<SampleResult<B>>) {
        self.results = results;
    }

    /// The installed results. Order is not submission order; match by
    /// request id and index.
    pub fn results(&self) -> &[SampleResult<B>] {
        &self.results
    }

    /// Moves the result list out, leaving the batch without results.
    pub fn take_results(&mut self) -> Vec<SampleResult<B>> {
        std::mem::take(&mut self.results)
    }
}
