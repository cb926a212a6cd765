use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::backend::DeviceBuffer;
use crate::batch::{Batch, Request, SampleInput, SampleResult};
use crate::error::{ConfigurationError, InvariantError, Result};
use crate::identity::ModelIdentity;
use crate::shape::Shape;
use crate::unit::{ModelUnit, ModelUnitFactory, PrefixCatalog, UnitConfig};

/// Canonical name of the composite's single output tensor.
///
/// Callers bind their output buffer under this name regardless of which
/// suffix variants execute in a given call.
pub const OUTPUT_NAME: &str = "output";

/// Per-variant suffix stage state, built once at construction and never
/// mutated afterwards.
struct SuffixStage<B> {
    unit: Arc<dyn ModelUnit<B>>,
    output_name: String,
    /// Per-sample output element count, batch dimension excluded.
    output_size: usize,
}

/// Reused device scratch, mutated by the stages on every forward call.
/// Guarded by a mutex so only one call is ever in flight over it.
struct Scratch<B> {
    /// The prefix stage's dedicated output buffers. The prefix stage
    /// must never write into the caller's final buffer, whose layout is
    /// suffix-defined.
    prefix_outputs: HashMap<String, B>,
    /// One reusable input buffer per suffix variant.
    suffix_inputs: HashMap<ModelIdentity, B>,
}

/// Composite model unit that computes a shared layer prefix once for a
/// mixed-variant batch, then fans the intermediate result out to
/// per-variant suffix computations.
///
/// When several co-served variants share their initial layers, running
/// each variant's full network separately recomputes that prefix for
/// every variant. This composite runs the prefix stage once over the
/// whole batch, partitions the intermediate outputs by variant, and
/// runs each variant's suffix stage on its partition against a disjoint
/// slice of the caller's output buffer.
///
/// The composite implements [`ModelUnit`] itself, so a scheduler can
/// drive it exactly like a leaf unit, or nest it inside another
/// composite.
///
/// # Output contract
///
/// [`ModelUnit::output_shapes`] declares a single `"output"` tensor of
/// `[max_batch, max_suffix_output_size]`, sized for the largest suffix
/// variant. Callers always bind a buffer of at least
/// `batch_size * max_suffix_output_size` elements under
/// [`OUTPUT_NAME`]; the composite hands each suffix stage its own
/// sub-slice. [`ModelUnit::output_buffers`] is always empty: the
/// composite never satisfies in-place output from its own storage.
///
/// # Example
///
/// ```ignore
/// use teppan::prefix::{PrefixSharingModel, OUTPUT_NAME};
///
/// let composite = PrefixSharingModel::new(&factory, &catalog, &sessions, 8, 16)?;
/// let mut batch = Batch::new(execution_id, composite.max_batch());
/// // ... stage preprocessed requests ...
/// batch.bind_output(OUTPUT_NAME, output_buffer);
/// composite.forward(&mut batch).await?;
/// for result in batch.results() {
///     // match to requests by result.request_id(), never by position
/// }
/// ```
pub struct PrefixSharingModel<B: DeviceBuffer> {
    prefix_unit: Arc<dyn ModelUnit<B>>,
    suffix: HashMap<ModelIdentity, SuffixStage<B>>,
    scratch: Mutex<Scratch<B>>,
    max_suffix_output_size: usize,
    max_batch: usize,
}

impl<B: DeviceBuffer> std::fmt::Debug for PrefixSharingModel<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefixSharingModel")
            .field("suffix_variants", &self.suffix.len())
            .field("max_suffix_output_size", &self.max_suffix_output_size)
            .field("max_batch", &self.max_batch)
            .finish_non_exhaustive()
    }
}

impl<B: DeviceBuffer> PrefixSharingModel<B> {
    /// Builds a composite co-serving `sessions` at the given capacity.
    ///
    /// The first session is the reference: the composite's prefix
    /// length is the minimum shared prefix length between the reference
    /// and every other session. Fails with
    /// [`ConfigurationError::NoSharedPrefix`] when no positive shared
    /// length exists, and with
    /// [`ConfigurationError::MultipleOutputs`] when any stage unit
    /// exposes other than exactly one output tensor.
    pub fn new(
        factory: &dyn ModelUnitFactory<B>,
        catalog: &dyn PrefixCatalog,
        sessions: &[ModelIdentity],
        batch: usize,
        max_batch: usize,
    ) -> Result<Self> {
        if sessions.len() < 2 {
            return Err(ConfigurationError::GroupTooSmall(sessions.len()).into());
        }
        let reference = &sessions[0];
        let mut prefix_length: i64 = -1;
        for other in &sessions[1..] {
            let length = catalog.shared_prefix_length(reference, other);
            if prefix_length < 0 || length < prefix_length {
                prefix_length = length;
            }
        }
        if prefix_length <= 0 {
            return Err(ConfigurationError::NoSharedPrefix.into());
        }
        let prefix_length = prefix_length as usize;

        let prefix_config = UnitConfig::new(reference.clone(), batch, max_batch)
            .with_end_index(prefix_length);
        let prefix_unit = factory.create(&prefix_config)?;
        let (prefix_output_name, prefix_output_shape) =
            single_output(reference, prefix_unit.output_shapes())?;
        let prefix_outputs = prefix_unit.output_buffers();
        // The binding shape excludes the batch dimension; each suffix
        // unit sizes its own input buffer from it.
        let binding_shape = prefix_output_shape.without_batch();

        let mut suffix = HashMap::new();
        let mut suffix_inputs = HashMap::new();
        let mut max_suffix_output_size = 0;
        for session in sessions {
            let config = UnitConfig::new(session.clone(), batch, max_batch)
                .with_start_index(prefix_length)
                .with_input_binding(prefix_output_name.clone(), binding_shape.clone());
            let unit = factory.create(&config)?;
            let (output_name, output_shape) = single_output(session, unit.output_shapes())?;
            let output_size = output_shape.num_elements_from(1);
            if output_size > max_suffix_output_size {
                max_suffix_output_size = output_size;
            }
            suffix_inputs.insert(session.clone(), unit.create_input_buffer()?);
            suffix.insert(
                session.clone(),
                SuffixStage {
                    unit,
                    output_name,
                    output_size,
                },
            );
        }

        info!(
            prefix_length,
            prefix_output_shape = %prefix_output_shape,
            max_suffix_output_size,
            "prefix sharing composite ready"
        );

        Ok(Self {
            prefix_unit,
            suffix,
            scratch: Mutex::new(Scratch {
                prefix_outputs,
                suffix_inputs,
            }),
            max_suffix_output_size,
            max_batch,
        })
    }

    fn stage(&self, session: &ModelIdentity) -> Result<&SuffixStage<B>> {
        self.suffix
            .get(session)
            .ok_or_else(|| InvariantError::SessionOutsideGroup(session.clone()).into())
    }
}

fn single_output(
    session: &ModelIdentity,
    outputs: HashMap<String, Shape>,
) -> Result<(String, Shape)> {
    let count = outputs.len();
    match outputs.into_iter().next() {
        Some(entry) if count == 1 => Ok(entry),
        _ => Err(ConfigurationError::MultipleOutputs {
            session: session.clone(),
            count,
        }
        .into()),
    }
}

#[async_trait]
impl<B: DeviceBuffer> ModelUnit<B> for PrefixSharingModel<B> {
    /// Raw input encoding is identical for all variants up to the
    /// shared prefix, so the composite's input is the prefix stage's.
    fn input_shape(&self) -> Shape {
        self.prefix_unit.input_shape()
    }

    fn output_shapes(&self) -> HashMap<String, Shape> {
        HashMap::from([(
            OUTPUT_NAME.to_string(),
            Shape::new(vec![self.max_batch, self.max_suffix_output_size]),
        )])
    }

    fn max_batch(&self) -> usize {
        self.max_batch
    }

    fn create_input_buffer(&self) -> Result<B> {
        self.prefix_unit.create_input_buffer()
    }

    /// Always empty: callers must supply their own output buffer per
    /// call.
    fn output_buffers(&self) -> HashMap<String, B> {
        HashMap::new()
    }

    async fn preprocess(&self, request: &mut Request<B>) -> Result<()> {
        self.prefix_unit.preprocess(request).await
    }

    /// Runs the prefix stage once over the whole batch, then each
    /// suffix stage over its partition.
    ///
    /// Fails atomically: any stage failure propagates with the batch's
    /// result list left empty and the caller's output bindings intact.
    /// Result list order is partition order, not submission order;
    /// match results to requests by id and index.
    async fn forward(&self, batch: &mut Batch<B>) -> Result<()> {
        for input in batch.inputs() {
            if !self.suffix.contains_key(input.session()) {
                return Err(InvariantError::SessionOutsideGroup(input.session().clone()).into());
            }
        }
        let suffix_output = batch
            .output_buffer(OUTPUT_NAME)
            .ok_or_else(|| InvariantError::MissingOutputBinding(OUTPUT_NAME.to_string()))?
            .clone();
        let required = batch.size() * self.max_suffix_output_size;
        if suffix_output.len() < required {
            return Err(InvariantError::OutputBufferTooSmall {
                required,
                declared: suffix_output.len(),
            }
            .into());
        }

        // The stages write through reused scratch buffers; the lock
        // keeps a second forward call from interleaving on them.
        let scratch = self.scratch.lock().await;

        debug!(
            batch_id = batch.batch_id(),
            size = batch.size(),
            "forward prefix stage"
        );
        let caller_outputs = batch.replace_output_buffers(scratch.prefix_outputs.clone());
        let prefix_outcome = self.prefix_unit.forward(batch).await;
        batch.replace_output_buffers(caller_outputs);
        prefix_outcome?;

        let prefix_results = batch.take_results();
        if prefix_results.len() != batch.size() {
            return Err(InvariantError::ResultCountMismatch {
                expected: batch.size(),
                produced: prefix_results.len(),
            }
            .into());
        }

        // Partition prefix outputs by session, in first-encounter
        // order, preserving prefix output order within each partition.
        let mut order: Vec<ModelIdentity> = Vec::new();
        let mut partitions: HashMap<ModelIdentity, Batch<B>> = HashMap::new();
        for result in prefix_results {
            let session = result.session().clone();
            let partition = match partitions.entry(session.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let stage = self
                        .suffix
                        .get(&session)
                        .ok_or_else(|| InvariantError::SessionOutsideGroup(session.clone()))?;
                    let mut derived = Batch::new(batch.batch_id(), stage.unit.max_batch());
                    let input_buffer = scratch
                        .suffix_inputs
                        .get(&session)
                        .ok_or_else(|| InvariantError::SessionOutsideGroup(session.clone()))?;
                    derived.set_input_buffer(input_buffer.clone());
                    order.push(session.clone());
                    entry.insert(derived)
                }
            };
            partition.push_input(SampleInput::new(
                result.output().clone(),
                session,
                result.request_id(),
                result.request_index(),
            ))?;
        }

        // Each partition gets a disjoint window of the caller's buffer,
        // offset by the partitions already processed.
        let mut offset = 0;
        let mut collected: Vec<SampleResult<B>> = Vec::with_capacity(batch.size());
        for session in &order {
            let Some(mut partition) = partitions.remove(session) else {
                continue;
            };
            let stage = self.stage(session)?;
            let count = partition.size() * stage.output_size;
            if offset + count > suffix_output.len() {
                return Err(InvariantError::OutputBufferTooSmall {
                    required: offset + count,
                    declared: suffix_output.len(),
                }
                .into());
            }
            partition.bind_output(stage.output_name.clone(), suffix_output.slice(offset, count));
            offset += count;
            debug!(
                session = %session,
                size = partition.size(),
                "forward suffix stage"
            );
            stage.unit.forward(&mut partition).await?;
            collected.extend(partition.take_results());
        }

        if collected.len() != batch.size() {
            return Err(InvariantError::ResultCountMismatch {
                expected: batch.size(),
                produced: collected.len(),
            }
            .into());
        }
        batch.set_results(collected);
        Ok(())
    }

    /// Postprocessing is variant-specific; delegates to the suffix
    /// stage owning the request's session.
    async fn postprocess(&self, request: &mut Request<B>) -> Result<()> {
        let stage = self.stage(request.session())?;
        stage.unit.postprocess(request).await
    }
}
