use serde::{Deserialize, Serialize};

use crate::identity::ModelIdentity;
use crate::shape::Shape;

/// Layer-range configuration a [`ModelUnit`](crate::unit::ModelUnit) is
/// built from.
///
/// Describes which contiguous layer span the unit computes, its batch
/// capacity, and optionally the binding of its input to another unit's
/// output. Immutable once the unit is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitConfig {
    session: ModelIdentity,
    batch: usize,
    max_batch: usize,
    start_index: Option<usize>,
    end_index: Option<usize>,
    input: Option<InputBinding>,
}

impl UnitConfig {
    /// A configuration covering the whole network of `session` at the
    /// given capacity.
    pub fn new(session: ModelIdentity, batch: usize, max_batch: usize) -> Self {
        Self {
            session,
            batch,
            max_batch,
            start_index: None,
            end_index: None,
            input: None,
        }
    }

    /// Starts the layer span at `index` instead of the first layer.
    pub fn with_start_index(mut self, index: usize) -> Self {
        self.start_index = Some(index);
        self
    }

    /// Ends the layer span before `index` instead of the last layer.
    pub fn with_end_index(mut self, index: usize) -> Self {
        self.end_index = Some(index);
        self
    }

    /// Binds the unit's input to another unit's named output. `shape`
    /// excludes the batch dimension.
    pub fn with_input_binding(mut self, name: impl Into<String>, shape: Shape) -> Self {
        self.input = Some(InputBinding {
            name: name.into(),
            shape,
        });
        self
    }

    /// The variant this unit executes.
    pub fn session(&self) -> &ModelIdentity {
        &self.session
    }

    /// Preferred batch size.
    pub fn batch(&self) -> usize {
        self.batch
    }

    /// Largest admissible batch size.
    pub fn max_batch(&self) -> usize {
        self.max_batch
    }

    /// First layer of the span, when not the network's first.
    pub fn start_index(&self) -> Option<usize> {
        self.start_index
    }

    /// Past-the-end layer of the span, when not the network's last.
    pub fn end_index(&self) -> Option<usize> {
        self.end_index
    }

    /// The upstream input binding, when the unit's input is another
    /// unit's output rather than raw request data.
    pub fn input(&self) -> Option<&InputBinding> {
        self.input.as_ref()
    }
}

/// Binding of a unit's input to an upstream unit's output tensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputBinding {
    name: String,
    shape: Shape,
}

impl InputBinding {
    /// The upstream output tensor's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Per-sample shape of the bound input, batch dimension excluded.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}
