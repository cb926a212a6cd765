use std::fmt;

use serde::{Deserialize, Serialize};

/// Dimensions of a tensor held in a device buffer.
///
/// Dimension `0` is reserved as the batch dimension throughout the
/// crate; per-sample sizing therefore works on the dimensions from `1`
/// onward via [`Shape::num_elements_from`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape(Vec<usize>);

impl Shape {
    /// Creates a shape from its dimensions.
    pub fn new(dims: Vec<usize>) -> Self {
        Self(dims)
    }

    /// The dimensions of this shape.
    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    /// Number of dimensions.
    pub fn ndims(&self) -> usize {
        self.0.len()
    }

    /// Total element count across all dimensions.
    pub fn num_elements(&self) -> usize {
        self.0.iter().product()
    }

    /// Element count of the dimensions from `dim` onward.
    ///
    /// `num_elements_from(1)` is the per-sample element count of a
    /// batched shape.
    pub fn num_elements_from(&self, dim: usize) -> usize {
        self.0.get(dim..).map_or(1, |dims| dims.iter().product())
    }

    /// The same shape with the batch dimension dropped.
    pub fn without_batch(&self) -> Shape {
        Shape(self.0.get(1..).map_or_else(Vec::new, <[usize]>::to_vec))
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Shape(dims)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}
