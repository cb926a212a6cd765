use super::DeviceBuffer;
use candle_core::Tensor;

/// Candle tensors act as device buffers through their rank-1 flat view.
///
/// Tensors used as buffers must be contiguous and rank-1; `narrow` on
/// dimension 0 then gives a zero-copy sub-range view over the same
/// storage.
impl DeviceBuffer for Tensor {
    fn len(&self) -> usize {
        self.elem_count()
    }

    fn slice(&self, offset: usize, len: usize) -> Self {
        self.narrow(0, offset, len)
            .unwrap_or_else(|e| panic!("slice [{}, {}) of {:?}: {}", offset, offset + len, self.dims(), e))
    }
}
