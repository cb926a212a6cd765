use std::fmt::Debug;

/// The trait that must be fulfilled by any device memory backend.
///
/// A `DeviceBuffer` is a view over a region of device memory measured in
/// elements. Cloning a buffer shares ownership of the underlying region
/// rather than copying it, and [`DeviceBuffer::slice`] produces a
/// zero-copy view of a sub-range. Writes performed through any view are
/// visible through every other view of the same region.
pub trait DeviceBuffer: Debug + Clone + Send + Sync + 'static {
    /// Number of elements addressable through this view.
    fn len(&self) -> usize;

    /// Whether this view is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A zero-copy view of `len` elements starting at `offset`.
    ///
    /// Offsets are relative to this view, not to the underlying region.
    /// Implementations panic when the range falls outside the view;
    /// callers are expected to bounds-check first.
    fn slice(&self, offset: usize, len: usize) -> Self;
}
