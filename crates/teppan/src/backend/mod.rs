//! # Device Buffer Backend
//!
//! This module provides a unified interface over device memory regions,
//! allowing the composite batching logic to slice and share buffers in a
//! backend-agnostic manner.
//!
//! ## Feature Flags
//!
//! - `candle`: Enables the Candle tensor backend
//!
//! Users work against the [`DeviceBuffer`] trait and enable the feature
//! flag for their tensor library; the batching code never names a
//! concrete backend.

mod core_trait;

#[cfg_attr(docsrs, doc(cfg(feature = "candle")))]
#[cfg(feature = "candle")]
/// Candle device buffer implementation.
///
/// Only available when the `candle` feature flag is enabled. Implements
/// [`DeviceBuffer`] for candle-core's `Tensor`, treating a contiguous
/// rank-1 tensor as a flat device region.
pub mod candle;

pub use core_trait::*;

#[cfg(test)]
/// Mock buffer implementation.
///
/// Tracks the viewed window instead of holding storage.
pub(crate) mod mock_buffer;
