//! # Teppan
//!
//! Prefix-sharing batched inference: when several model variants share
//! an identical initial span of layers, compute that shared prefix once
//! per mixed batch and fan the intermediate result out to per-variant
//! suffix computations.
//!
//! ## Overview
//!
//! This library provides the composite orchestration for a GPU serving
//! backend that co-schedules multiple variants of the same base model.
//! It discovers the common prefix length at setup time, provisions
//! prefix and suffix sub-computations with consistent buffer shapes,
//! and at request time splits a mixed-variant batch into one prefix
//! execution and multiple suffix executions over disjoint slices of a
//! shared output buffer, reassembling per-request results with their
//! identity linkage intact.
//!
//! ## Architecture
//!
//! The library is built around a few key abstractions:
//!
//! ### Assumptions
//!
//! Regardless of backend used, teppan reserves the `0th` tensor
//! dimension as the batch dimension; per-sample sizing works on the
//! remaining dimensions.
//!
//! ### Capability Traits
//!
//! The [`backend::DeviceBuffer`] trait abstracts a device memory region
//! with zero-copy sub-range views and shared ownership. The
//! [`unit::ModelUnit`] trait is the execution capability of one layer
//! span of one variant; leaf engines implement it, and
//! [`prefix::PrefixSharingModel`] implements it too, so composites can
//! be nested or substituted transparently by a scheduler. Construction
//! consumes a [`unit::ModelUnitFactory`] and a [`unit::PrefixCatalog`].
//!
//! ### Data Model
//!
//! A [`batch::Request`] is one inference call bound to one variant. A
//! [`batch::Batch`] groups staged samples behind shared buffer
//! bindings for one stage invocation. A [`batch::SampleResult`] ties a
//! produced output slice back to its originating request; result list
//! order is an implementation artifact, so consumers match by request
//! id and index, never by position.
//!
//! ## Features
//!
//! - **candle** - Enables the candle device buffer backend
//!
//! ## Concurrency
//!
//! A composite's reused scratch buffers admit one forward call at a
//! time; concurrent calls on the same instance serialize on an internal
//! lock. Preprocessing never touches that lock and may run concurrently
//! with a forward pass, provided the underlying unit's preprocessing
//! allows it.

mod error;
mod identity;
mod shape;

pub mod backend;
pub mod batch;
pub mod prefix;
pub mod unit;

pub use error::{ConfigurationError, Error, InvariantError, Result};
pub use identity::ModelIdentity;
pub use shape::Shape;
