//! # Prefix-Sharing Composite
//!
//! A module for amortizing shared computation across co-served model
//! variants.
//!
//! ## Overview
//!
//! When several model variants share an identical initial sequence of
//! layers, a serving backend can compute that shared prefix once for a
//! mixed batch of requests and fan the intermediate result out to
//! per-variant suffix computations, instead of running each variant's
//! full network separately. [`PrefixSharingModel`] implements that
//! decomposition behind the same [`ModelUnit`](crate::unit::ModelUnit)
//! capability a leaf execution engine exposes, so schedulers drive both
//! interchangeably.
//!
//! ## Key Properties
//!
//! - **Setup-time planning**: the shared prefix length is the minimum
//!   pairwise length reported by the catalog; prefix and suffix units
//!   are provisioned with consistent buffer shapes.
//! - **Disjoint output windows**: each suffix partition writes into its
//!   own offset slice of the caller's output buffer, sized for the
//!   largest variant.
//! - **Identity-linked results**: every result carries its originating
//!   request's id and index; list order is partition order, never
//!   submission order.
//! - **Atomic failure**: any stage failure aborts the whole call with
//!   no partial results committed.

mod composite;

pub use composite::{OUTPUT_NAME, PrefixSharingModel};
