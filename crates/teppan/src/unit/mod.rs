//! # Model Units
//!
//! The capability surface the batching layer consumes: a [`ModelUnit`]
//! executes one layer span of one variant on one device, a
//! [`ModelUnitFactory`] provisions units from [`UnitConfig`]
//! layer-range descriptions, and a [`PrefixCatalog`] answers how many
//! initial layers two variants share.

mod catalog;
mod config;
mod core_trait;

pub use catalog::PrefixCatalog;
pub use config::{InputBinding, UnitConfig};
pub use core_trait::{ModelUnit, ModelUnitFactory};
