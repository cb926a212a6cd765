use crate::identity::ModelIdentity;

/// Reports how many initial layers two model variants share.
///
/// The relation is symmetric. A result of zero or below means the two
/// variants share no prefix and cannot be co-served.
pub trait PrefixCatalog: Send + Sync {
    /// Shared prefix length between `a` and `b`, in layers.
    fn shared_prefix_length(&self, a: &ModelIdentity, b: &ModelIdentity) -> i64;
}
