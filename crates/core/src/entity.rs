//! Entity trait: identity + continuity across state changes.

/// Minimal interface for a stored record with a stable identity.
///
/// The record store keys every collection operation on this identifier.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
