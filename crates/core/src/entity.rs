//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Every stored record (product, warehouse, inventory line) is an entity. Stores
/// key their collections by `Self::Id`.
pub trait Entity {
    /// Strongly-typed entity identifier.
    ///
    /// `Ord` keeps listings in a stable order across backends.
    type Id: Clone + Eq + Ord + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
