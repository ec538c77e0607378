//! Cache invalidation shared by containers holding derived data.

/// Anything that memoizes data derived from an open store (name sets,
/// region lookups, reduced meshes, ...) should implement this.
pub trait InvalidateCache {
    /// Invalidate *all* internal caches so future queries recompute correctly.
    fn invalidate_cache(&mut self);
}
