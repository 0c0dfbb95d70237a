//! Core traits for tridbscan

/// Trait for radius-limited neighborhood queries over an indexed point set
pub trait NeighborhoodQuery {
    /// Handle identifying one element of the searched set
    type Key: Copy + Eq;

    /// Find all elements within `radius` of `query`.
    ///
    /// Results never include `query` itself and are sorted ascending by
    /// distance. Each entry carries its straight-line distance to `query`.
    fn neighbors_within(&self, query: Self::Key, radius: f64) -> Vec<(Self::Key, f64)>;

    /// Count the elements within `radius` of `query`
    fn count_within(&self, query: Self::Key, radius: f64) -> usize {
        self.neighbors_within(query, radius).len()
    }
}
