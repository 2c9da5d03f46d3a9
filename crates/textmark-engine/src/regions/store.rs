//! The injected region collection.
//!
//! The engine never owns the list of regions; it talks to whatever store
//! the host wires in through this trait. Insertion order is creation order
//! and is the order regions materialize in.

use super::{Region, RegionId};
use crate::labels::LabelState;

/// The store interface the engine consumes: creation, exact-offset lookup,
/// and iteration. Nothing else leaks through.
pub trait RegionStore {
    /// Creates a region and returns its id. The new region is appended,
    /// preserving creation order.
    fn create_region(
        &mut self,
        start_offset: usize,
        end_offset: usize,
        text: String,
        states: Vec<LabelState>,
    ) -> RegionId;

    /// Exact-offset lookup, used to avoid creating a duplicate region for
    /// an identical selection. Node paths are derived data and play no
    /// part in the match.
    fn find_region(&self, start_offset: usize, end_offset: usize) -> Option<RegionId>;

    fn get(&self, id: RegionId) -> Option<&Region>;

    /// All regions in insertion order.
    fn regions(&self) -> &[Region];

    fn regions_mut(&mut self) -> &mut [Region];

    /// Removes a region permanently; it will never be materialized again.
    fn remove(&mut self, id: RegionId) -> Option<Region>;
}

/// The default store: a plain vector in creation order.
#[derive(Debug, Default)]
pub struct InMemoryRegionStore {
    regions: Vec<Region>,
}

impl InMemoryRegionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RegionStore for InMemoryRegionStore {
    fn create_region(
        &mut self,
        start_offset: usize,
        end_offset: usize,
        text: String,
        states: Vec<LabelState>,
    ) -> RegionId {
        let region = Region::new(start_offset, end_offset, text, states);
        let id = region.id();
        self.regions.push(region);
        id
    }

    fn find_region(&self, start_offset: usize, end_offset: usize) -> Option<RegionId> {
        self.regions
            .iter()
            .find(|r| r.start_offset == start_offset && r.end_offset == end_offset)
            .map(|r| r.id())
    }

    fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id() == id)
    }

    fn regions(&self) -> &[Region] {
        &self.regions
    }

    fn regions_mut(&mut self) -> &mut [Region] {
        &mut self.regions
    }

    fn remove(&mut self, id: RegionId) -> Option<Region> {
        let idx = self.regions.iter().position(|r| r.id() == id)?;
        Some(self.regions.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_preserves_insertion_order() {
        let mut store = InMemoryRegionStore::new();
        let first = store.create_region(0, 3, "the".to_string(), vec![]);
        let second = store.create_region(4, 9, "quick".to_string(), vec![]);

        let ids: Vec<RegionId> = store.regions().iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![first, second]);
    }

    #[test]
    fn find_region_matches_exact_offsets_only() {
        let mut store = InMemoryRegionStore::new();
        let id = store.create_region(4, 9, "quick".to_string(), vec![]);

        assert_eq!(store.find_region(4, 9), Some(id));
        assert_eq!(store.find_region(4, 8), None);
        assert_eq!(store.find_region(5, 9), None);
    }

    #[test]
    fn removed_regions_are_gone() {
        let mut store = InMemoryRegionStore::new();
        let id = store.create_region(0, 3, "the".to_string(), vec![]);

        let removed = store.remove(id).expect("should remove");
        assert_eq!(removed.id(), id);
        assert!(store.get(id).is_none());
        assert!(store.regions().is_empty());
        assert_eq!(store.remove(id), None);
    }
}
