//! Lazily-allocated block storage behind an indirection map.
//!
//! Elements live in fixed-size heap blocks addressed through [`BlockMap`],
//! an array of optional block slots.  A slot stays empty until the first
//! write lands in it, so regions of the virtual flat address space the
//! cursors never touch cost no allocations.
//!
//! Cells are `MaybeUninit<T>` and carry no liveness information of their
//! own: the cursor layer decides which virtual indices hold live elements
//! and must move values out (or drop them in place) before their block goes
//! away.  Dropping a [`BlockMap`] frees block memory without running any
//! element destructors.

use core::mem::MaybeUninit;

/// Number of element cells per block.
pub(crate) const BLOCK_LEN: usize = 64;

/// Number of block slots in a freshly constructed map.
pub(crate) const INITIAL_MAP_LEN: usize = 4;

/// Splits a virtual flat index into `(slot, offset)`.
///
/// `BLOCK_LEN` is a power of two, so this compiles to a shift and a mask.
#[inline(always)]
pub(crate) fn split(virtual_index: usize) -> (usize, usize) {
    (virtual_index / BLOCK_LEN, virtual_index % BLOCK_LEN)
}

/// A fixed-capacity storage unit for up to [`BLOCK_LEN`] elements.
pub(crate) struct Block<T> {
    cells: [MaybeUninit<T>; BLOCK_LEN],
}

impl<T> Block<T> {
    fn boxed() -> Box<Self> {
        // An array of `MaybeUninit` is valid in any state.
        Box::new(Block {
            cells: unsafe { MaybeUninit::uninit().assume_init() },
        })
    }
}

/// The indirection array of block slots.
///
/// The map exclusively owns every allocated block.  Replacing a map drops
/// all of its blocks unconditionally; blocks are never shared or handed
/// over to another map.
pub(crate) struct BlockMap<T> {
    slots: Vec<Option<Box<Block<T>>>>,
}

impl<T> BlockMap<T> {
    /// Creates a map of `slot_count` empty slots.
    pub(crate) fn with_slot_count(slot_count: usize) -> Self {
        let mut slots = Vec::with_capacity(slot_count);
        slots.resize_with(slot_count, || None);
        Self { slots }
    }

    /// Number of block slots in the map.
    #[inline(always)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Size of the virtual flat address space covered by this map.
    #[inline(always)]
    pub(crate) fn flat_len(&self) -> usize {
        self.slots.len() * BLOCK_LEN
    }

    /// Returns `true` if `slot` holds an allocated block.
    #[cfg(test)]
    pub(crate) fn is_allocated(&self, slot: usize) -> bool {
        self.slots[slot].is_some()
    }

    /// Writes `value` into the cell at `virtual_index`, allocating the
    /// slot's block first if it is empty.
    ///
    /// The cell must be vacant; writing over a live element leaks it.
    ///
    /// # Panics
    /// Panics if `virtual_index` is outside `[0, flat_len())`.
    pub(crate) fn write(&mut self, virtual_index: usize, value: T) {
        let (slot, offset) = split(virtual_index);
        let block = self.slots[slot].get_or_insert_with(Block::boxed);
        block.cells[offset].write(value);
    }

    /// Moves the element out of the cell at `virtual_index`.
    ///
    /// # Safety
    /// The cell must hold a live element, and the caller must treat it as
    /// vacant afterwards.
    #[inline(always)]
    pub(crate) unsafe fn read(&self, virtual_index: usize) -> T {
        let (slot, offset) = split(virtual_index);
        debug_assert!(self.slots[slot].is_some());
        unsafe {
            let block = self.slots.get_unchecked(slot).as_deref().unwrap_unchecked();
            block.cells.get_unchecked(offset).assume_init_read()
        }
    }

    /// Returns a shared reference to the element at `virtual_index`.
    ///
    /// # Safety
    /// The cell must hold a live element.
    #[inline(always)]
    pub(crate) unsafe fn cell(&self, virtual_index: usize) -> &T {
        let (slot, offset) = split(virtual_index);
        debug_assert!(self.slots[slot].is_some());
        unsafe {
            let block = self.slots.get_unchecked(slot).as_deref().unwrap_unchecked();
            block.cells.get_unchecked(offset).assume_init_ref()
        }
    }

    /// Returns an exclusive reference to the element at `virtual_index`.
    ///
    /// # Safety
    /// The cell must hold a live element.
    #[inline(always)]
    pub(crate) unsafe fn cell_mut(&mut self, virtual_index: usize) -> &mut T {
        let (slot, offset) = split(virtual_index);
        debug_assert!(self.slots[slot].is_some());
        unsafe {
            let block = self
                .slots
                .get_unchecked_mut(slot)
                .as_deref_mut()
                .unwrap_unchecked();
            block.cells.get_unchecked_mut(offset).assume_init_mut()
        }
    }

    /// Drops the element at `virtual_index` in place.
    ///
    /// # Safety
    /// The cell must hold a live element; it is vacant afterwards.
    #[inline(always)]
    pub(crate) unsafe fn drop_cell(&mut self, virtual_index: usize) {
        let (slot, offset) = split(virtual_index);
        debug_assert!(self.slots[slot].is_some());
        unsafe {
            let block = self
                .slots
                .get_unchecked_mut(slot)
                .as_deref_mut()
                .unwrap_unchecked();
            block.cells.get_unchecked_mut(offset).assume_init_drop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_split_arithmetic() {
        assert_eq!(split(0), (0, 0));
        assert_eq!(split(63), (0, 63));
        assert_eq!(split(64), (1, 0));
        assert_eq!(split(130), (2, 2));
        assert_eq!(split(255), (3, 63));
    }

    #[test]
    fn test_block_map_starts_empty() {
        let map: BlockMap<i32> = BlockMap::with_slot_count(4);
        assert_eq!(map.slot_count(), 4);
        assert_eq!(map.flat_len(), 256);
        for slot in 0..4 {
            assert!(!map.is_allocated(slot));
        }
    }

    #[test]
    fn test_block_map_allocates_only_touched_slots() {
        let mut map: BlockMap<i32> = BlockMap::with_slot_count(4);
        map.write(70, 7);
        assert!(!map.is_allocated(0));
        assert!(map.is_allocated(1));
        assert!(!map.is_allocated(2));
        assert!(!map.is_allocated(3));
        assert_eq!(unsafe { map.read(70) }, 7);
    }

    #[test]
    fn test_block_map_write_read_across_blocks() {
        let mut map: BlockMap<usize> = BlockMap::with_slot_count(4);
        for vi in 60..70 {
            map.write(vi, vi * 10);
        }
        assert!(map.is_allocated(0));
        assert!(map.is_allocated(1));
        for vi in 60..70 {
            assert_eq!(unsafe { *map.cell(vi) }, vi * 10);
        }
    }

    #[test]
    fn test_block_map_cell_mut() {
        let mut map: BlockMap<String> = BlockMap::with_slot_count(4);
        map.write(5, "a".to_string());
        unsafe { map.cell_mut(5) }.push('b');
        assert_eq!(unsafe { map.read(5) }, "ab");
    }
}
