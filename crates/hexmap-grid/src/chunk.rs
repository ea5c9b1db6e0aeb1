//! Fixed-size groups of cells that are triangulated together.

/// A rectangular block of cells and its dirty flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridChunk {
    cells: Vec<usize>,
    dirty: bool,
}

impl GridChunk {
    /// Create a chunk with `capacity` slots; new chunks start dirty.
    pub fn new(capacity: usize) -> Self {
        Self {
            cells: vec![0; capacity],
            dirty: true,
        }
    }

    pub(crate) fn set_cell(&mut self, slot: usize, cell: usize) {
        self.cells[slot] = cell;
    }

    /// Arena indices of the cells in this chunk, in local row-major order.
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flag the chunk for retriangulation.
    ///
    /// Returns `true` only on the clean-to-dirty transition.
    pub fn mark_dirty(&mut self) -> bool {
        !std::mem::replace(&mut self.dirty, true)
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_chunk_is_dirty() {
        let chunk = GridChunk::new(25);
        assert!(chunk.is_dirty());
        assert_eq!(chunk.cells().len(), 25);
    }

    #[test]
    fn test_mark_dirty_reports_transition_once() {
        let mut chunk = GridChunk::new(4);
        chunk.clear_dirty();
        assert!(chunk.mark_dirty());
        assert!(!chunk.mark_dirty());
        assert!(chunk.is_dirty());
    }

    #[test]
    fn test_set_cell() {
        let mut chunk = GridChunk::new(2);
        chunk.set_cell(1, 42);
        assert_eq!(chunk.cells(), &[0, 42]);
    }
}
