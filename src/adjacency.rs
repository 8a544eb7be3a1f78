// Per-cell memo of legal neighbors
//
// The cache is a flat width*height array indexed by (row, col). It never
// decides on its own when an entry is stale: the grid refreshes entries
// whenever a cell's emptiness changes.

use crate::types::Coord;

/// Legal neighbors of one cell, in direction order (up, right, down, left)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Neighbors {
    cells: [Coord; 4],
    len: u8,
}

impl Neighbors {
    pub fn push(&mut self, coord: Coord) {
        debug_assert!(self.len < 4, "a cell has at most four neighbors");
        self.cells[self.len as usize] = coord;
        self.len += 1;
    }

    pub fn as_slice(&self) -> &[Coord] {
        &self.cells[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coord> {
        self.as_slice().iter()
    }
}

#[derive(Debug, Clone)]
pub struct AdjacencyCache {
    width: usize,
    height: usize,
    entries: Vec<Option<Neighbors>>,
}

impl AdjacencyCache {
    pub fn new(width: usize, height: usize) -> Self {
        AdjacencyCache {
            width,
            height,
            entries: vec![None; width * height],
        }
    }

    fn slot(&self, coord: Coord) -> Option<usize> {
        if coord.row < 0 || coord.col < 0 {
            return None;
        }
        let (row, col) = (coord.row as usize, coord.col as usize);
        if row >= self.height || col >= self.width {
            return None;
        }
        Some(row * self.width + col)
    }

    /// Cached entry, or None if the cell was never computed or lies off the board
    pub fn get(&self, coord: Coord) -> Option<Neighbors> {
        self.slot(coord).and_then(|slot| self.entries[slot])
    }

    /// Stores a freshly computed entry; off-board coordinates are ignored
    pub fn store(&mut self, coord: Coord, neighbors: Neighbors) {
        if let Some(slot) = self.slot(coord) {
            self.entries[slot] = Some(neighbors);
        }
    }
}
