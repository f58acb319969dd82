// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Coupling Topology
// ─────────────────────────────────────────────────────────────────────
//! Who is coupled to whom.
//!
//! `Topology` is the contract with an external connectivity provider.
//! `Connections` is the owned adjacency snapshot the engine integrates
//! against, built either from a `ConnectionType` or from any provider.

use syncnet_types::{ConnectionType, SyncError, SyncResult};

/// Connectivity provider: a fixed oscillator count and per-index neighbours.
pub trait Topology {
    fn size(&self) -> usize;

    fn neighbors(&self, index: usize) -> Vec<usize>;
}

/// Owned adjacency lists, sorted and free of duplicates and self links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connections {
    adjacency: Vec<Vec<usize>>,
}

impl Connections {
    /// Build one of the standard topologies over `size` oscillators.
    pub fn build(connection: ConnectionType, size: usize) -> SyncResult<Self> {
        let adjacency = match connection {
            ConnectionType::AllToAll => (0..size)
                .map(|i| (0..size).filter(|&j| j != i).collect())
                .collect(),
            ConnectionType::GridFour => grid(size, false)?,
            ConnectionType::GridEight => grid(size, true)?,
            ConnectionType::ListBidir => (0..size)
                .map(|i| {
                    let mut n = Vec::with_capacity(2);
                    if i > 0 {
                        n.push(i - 1);
                    }
                    if i + 1 < size {
                        n.push(i + 1);
                    }
                    n
                })
                .collect(),
            ConnectionType::None => vec![Vec::new(); size],
        };
        Ok(Self { adjacency })
    }

    /// Validate and snapshot raw adjacency lists.
    pub fn from_adjacency(mut adjacency: Vec<Vec<usize>>) -> SyncResult<Self> {
        let size = adjacency.len();
        for (i, row) in adjacency.iter_mut().enumerate() {
            if let Some(&bad) = row.iter().find(|&&j| j >= size || j == i) {
                return Err(SyncError::Topology(format!(
                    "oscillator {i} has invalid neighbour {bad} (size {size})"
                )));
            }
            row.sort_unstable();
            row.dedup();
        }
        Ok(Self { adjacency })
    }

    /// Snapshot an external topology provider.
    pub fn from_topology(topology: &dyn Topology) -> SyncResult<Self> {
        let adjacency = (0..topology.size())
            .map(|i| topology.neighbors(i))
            .collect();
        Self::from_adjacency(adjacency)
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Neighbours of `index` as a borrowed slice.
    pub fn adjacent(&self, index: usize) -> &[usize] {
        &self.adjacency[index]
    }

    pub fn has_connection(&self, i: usize, j: usize) -> bool {
        self.adjacency
            .get(i)
            .is_some_and(|row| row.binary_search(&j).is_ok())
    }

    /// Total number of directed neighbour pairs.
    pub fn pair_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }
}

impl Topology for Connections {
    fn size(&self) -> usize {
        self.len()
    }

    fn neighbors(&self, index: usize) -> Vec<usize> {
        self.adjacent(index).to_vec()
    }
}

fn grid(size: usize, diagonals: bool) -> SyncResult<Vec<Vec<usize>>> {
    let side = (size as f64).sqrt().round() as usize;
    if side * side != size {
        return Err(SyncError::Topology(format!(
            "grid topology needs a perfect-square size, got {size}"
        )));
    }
    let side = side as isize;
    let mut adjacency = Vec::with_capacity(size);
    for row in 0..side {
        for col in 0..side {
            let mut n = Vec::with_capacity(if diagonals { 8 } else { 4 });
            for dr in -1..=1isize {
                for dc in -1..=1isize {
                    if (dr == 0 && dc == 0) || (!diagonals && dr != 0 && dc != 0) {
                        continue;
                    }
                    let (r, c) = (row + dr, col + dc);
                    if (0..side).contains(&r) && (0..side).contains(&c) {
                        n.push((r * side + c) as usize);
                    }
                }
            }
            adjacency.push(n);
        }
    }
    Ok(adjacency)
}
