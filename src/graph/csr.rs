use thiserror::Error;

#[derive(Debug, Error)]
pub enum CsrError {
    #[error("indptr must start at 0, got {0}")]
    BadStart(i64),
    #[error("indptr must be non-decreasing, violated at position {0}")]
    NonMonotonic(usize),
    #[error("indptr ends at {end} but there are {len} column indices")]
    LengthMismatch { end: i64, len: usize },
    #[error("column index {index} of edge {edge} is out of bounds for {n_nodes} nodes")]
    ColumnOutOfBounds {
        index: i64,
        edge: usize,
        n_nodes: usize,
    },
}

/// Adjacency in compressed sparse row form.
///
/// Rows are destination nodes: `indices[indptr[i]..indptr[i + 1]]` are the
/// source neighbors of node `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Csr {
    indptr: Vec<i64>,
    indices: Vec<i64>,
}

impl Csr {
    pub fn new(indptr: Vec<i64>, indices: Vec<i64>) -> Result<Self, CsrError> {
        let first = *indptr.first().unwrap_or(&0);
        if first != 0 {
            return Err(CsrError::BadStart(first));
        }
        for (i, pair) in indptr.windows(2).enumerate() {
            if pair[1] < pair[0] {
                return Err(CsrError::NonMonotonic(i + 1));
            }
        }
        let end = *indptr.last().unwrap_or(&0);
        if end != indices.len() as i64 {
            return Err(CsrError::LengthMismatch {
                end,
                len: indices.len(),
            });
        }
        let n_nodes = indptr.len().saturating_sub(1);
        for (edge, &index) in indices.iter().enumerate() {
            if index < 0 || index >= n_nodes as i64 {
                return Err(CsrError::ColumnOutOfBounds {
                    index,
                    edge,
                    n_nodes,
                });
            }
        }
        Ok(Self { indptr, indices })
    }

    pub fn n_nodes(&self) -> usize {
        self.indptr.len().saturating_sub(1)
    }

    pub fn n_edges(&self) -> usize {
        self.indices.len()
    }

    pub fn indptr(&self) -> &[i64] {
        &self.indptr
    }

    pub fn indices(&self) -> &[i64] {
        &self.indices
    }

    /// Expands `indptr` into one row (destination) index per edge.
    pub fn row_indices(&self) -> Vec<i64> {
        let mut rows = Vec::with_capacity(self.n_edges());
        for (row, pair) in self.indptr.windows(2).enumerate() {
            for _ in pair[0]..pair[1] {
                rows.push(row as i64);
            }
        }
        rows
    }

    /// Number of incoming edges per node.
    pub fn in_degrees(&self) -> Vec<i64> {
        self.indptr.windows(2).map(|pair| pair[1] - pair[0]).collect()
    }

    /// Number of outgoing edges per node.
    pub fn out_degrees(&self) -> Vec<i64> {
        let mut degrees = vec![0i64; self.n_nodes()];
        for &col in &self.indices {
            degrees[col as usize] += 1;
        }
        degrees
    }

    /// The reverse adjacency, with every edge flipped.
    pub fn transpose(&self) -> Csr {
        let n_nodes = self.n_nodes();
        let mut indptr = vec![0i64; n_nodes + 1];
        for &col in &self.indices {
            indptr[col as usize + 1] += 1;
        }
        for i in 0..n_nodes {
            indptr[i + 1] += indptr[i];
        }
        let mut cursor: Vec<i64> = indptr[..n_nodes].to_vec();
        let mut indices = vec![0i64; self.n_edges()];
        for (row, &col) in self.row_indices().into_iter().zip(&self.indices) {
            indices[cursor[col as usize] as usize] = row;
            cursor[col as usize] += 1;
        }
        Csr { indptr, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 0 <- 1, 0 <- 2, 1 <- 2, 2 <- 0
    fn triangle() -> Csr {
        Csr::new(vec![0, 2, 3, 4], vec![1, 2, 2, 0]).unwrap()
    }

    #[test]
    fn counts() {
        let csr = triangle();
        assert_eq!(csr.n_nodes(), 3);
        assert_eq!(csr.n_edges(), 4);
        assert_eq!(csr.row_indices(), vec![0, 0, 1, 2]);
        assert_eq!(csr.in_degrees(), vec![2, 1, 1]);
        assert_eq!(csr.out_degrees(), vec![1, 1, 2]);
    }

    #[test]
    fn transpose_flips_edges() {
        let csr = triangle();
        let t = csr.transpose();
        assert_eq!(t.indptr(), &[0, 1, 2, 4]);
        assert_eq!(t.indices(), &[2, 0, 0, 1]);
        assert_eq!(t.transpose(), csr);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(
            Csr::new(vec![1, 2], vec![0]),
            Err(CsrError::BadStart(1))
        ));
        assert!(matches!(
            Csr::new(vec![0, 2, 1], vec![0, 1]),
            Err(CsrError::NonMonotonic(2))
        ));
        assert!(matches!(
            Csr::new(vec![0, 1], vec![]),
            Err(CsrError::LengthMismatch { .. })
        ));
        assert!(matches!(
            Csr::new(vec![0, 1], vec![3]),
            Err(CsrError::ColumnOutOfBounds { .. })
        ));
    }
}
