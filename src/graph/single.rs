use crate::graph::Csr;
use burn::prelude::*;

/// A homogeneous graph resident on a backend device.
///
/// Edges are stored as endpoint pairs: `col[e]` is the source node of edge
/// `e` and `row[e]` its destination. Degrees are kept as float tensors,
/// clamped to at least one so that `D^{-1/2}` normalization stays finite on
/// isolated nodes.
#[derive(Debug, Clone)]
pub struct Graph<B: Backend> {
    /// Destination endpoint of each edge.
    pub row: Tensor<B, 1, Int>,
    /// Source endpoint of each edge.
    pub col: Tensor<B, 1, Int>,
    /// Incoming edge count per node.
    pub in_deg: Tensor<B, 1>,
    /// Outgoing edge count per node.
    pub out_deg: Tensor<B, 1>,
    n_nodes: usize,
    n_edges: usize,
}

impl<B: Backend> Graph<B> {
    pub fn from_csr(csr: &Csr, device: &B::Device) -> Self {
        Self::from_coo(csr.row_indices(), csr.indices().to_vec(), csr.n_nodes(), device)
    }

    /// Builds a graph from parallel (destination, source) edge lists.
    pub fn from_coo(row: Vec<i64>, col: Vec<i64>, n_nodes: usize, device: &B::Device) -> Self {
        assert_eq!(row.len(), col.len());
        let n_edges = row.len();

        let mut in_deg = vec![0.0f32; n_nodes];
        for &r in &row {
            in_deg[r as usize] += 1.0;
        }
        let mut out_deg = vec![0.0f32; n_nodes];
        for &c in &col {
            out_deg[c as usize] += 1.0;
        }

        Graph {
            row: int_tensor(row, device),
            col: int_tensor(col, device),
            in_deg: float_tensor(in_deg, device).clamp_min(1.0),
            out_deg: float_tensor(out_deg, device).clamp_min(1.0),
            n_nodes,
            n_edges,
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    pub fn n_edges(&self) -> usize {
        self.n_edges
    }

    /// Gathers source-node values along every edge.
    ///
    /// # Shapes
    ///   - Input [n_nodes, d]
    ///   - Output [n_edges, d]
    pub fn gather(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        debug_assert_eq!(self.n_nodes, x.dims()[0]);
        x.select(0, self.col.clone())
    }

    /// Sums per-edge messages into their destination nodes.
    ///
    /// # Shapes
    ///   - Input [n_edges, d]
    ///   - Output [n_nodes, d]
    pub fn scatter_sum(&self, messages: Tensor<B, 2>) -> Tensor<B, 2> {
        let [n_edges, d] = messages.dims();
        debug_assert_eq!(self.n_edges, n_edges);
        Tensor::zeros([self.n_nodes, d], &messages.device()).select_assign(
            0,
            self.row.clone(),
            messages,
        )
    }

    /// `deg^{-1/2}` as a column, for symmetric normalization.
    ///
    /// # Shapes
    ///   - Output [n_nodes, 1]
    pub fn in_norm(&self) -> Tensor<B, 2> {
        self.in_deg.clone().sqrt().recip().unsqueeze_dim(1)
    }

    /// See [`Self::in_norm`].
    pub fn out_norm(&self) -> Tensor<B, 2> {
        self.out_deg.clone().sqrt().recip().unsqueeze_dim(1)
    }
}

pub(crate) fn int_tensor<B: Backend>(values: Vec<i64>, device: &B::Device) -> Tensor<B, 1, Int> {
    let len = values.len();
    Tensor::from_data(TensorData::new(values, [len]).convert::<B::IntElem>(), device)
}

pub(crate) fn float_tensor<B: Backend>(values: Vec<f32>, device: &B::Device) -> Tensor<B, 1> {
    let len = values.len();
    Tensor::from_data(
        TensorData::new(values, [len]).convert::<B::FloatElem>(),
        device,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    type B = burn::backend::NdArray<f32, i32>;

    fn device() -> <B as Backend>::Device {
        Default::default()
    }

    // 0 <- 1, 0 <- 2, 1 <- 2, 2 <- 0
    fn triangle() -> Graph<B> {
        let csr = Csr::new(vec![0, 2, 3, 4], vec![1, 2, 2, 0]).unwrap();
        Graph::from_csr(&csr, &device())
    }

    #[test]
    fn gather_reads_source_nodes() {
        let g = triangle();
        let x = Tensor::<B, 2>::from_data([[10.0], [20.0], [30.0]], &device());
        let gathered = g.gather(x);
        gathered
            .into_data()
            .assert_eq(&TensorData::from([[20.0], [30.0], [30.0], [10.0]]), false);
    }

    #[test]
    fn scatter_sums_into_destinations() {
        let g = triangle();
        let messages =
            Tensor::<B, 2>::from_data([[1.0, 2.0], [3.0, 4.0], [5.0, 6.0], [7.0, 8.0]], &device());
        let out = g.scatter_sum(messages);
        out.into_data().assert_eq(
            &TensorData::from([[4.0, 6.0], [5.0, 6.0], [7.0, 8.0]]),
            false,
        );
    }

    #[test]
    fn degrees_clamped_for_isolated_nodes() {
        // node 2 has no edges at all
        let g = Graph::<B>::from_coo(vec![0], vec![1], 3, &device());
        g.in_deg
            .into_data()
            .assert_eq(&TensorData::from([1.0, 1.0, 1.0]), false);
        g.out_deg
            .into_data()
            .assert_eq(&TensorData::from([1.0, 1.0, 1.0]), false);
    }
}
