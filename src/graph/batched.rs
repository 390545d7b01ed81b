use crate::graph::Graph;
use crate::graph::single::{float_tensor, int_tensor};
use burn::prelude::*;

/// The disjoint union of a batch of graphs.
///
/// Node and edge tensors of the member graphs are concatenated with offset
/// node ids; `node_graph_idx` maps every node back to the graph it came
/// from. `graph_mask` is 1 for slots holding a real graph, letting losses
/// and readouts ignore masked-out slots.
#[derive(Debug, Clone)]
pub struct BatchedGraph<B: Backend> {
    pub graph: Graph<B>,
    /// Owning graph id of each node.
    pub node_graph_idx: Tensor<B, 1, Int>,
    /// # Shapes: [n_graphs, 1]
    pub graph_mask: Tensor<B, 2>,
    n_graphs: usize,
}

impl<B: Backend> BatchedGraph<B> {
    pub fn new(
        graph: Graph<B>,
        node_graph_idx: Vec<i64>,
        graph_mask: Vec<f32>,
        device: &B::Device,
    ) -> Self {
        assert_eq!(graph.n_nodes(), node_graph_idx.len());
        let n_graphs = graph_mask.len();
        BatchedGraph {
            graph,
            node_graph_idx: int_tensor(node_graph_idx, device),
            graph_mask: float_tensor(graph_mask, device).unsqueeze_dim(1),
            n_graphs,
        }
    }

    pub fn n_graphs(&self) -> usize {
        self.n_graphs
    }

    pub fn n_nodes(&self) -> usize {
        self.graph.n_nodes()
    }

    /// Sums node values into their owning graph's slot.
    ///
    /// # Shapes
    ///   - Input [n_nodes, d]
    ///   - Output [n_graphs, d]
    pub fn segment_sum(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let [n_nodes, d] = x.dims();
        debug_assert_eq!(self.n_nodes(), n_nodes);
        Tensor::zeros([self.n_graphs, d], &x.device()).select_assign(
            0,
            self.node_graph_idx.clone(),
            x,
        )
    }

    /// Copies each graph's row back onto its nodes.
    ///
    /// # Shapes
    ///   - Input [n_graphs, d]
    ///   - Output [n_nodes, d]
    pub fn broadcast(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        debug_assert_eq!(self.n_graphs, x.dims()[0]);
        x.select(0, self.node_graph_idx.clone())
    }

    /// Softmax over the nodes of each graph.
    ///
    /// Scores are shifted by the global maximum before exponentiation; the
    /// shifted exponents are all <= 1, and each graph's sum stays positive.
    ///
    /// # Shapes
    ///   - Input [n_nodes, 1]
    ///   - Output [n_nodes, 1]
    pub fn segment_softmax(&self, scores: Tensor<B, 2>) -> Tensor<B, 2> {
        let shifted = scores.clone() - scores.max().unsqueeze_dim(0);
        let exp = shifted.exp();
        let denom = self.segment_sum(exp.clone());
        exp / self.broadcast(denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type B = burn::backend::NdArray<f32, i32>;

    fn device() -> <B as Backend>::Device {
        Default::default()
    }

    /// Two graphs: a 2-cycle (nodes 0, 1) and a single self-looped node (2).
    fn pair() -> BatchedGraph<B> {
        let graph = Graph::from_coo(vec![0, 1, 2], vec![1, 0, 2], 3, &device());
        BatchedGraph::new(graph, vec![0, 0, 1], vec![1.0, 1.0], &device())
    }

    #[test]
    fn segment_sum_groups_by_graph() {
        let bg = pair();
        let x = Tensor::<B, 2>::from_data([[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]], &device());
        bg.segment_sum(x)
            .into_data()
            .assert_eq(&TensorData::from([[4.0, 6.0], [5.0, 6.0]]), false);
    }

    #[test]
    fn broadcast_restores_node_rows() {
        let bg = pair();
        let per_graph = Tensor::<B, 2>::from_data([[1.0], [2.0]], &device());
        bg.broadcast(per_graph)
            .into_data()
            .assert_eq(&TensorData::from([[1.0], [1.0], [2.0]]), false);
    }

    #[test]
    fn segment_softmax_normalizes_per_graph() {
        let bg = pair();
        let scores = Tensor::<B, 2>::from_data([[0.0], [0.0], [5.0]], &device());
        let alpha = bg.segment_softmax(scores);
        // uniform within the first graph, and a lone node gets weight 1
        alpha
            .into_data()
            .assert_approx_eq::<f32>(&TensorData::from([[0.5], [0.5], [1.0]]), Default::default());
    }
}
