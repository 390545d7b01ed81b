use crate::graph::BatchedGraph;
use crate::mpnn::{LstmCell, LstmCellConfig, LstmCellState};
use burn::prelude::*;

/// Set2Set readout: an LSTM-driven attention query pools node features into
/// an order-invariant per-graph vector.
///
/// Reference: https://arxiv.org/abs/1511.06391
#[derive(Module, Debug)]
pub struct Set2Set<B: Backend> {
    pub lstm: LstmCell<B>,
    pub d_input: usize,
    pub n_iters: usize,
}

#[derive(Config, Debug)]
pub struct Set2SetConfig {
    /// Node feature width; the readout is twice as wide.
    pub d_input: usize,
    #[config(default = 6)]
    pub n_iters: usize,
}

impl Set2SetConfig {
    /// Returns the initialized module.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Set2Set<B> {
        Set2Set {
            lstm: LstmCellConfig::new(2 * self.d_input, self.d_input).init(device),
            d_input: self.d_input,
            n_iters: self.n_iters,
        }
    }
}

impl<B: Backend> Set2Set<B> {
    /// # Shapes
    ///   - Input [n_nodes, d_input]
    ///   - Output [n_graphs, 2 * d_input]
    pub fn forward(&self, x: Tensor<B, 2>, bg: &BatchedGraph<B>) -> Tensor<B, 2> {
        let [n_nodes, d] = x.dims();
        debug_assert_eq!(n_nodes, bg.n_nodes());
        debug_assert_eq!(d, self.d_input);
        let n_graphs = bg.n_graphs();
        let device = x.device();

        let mut q_star = Tensor::zeros([n_graphs, 2 * d], &device);
        let mut state = LstmCellState::empty(n_graphs, d, &device);
        for _ in 0..self.n_iters {
            let (query, next_state) = self.lstm.forward(q_star, state);
            state = next_state;

            let scores = (x.clone() * bg.broadcast(query.clone())).sum_dim(1);
            let attention = bg.segment_softmax(scores);
            let readout = bg.segment_sum(x.clone() * attention);
            q_star = Tensor::cat(vec![query, readout], 1);
        }
        debug_assert_eq!([n_graphs, 2 * d], q_star.dims());

        q_star
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    type B = burn::backend::NdArray<f32, i32>;

    #[test]
    fn pools_to_double_width() {
        let device = Default::default();
        let graph = Graph::from_coo(vec![0, 1, 2, 3], vec![1, 0, 3, 2], 4, &device);
        let bg = BatchedGraph::new(graph, vec![0, 0, 1, 1], vec![1.0, 1.0], &device);

        let readout = Set2SetConfig::new(3).with_n_iters(2).init::<B>(&device);
        let x = Tensor::random([4, 3], burn::tensor::Distribution::Default, &device);
        assert_eq!(readout.forward(x, &bg).dims(), [2, 6]);
    }

    #[test]
    fn node_order_within_a_graph_is_irrelevant() {
        let device = Default::default();
        let graph = Graph::from_coo(vec![], vec![], 3, &device);
        let bg = BatchedGraph::new(graph.clone(), vec![0, 0, 0], vec![1.0], &device);

        let readout = Set2SetConfig::new(2).with_n_iters(3).init::<B>(&device);
        let x = Tensor::<B, 2>::from_data([[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]], &device);
        let permuted = Tensor::<B, 2>::from_data([[5.0, 6.0], [1.0, 2.0], [3.0, 4.0]], &device);

        let a = readout.forward(x, &bg);
        let b = readout.forward(permuted, &bg);
        a.into_data()
            .assert_approx_eq::<f32>(&b.into_data(), Default::default());
    }
}
