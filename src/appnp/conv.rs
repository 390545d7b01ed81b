use crate::graph::Graph;
use burn::prelude::*;
use burn::tensor::Distribution;

/// Approximate personalized propagation, `h <- (1 - alpha) A_hat h + alpha h0`
/// iterated `k` times over the symmetric-normalized adjacency.
#[derive(Module, Debug)]
pub struct AppnpConv<B: Backend> {
    pub k: usize,
    pub alpha: f64,
    pub edge_drop: f64,
    _backend: core::marker::PhantomData<B>,
}

#[derive(Config, Debug)]
pub struct AppnpConvConfig {
    /// Propagation step count.
    pub k: usize,
    /// Teleport probability back to the initial prediction.
    pub alpha: f64,
    #[config(default = 0.0)]
    pub edge_drop: f64,
}

impl AppnpConvConfig {
    /// Returns the initialized layer.
    pub fn init<B: Backend>(&self) -> AppnpConv<B> {
        AppnpConv {
            k: self.k,
            alpha: self.alpha,
            edge_drop: self.edge_drop,
            _backend: core::marker::PhantomData,
        }
    }
}

impl<B: Backend> AppnpConv<B> {
    /// # Shapes
    ///   - Input [n_nodes, d]
    ///   - Output [n_nodes, d]
    pub fn forward(&self, x: Tensor<B, 2>, g: &Graph<B>) -> Tensor<B, 2> {
        debug_assert_eq!(x.dims()[0], g.n_nodes());

        let h0 = x.clone();
        let out_norm = g.out_norm();
        let in_norm = g.in_norm();
        let mut h = x;
        for _ in 0..self.k {
            let messages = self.drop_edges(g.gather(h * out_norm.clone()));
            let aggregated = g.scatter_sum(messages) * in_norm.clone();
            h = aggregated * (1.0 - self.alpha) + h0.clone() * self.alpha;
        }
        h
    }

    /// Bernoulli edge dropout, active in training only; kept edges are
    /// rescaled by `1 / (1 - p)` like feature dropout.
    fn drop_edges(&self, messages: Tensor<B, 2>) -> Tensor<B, 2> {
        if !B::ad_enabled() || self.edge_drop == 0.0 {
            return messages;
        }
        let [n_edges, _] = messages.dims();
        let keep = 1.0 - self.edge_drop;
        let mask = Tensor::random(
            [n_edges, 1],
            Distribution::Bernoulli(keep),
            &messages.device(),
        );
        messages * (mask / keep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Csr;

    type B = burn::backend::NdArray<f32, i32>;

    fn ring() -> (Graph<B>, Tensor<B, 2>) {
        let device = Default::default();
        let csr = Csr::new(vec![0, 1, 2, 3], vec![2, 0, 1]).unwrap();
        let g = Graph::from_csr(&csr, &device);
        let x = Tensor::from_data([[1.0], [2.0], [4.0]], &device);
        (g, x)
    }

    #[test]
    fn zero_steps_is_identity() {
        let (g, x) = ring();
        let conv = AppnpConvConfig::new(0, 0.1).init::<B>();
        conv.forward(x.clone(), &g)
            .into_data()
            .assert_eq(&x.into_data(), false);
    }

    #[test]
    fn full_teleport_returns_initial_prediction() {
        let (g, x) = ring();
        let conv = AppnpConvConfig::new(5, 1.0).init::<B>();
        conv.forward(x.clone(), &g)
            .into_data()
            .assert_approx_eq::<f32>(&x.into_data(), Default::default());
    }

    #[test]
    fn one_step_mixes_neighbor_and_teleport() {
        let (g, x) = ring();
        let conv = AppnpConvConfig::new(1, 0.25).init::<B>();
        // every node has in and out degree 1, so A_hat h just rotates h
        let expected = TensorData::from([[0.75 * 4.0 + 0.25], [0.75 + 0.5], [1.5 + 1.0]]);
        conv.forward(x, &g)
            .into_data()
            .assert_approx_eq::<f32>(&expected, Default::default());
    }
}
