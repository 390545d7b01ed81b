use crate::appnp::{AppnpConv, AppnpConvConfig};
use crate::graph::Graph;
use burn::nn::{Dropout, DropoutConfig, Linear, LinearConfig, Relu};
use burn::prelude::*;

/// MLP predictor followed by personalized propagation.
///
/// The network first predicts per-node class logits from features alone,
/// then diffuses the predictions over the graph.
#[derive(Module, Debug)]
pub struct AppnpNet<B: Backend> {
    pub fc0: Linear<B>,
    pub fc1: Linear<B>,
    pub activation: Relu,
    pub feat_dropout: Dropout,
    pub propagation: AppnpConv<B>,
}

#[derive(Config, Debug)]
pub struct AppnpNetConfig {
    pub in_feats: usize,
    pub hidden_dim: usize,
    pub n_classes: usize,
    #[config(default = 0.5)]
    pub feat_dropout: f64,
    #[config(default = 0.5)]
    pub edge_dropout: f64,
    #[config(default = 0.1)]
    pub alpha: f64,
    #[config(default = 10)]
    pub k: usize,
}

impl AppnpNetConfig {
    /// Returns the initialized model.
    pub fn init<B: Backend>(&self, device: &B::Device) -> AppnpNet<B> {
        AppnpNet {
            fc0: LinearConfig::new(self.in_feats, self.hidden_dim).init(device),
            fc1: LinearConfig::new(self.hidden_dim, self.n_classes).init(device),
            activation: Relu::new(),
            feat_dropout: DropoutConfig::new(self.feat_dropout).init(),
            propagation: AppnpConvConfig::new(self.k, self.alpha)
                .with_edge_drop(self.edge_dropout)
                .init(),
        }
    }
}

impl<B: Backend> AppnpNet<B> {
    /// # Shapes
    ///   - Input [n_nodes, in_feats]
    ///   - Output [n_nodes, n_classes] (logits)
    pub fn forward(&self, x: Tensor<B, 2>, g: &Graph<B>) -> Tensor<B, 2> {
        let x = self.feat_dropout.forward(x);
        let x = self.activation.forward(self.fc0.forward(x));
        let x = self.feat_dropout.forward(x);
        let x = self.fc1.forward(x);
        self.propagation.forward(x, g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Csr;

    type B = burn::backend::NdArray<f32, i32>;

    #[test]
    fn logit_shape_matches_classes() {
        let device = Default::default();
        let csr = Csr::new(vec![0, 2, 3, 4], vec![1, 2, 2, 0]).unwrap();
        let g = Graph::from_csr(&csr, &device);
        let net = AppnpNetConfig::new(5, 8, 3).init::<B>(&device);
        let x = Tensor::ones([3, 5], &device);
        assert_eq!(net.forward(x, &g).dims(), [3, 3]);
    }
}
