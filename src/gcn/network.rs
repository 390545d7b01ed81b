use crate::gcn::{GcnConv, GcnConvConfig};
use crate::graph::Graph;
use crate::utils::elu;
use burn::nn::{Dropout, DropoutConfig};
use burn::prelude::*;

/// Two-layer GCN for vertex classification.
#[derive(Module, Debug)]
pub struct GcnNet<B: Backend> {
    pub layer0: GcnConv<B>,
    pub layer1: GcnConv<B>,
    pub dropout: Dropout,
}

#[derive(Config, Debug)]
pub struct GcnNetConfig {
    pub data_feat_size: usize,
    pub hidden_dim_size: usize,
    pub n_classes: usize,
    #[config(default = 0.5)]
    pub dropout: f64,
}

impl GcnNetConfig {
    /// Returns the initialized model.
    pub fn init<B: Backend>(&self, device: &B::Device) -> GcnNet<B> {
        GcnNet {
            layer0: GcnConvConfig::new(self.data_feat_size, self.hidden_dim_size).init(device),
            layer1: GcnConvConfig::new(self.hidden_dim_size, self.n_classes).init(device),
            dropout: DropoutConfig::new(self.dropout).init(),
        }
    }
}

impl<B: Backend> GcnNet<B> {
    /// # Shapes
    ///   - Input [n_nodes, data_feat_size]
    ///   - Output [n_nodes, n_classes] (logits)
    pub fn forward(&self, x: Tensor<B, 2>, g: &Graph<B>) -> Tensor<B, 2> {
        let [n_nodes, _] = x.dims();

        let x = self.layer0.forward(x, g);
        let x = elu(x, 1.0);
        let x = self.dropout.forward(x);
        let x = self.layer1.forward(x, g);
        debug_assert_eq!(n_nodes, x.dims()[0]);

        x
    }
}
