use crate::graph::Graph;
use burn::nn::{Linear, LinearConfig, Relu};
use burn::prelude::*;

/// Edge-conditioned convolution: a small edge network maps every edge
/// feature to a `[in_feats, out_feats]` weight matrix, which transforms the
/// message sent along that edge.
#[derive(Module, Debug)]
pub struct NnConv<B: Backend> {
    pub edge_net0: Linear<B>,
    pub edge_net1: Linear<B>,
    pub activation: Relu,
    pub in_feats: usize,
    pub out_feats: usize,
}

#[derive(Config, Debug)]
pub struct NnConvConfig {
    pub in_feats: usize,
    pub out_feats: usize,
    pub edge_in_feats: usize,
    pub edge_hidden_feats: usize,
}

impl NnConvConfig {
    /// Returns the initialized layer.
    pub fn init<B: Backend>(&self, device: &B::Device) -> NnConv<B> {
        NnConv {
            edge_net0: LinearConfig::new(self.edge_in_feats, self.edge_hidden_feats).init(device),
            edge_net1: LinearConfig::new(self.edge_hidden_feats, self.in_feats * self.out_feats)
                .init(device),
            activation: Relu::new(),
            in_feats: self.in_feats,
            out_feats: self.out_feats,
        }
    }
}

impl<B: Backend> NnConv<B> {
    /// # Shapes
    ///   - x [n_nodes, in_feats]
    ///   - edge_feat [n_edges, edge_in_feats]
    ///   - Output [n_nodes, out_feats]
    pub fn forward(&self, x: Tensor<B, 2>, edge_feat: Tensor<B, 2>, g: &Graph<B>) -> Tensor<B, 2> {
        let [n_edges, _] = edge_feat.dims();
        debug_assert_eq!(n_edges, g.n_edges());
        debug_assert_eq!(x.dims(), [g.n_nodes(), self.in_feats]);

        let weights = self
            .edge_net1
            .forward(self.activation.forward(self.edge_net0.forward(edge_feat)))
            .reshape([n_edges, self.in_feats, self.out_feats]);

        let sources = g.gather(x).reshape([n_edges, 1, self.in_feats]);
        let messages = sources.matmul(weights).reshape([n_edges, self.out_feats]);
        g.scatter_sum(messages)
    }
}
