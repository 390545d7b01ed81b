use crate::graph::BatchedGraph;
use crate::mpnn::{GruCell, GruCellConfig, NnConv, NnConvConfig, Set2Set, Set2SetConfig};
use burn::nn::{Linear, LinearConfig, Relu};
use burn::prelude::*;

/// Message passing network for graph-level regression: node projection,
/// edge-conditioned message passing with a GRU state, Set2Set readout and a
/// two-layer prediction head.
#[derive(Module, Debug)]
pub struct MpnnPredictor<B: Backend> {
    pub project: Linear<B>,
    pub conv: NnConv<B>,
    pub gru: GruCell<B>,
    pub readout: Set2Set<B>,
    pub predict0: Linear<B>,
    pub predict1: Linear<B>,
    pub activation: Relu,
    pub num_step_message_passing: usize,
}

#[derive(Config, Debug)]
pub struct MpnnPredictorConfig {
    pub node_in_feats: usize,
    pub edge_in_feats: usize,
    #[config(default = 64)]
    pub node_out_feats: usize,
    #[config(default = 128)]
    pub edge_hidden_feats: usize,
    #[config(default = 6)]
    pub num_step_message_passing: usize,
    #[config(default = 6)]
    pub num_step_set2set: usize,
    #[config(default = 12)]
    pub n_tasks: usize,
}

impl MpnnPredictorConfig {
    /// Returns the initialized model.
    pub fn init<B: Backend>(&self, device: &B::Device) -> MpnnPredictor<B> {
        let d = self.node_out_feats;
        MpnnPredictor {
            project: LinearConfig::new(self.node_in_feats, d).init(device),
            conv: NnConvConfig::new(d, d, self.edge_in_feats, self.edge_hidden_feats).init(device),
            gru: GruCellConfig::new(d, d).init(device),
            readout: Set2SetConfig::new(d)
                .with_n_iters(self.num_step_set2set)
                .init(device),
            predict0: LinearConfig::new(2 * d, d).init(device),
            predict1: LinearConfig::new(d, self.n_tasks).init(device),
            activation: Relu::new(),
            num_step_message_passing: self.num_step_message_passing,
        }
    }
}

impl<B: Backend> MpnnPredictor<B> {
    /// # Shapes
    ///   - node_feat [n_nodes, node_in_feats]
    ///   - edge_feat [n_edges, edge_in_feats]
    ///   - Output [n_graphs, n_tasks]
    pub fn forward(
        &self,
        node_feat: Tensor<B, 2>,
        edge_feat: Tensor<B, 2>,
        bg: &BatchedGraph<B>,
    ) -> Tensor<B, 2> {
        let mut hidden = self.activation.forward(self.project.forward(node_feat));

        for _ in 0..self.num_step_message_passing {
            let messages = self.activation.forward(self.conv.forward(
                hidden.clone(),
                edge_feat.clone(),
                &bg.graph,
            ));
            hidden = self.gru.forward(messages, hidden);
        }

        let pooled = self.readout.forward(hidden, bg);
        self.predict1
            .forward(self.activation.forward(self.predict0.forward(pooled)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    type B = burn::backend::NdArray<f32, i32>;

    #[test]
    fn predicts_per_graph_tasks() {
        let device = Default::default();
        // two triangles, batched
        let row = vec![0, 1, 2, 3, 4, 5];
        let col = vec![1, 2, 0, 4, 5, 3];
        let graph = Graph::from_coo(row, col, 6, &device);
        let bg = BatchedGraph::new(graph, vec![0, 0, 0, 1, 1, 1], vec![1.0, 1.0], &device);

        let model = MpnnPredictorConfig::new(4, 3)
            .with_node_out_feats(8)
            .with_edge_hidden_feats(16)
            .with_num_step_message_passing(2)
            .with_num_step_set2set(2)
            .with_n_tasks(5)
            .init::<B>(&device);

        let node_feat = Tensor::random([6, 4], burn::tensor::Distribution::Default, &device);
        let edge_feat = Tensor::random([6, 3], burn::tensor::Distribution::Default, &device);
        assert_eq!(model.forward(node_feat, edge_feat, &bg).dims(), [2, 5]);
    }
}
