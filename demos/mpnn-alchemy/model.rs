use crate::cli::AppArgs;
use burn_gnn::mpnn::MpnnPredictorConfig;

/// Six message passing and six Set2Set steps; the defaults follow the
/// common Alchemy setup for a 12-target regression.
pub fn model_config(node_in_feats: usize, edge_in_feats: usize, args: &AppArgs) -> MpnnPredictorConfig {
    MpnnPredictorConfig::new(node_in_feats, edge_in_feats)
        .with_node_out_feats(args.node_out_feats)
        .with_edge_hidden_feats(args.edge_hidden_feats)
        .with_n_tasks(args.n_tasks)
}
