use crate::cli::AppArgs;
use burn_gnn::appnp::AppnpNetConfig;

/// The propagation depth trades a wider receptive field against runtime;
/// k = 10 with a 0.1 teleport keeps most of the signal local.
pub fn model_config(feature_size: usize, n_classes: usize, args: &AppArgs) -> AppnpNetConfig {
    AppnpNetConfig::new(feature_size, args.num_hidden, n_classes)
        .with_feat_dropout(args.feat_dropout)
        .with_edge_dropout(args.edge_dropout)
        .with_alpha(args.alpha)
        .with_k(args.k)
}
