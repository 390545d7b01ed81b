use crate::cli::AppArgs;
use burn_gnn::gcn::GcnNetConfig;

/// With the defaults (16 hidden units, dropout 0.5) this is the classic
/// two-layer setup for citation graphs; it reaches ~0.8 test accuracy on
/// Cora after 200 epochs.
pub fn model_config(feature_size: usize, n_classes: usize, args: &AppArgs) -> GcnNetConfig {
    GcnNetConfig::new(feature_size, args.num_hidden, n_classes).with_dropout(args.dropout)
}
