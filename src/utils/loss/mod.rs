mod masked_cross_entropy;
mod masked_mse;

pub use masked_cross_entropy::MaskedCrossEntropyLoss;
pub use masked_mse::MaskedMseLoss;
