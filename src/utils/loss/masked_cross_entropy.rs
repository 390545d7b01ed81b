use burn::module::Module;
use burn::prelude::*;
use burn::tensor::activation::log_softmax;

/// Softmax cross entropy averaged over the masked entries.
///
/// The per-entry losses are weighted by `mask` and normalized by the mask
/// sum, so entries outside the mask contribute nothing to either the value
/// or the gradient.
#[derive(Module, Clone, Debug, Default)]
pub struct MaskedCrossEntropyLoss;

impl MaskedCrossEntropyLoss {
    pub fn new() -> Self {
        Self
    }

    /// Compute the criterion on the input tensor.
    ///
    /// # Shapes
    ///   - logits [n, n_classes]
    ///   - targets [n]
    ///   - mask [n], 0.0 or 1.0 per entry
    pub fn forward<B: Backend>(
        &self,
        logits: Tensor<B, 2>,
        targets: Tensor<B, 1, Int>,
        mask: Tensor<B, 1>,
    ) -> Tensor<B, 1> {
        let [n, _n_classes] = logits.dims();
        debug_assert_eq!([n], targets.dims());
        debug_assert_eq!([n], mask.dims());

        let log_probs = log_softmax(logits, 1);
        let nll = log_probs
            .gather(1, targets.unsqueeze_dim(1))
            .squeeze::<1>(1)
            .neg();
        (nll * mask.clone()).sum() / mask.sum()
    }
}
