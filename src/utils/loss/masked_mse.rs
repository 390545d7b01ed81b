use burn::module::Module;
use burn::prelude::*;

/// Mean squared error averaged over the rows kept by a mask.
#[derive(Module, Clone, Debug, Default)]
pub struct MaskedMseLoss;

impl MaskedMseLoss {
    pub fn new() -> Self {
        Self
    }

    /// Compute the criterion on the input tensor.
    ///
    /// # Shapes
    ///   - predictions [n, n_tasks]
    ///   - targets [n, n_tasks]
    ///   - mask [n, 1], 0.0 or 1.0 per row
    pub fn forward<B: Backend>(
        &self,
        predictions: Tensor<B, 2>,
        targets: Tensor<B, 2>,
        mask: Tensor<B, 2>,
    ) -> Tensor<B, 1> {
        let [n, n_tasks] = predictions.dims();
        debug_assert_eq!([n, n_tasks], targets.dims());
        debug_assert_eq!([n, 1], mask.dims());

        let loss = (predictions - targets).powi_scalar(2) * mask.clone();
        loss.sum() / (mask.sum() * n_tasks as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type B = burn::backend::NdArray<f32, i32>;

    #[test]
    fn averages_over_kept_rows_only() {
        let device = Default::default();
        let predictions = Tensor::<B, 2>::from_data([[1.0, 3.0], [100.0, 100.0]], &device);
        let targets = Tensor::<B, 2>::from_data([[0.0, 1.0], [0.0, 0.0]], &device);
        let mask = Tensor::<B, 2>::from_data([[1.0], [0.0]], &device);

        let loss = MaskedMseLoss::new().forward(predictions, targets, mask);
        // (1 + 4) / 2
        loss.into_data()
            .assert_approx_eq::<f32>(&TensorData::from([2.5]), Default::default());
    }
}
