use burn::prelude::*;

/// Applies the ELU function element-wise.
///
/// `elu(x) = x` for `x > 0` and `alpha * (e^x - 1)` otherwise.
pub fn elu<const D: usize, B: Backend>(x: Tensor<B, D>, alpha: f64) -> Tensor<B, D> {
    x.clone().clamp_min(0.0) + (x.clamp_max(0.0).exp() - 1.0) * alpha
}

#[cfg(test)]
mod tests {
    use super::*;

    type B = burn::backend::NdArray<f32, i32>;

    #[test]
    fn positive_passthrough_negative_saturation() {
        let x = Tensor::<B, 1>::from_data([2.0, 0.0, -100.0], &Default::default());
        elu(x, 1.0).into_data().assert_approx_eq::<f32>(
            &TensorData::from([2.0, 0.0, -1.0]),
            Default::default(),
        );
    }
}
