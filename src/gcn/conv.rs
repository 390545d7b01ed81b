use crate::graph::Graph;
use burn::module::Param;
use burn::nn::{Initializer, Linear, LinearConfig};
use burn::prelude::*;

/// Graph convolution with symmetric degree normalization,
/// `y = D_in^{-1/2} A (D_out^{-1/2} x W) + b`.
#[derive(Module, Debug)]
pub struct GcnConv<B: Backend> {
    pub fc: Linear<B>,
    /// Added after aggregation, so it is not degree-scaled.
    pub bias: Option<Param<Tensor<B, 1>>>,
}

#[derive(Config, Debug)]
pub struct GcnConvConfig {
    pub in_feats: usize,
    pub out_feats: usize,
    #[config(default = true)]
    pub bias: bool,
}

impl GcnConvConfig {
    /// Returns the initialized layer.
    pub fn init<B: Backend>(&self, device: &B::Device) -> GcnConv<B> {
        GcnConv {
            fc: LinearConfig::new(self.in_feats, self.out_feats)
                .with_bias(false)
                .init(device),
            bias: self
                .bias
                .then(|| Initializer::Zeros.init([self.out_feats], device)),
        }
    }
}

impl<B: Backend> GcnConv<B> {
    /// # Shapes
    ///   - Input [n_nodes, in_feats]
    ///   - Output [n_nodes, out_feats]
    pub fn forward(&self, x: Tensor<B, 2>, g: &Graph<B>) -> Tensor<B, 2> {
        let [n_nodes, _in_feats] = x.dims();
        debug_assert_eq!(n_nodes, g.n_nodes());

        let x = self.fc.forward(x);
        let messages = g.gather(x * g.out_norm());
        let mut x = g.scatter_sum(messages) * g.in_norm();
        if let Some(bias) = &self.bias {
            x = x + bias.val().unsqueeze();
        }
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Csr;

    type B = burn::backend::NdArray<f32, i32>;

    fn device() -> <B as Backend>::Device {
        Default::default()
    }

    #[test]
    fn output_shape() {
        let csr = Csr::new(vec![0, 1, 2], vec![1, 0]).unwrap();
        let g = Graph::from_csr(&csr, &device());
        let conv = GcnConvConfig::new(4, 3).init::<B>(&device());
        let x = Tensor::ones([2, 4], &device());
        assert_eq!(conv.forward(x, &g).dims(), [2, 3]);
    }

    #[test]
    fn forward_is_linear_without_bias() {
        let csr = Csr::new(vec![0, 1, 2], vec![1, 0]).unwrap();
        let g = Graph::from_csr(&csr, &device());
        let conv = GcnConvConfig::new(4, 3).with_bias(false).init::<B>(&device());

        let x = Tensor::<B, 2>::random([2, 4], burn::tensor::Distribution::Default, &device());
        let doubled = conv.forward(x.clone() * 2.0, &g);
        let reference = conv.forward(x, &g) * 2.0;
        doubled
            .into_data()
            .assert_approx_eq::<f32>(&reference.into_data(), Default::default());
    }

    #[test]
    fn symmetric_nodes_agree() {
        // two nodes exchanging edges see mirrored neighborhoods
        let csr = Csr::new(vec![0, 1, 2], vec![1, 0]).unwrap();
        let g = Graph::from_csr(&csr, &device());
        let conv = GcnConvConfig::new(2, 2).init::<B>(&device());

        let x = Tensor::<B, 2>::from_data([[1.0, -2.0], [1.0, -2.0]], &device());
        let y = conv.forward(x, &g);
        let rows = y.chunk(2, 0);
        rows[0]
            .clone()
            .into_data()
            .assert_approx_eq::<f32>(&rows[1].clone().into_data(), Default::default());
    }
}
