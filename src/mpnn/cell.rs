//! Single-step recurrent cells.
//!
//! Message passing threads a recurrent state through one update per
//! propagation step, so these are plain cells rather than whole-sequence
//! modules.

use burn::nn::{Linear, LinearConfig};
use burn::prelude::*;
use burn::tensor::activation::{sigmoid, tanh};

/// One step of a gated recurrent unit.
#[derive(Module, Debug)]
pub struct GruCell<B: Backend> {
    /// Input projection onto the reset, update and candidate gates.
    pub gates_x: Linear<B>,
    /// Hidden-state projection onto the same gates.
    pub gates_h: Linear<B>,
    pub d_hidden: usize,
}

#[derive(Config, Debug)]
pub struct GruCellConfig {
    pub d_input: usize,
    pub d_hidden: usize,
}

impl GruCellConfig {
    /// Returns the initialized cell.
    pub fn init<B: Backend>(&self, device: &B::Device) -> GruCell<B> {
        GruCell {
            gates_x: LinearConfig::new(self.d_input, 3 * self.d_hidden).init(device),
            gates_h: LinearConfig::new(self.d_hidden, 3 * self.d_hidden).init(device),
            d_hidden: self.d_hidden,
        }
    }
}

impl<B: Backend> GruCell<B> {
    /// # Shapes
    ///   - input [batch, d_input]
    ///   - state [batch, d_hidden]
    ///   - Output [batch, d_hidden]
    pub fn forward(&self, input: Tensor<B, 2>, state: Tensor<B, 2>) -> Tensor<B, 2> {
        let [batch, d_hidden] = state.dims();
        debug_assert_eq!(d_hidden, self.d_hidden);

        let gx = self.gates_x.forward(input).chunk(3, 1);
        let gh = self.gates_h.forward(state.clone()).chunk(3, 1);
        let [xr, xz, xn] = <[_; 3]>::try_from(gx).expect("three input gates");
        let [hr, hz, hn] = <[_; 3]>::try_from(gh).expect("three hidden gates");

        let reset = sigmoid(xr + hr);
        let update = sigmoid(xz + hz);
        let candidate = tanh(xn + reset * hn);

        // h' = update * h + (1 - update) * candidate
        let out = candidate.clone() + update * (state - candidate);
        debug_assert_eq!([batch, d_hidden], out.dims());
        out
    }
}

/// Hidden and cell state carried between [`LstmCell`] steps.
#[derive(Debug, Clone)]
pub struct LstmCellState<B: Backend> {
    pub hidden: Tensor<B, 2>,
    pub cell: Tensor<B, 2>,
}

impl<B: Backend> LstmCellState<B> {
    /// Zeroed state for a fresh sequence.
    pub fn empty(batch: usize, d_hidden: usize, device: &B::Device) -> Self {
        LstmCellState {
            hidden: Tensor::zeros([batch, d_hidden], device),
            cell: Tensor::zeros([batch, d_hidden], device),
        }
    }
}

/// One step of a long short-term memory cell.
#[derive(Module, Debug)]
pub struct LstmCell<B: Backend> {
    /// Input projection onto the input, forget, candidate and output gates.
    pub gates_x: Linear<B>,
    /// Hidden-state projection onto the same gates.
    pub gates_h: Linear<B>,
    pub d_hidden: usize,
}

#[derive(Config, Debug)]
pub struct LstmCellConfig {
    pub d_input: usize,
    pub d_hidden: usize,
}

impl LstmCellConfig {
    /// Returns the initialized cell.
    pub fn init<B: Backend>(&self, device: &B::Device) -> LstmCell<B> {
        LstmCell {
            gates_x: LinearConfig::new(self.d_input, 4 * self.d_hidden).init(device),
            gates_h: LinearConfig::new(self.d_hidden, 4 * self.d_hidden).init(device),
            d_hidden: self.d_hidden,
        }
    }
}

impl<B: Backend> LstmCell<B> {
    /// # Shapes
    ///   - input [batch, d_input]
    ///   - Output [batch, d_hidden] (alongside the next state)
    pub fn forward(
        &self,
        input: Tensor<B, 2>,
        state: LstmCellState<B>,
    ) -> (Tensor<B, 2>, LstmCellState<B>) {
        let [batch, d_hidden] = state.hidden.dims();
        debug_assert_eq!(d_hidden, self.d_hidden);

        let gx = self.gates_x.forward(input).chunk(4, 1);
        let gh = self.gates_h.forward(state.hidden).chunk(4, 1);
        let [xi, xf, xg, xo] = <[_; 4]>::try_from(gx).expect("four input gates");
        let [hi, hf, hg, ho] = <[_; 4]>::try_from(gh).expect("four hidden gates");

        let input_gate = sigmoid(xi + hi);
        let forget_gate = sigmoid(xf + hf);
        let candidate = tanh(xg + hg);
        let output_gate = sigmoid(xo + ho);

        let cell = forget_gate * state.cell + input_gate * candidate;
        let hidden = output_gate * tanh(cell.clone());
        debug_assert_eq!([batch, d_hidden], hidden.dims());

        (hidden.clone(), LstmCellState { hidden, cell })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type B = burn::backend::NdArray<f32, i32>;

    #[test]
    fn gru_keeps_shape_and_range() {
        let device = Default::default();
        let cell = GruCellConfig::new(3, 5).init::<B>(&device);
        let input = Tensor::random([4, 3], burn::tensor::Distribution::Default, &device);
        let state = Tensor::zeros([4, 5], &device);
        let out = cell.forward(input, state);
        assert_eq!(out.dims(), [4, 5]);
        // every output is a convex mix of tanh candidates and the zero state
        assert!(out.abs().max().into_scalar() < 1.0);
    }

    #[test]
    fn lstm_threads_state() {
        let device = Default::default();
        let cell = LstmCellConfig::new(2, 3).init::<B>(&device);
        let state = LstmCellState::empty(1, 3, &device);
        let input = Tensor::ones([1, 2], &device);

        let (first, state) = cell.forward(input.clone(), state);
        let (second, _state) = cell.forward(input, state);
        assert_eq!(first.dims(), [1, 3]);
        // the carried state must influence the second step
        let diff: f32 = (second - first).abs().sum().into_scalar();
        assert!(diff > 0.0);
    }
}
