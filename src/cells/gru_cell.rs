//! Gated recurrent unit.

use burn::module::Module;
use burn::nn::{Linear, LinearConfig};
use burn::tensor::activation;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// GRU cell, gates ordered reset, update, new:
/// - r = sigmoid(W_ir @ x + b_ir + W_hr @ h + b_hr)
/// - z = sigmoid(W_iz @ x + b_iz + W_hz @ h + b_hz)
/// - n = tanh(W_in @ x + b_in + r * (W_hn @ h + b_hn))
/// - h' = (1 - z) * n + z * h
#[derive(Module, Debug)]
pub struct GruCell<B: Backend> {
    input_size: usize,
    hidden_size: usize,
    input_map: Linear<B>,     // Maps input to 3 * hidden_size
    recurrent_map: Linear<B>, // Maps hidden state to 3 * hidden_size
}

impl<B: Backend> GruCell<B> {
    /// Create a new GRU cell
    ///
    /// # Arguments
    /// * `input_size` - Size of the input features
    /// * `hidden_size` - Size of the hidden state
    /// * `device` - Device to create the module on
    pub fn new(input_size: usize, hidden_size: usize, device: &B::Device) -> Self {
        let input_map = LinearConfig::new(input_size, 3 * hidden_size)
            .with_bias(true)
            .init(device);

        let recurrent_map = LinearConfig::new(hidden_size, 3 * hidden_size)
            .with_bias(true)
            .init(device);

        Self {
            input_size,
            hidden_size,
            input_map,
            recurrent_map,
        }
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Advance one timestep: `[batch, input_size]`, `[batch, hidden_size]` -> `[batch, hidden_size]`
    pub fn forward(&self, input: Tensor<B, 2>, hidden_state: Tensor<B, 2>) -> Tensor<B, 2> {
        let gi = self.input_map.forward(input).chunk(3, 1);
        let gh = self.recurrent_map.forward(hidden_state.clone()).chunk(3, 1);

        let reset = activation::sigmoid(gi[0].clone() + gh[0].clone());
        let update = activation::sigmoid(gi[1].clone() + gh[1].clone());
        let candidate = (gi[2].clone() + reset * gh[2].clone()).tanh();

        // (1 - z) * n + z * h == n + z * (h - n)
        candidate.clone() + update * (hidden_state - candidate)
    }
}
