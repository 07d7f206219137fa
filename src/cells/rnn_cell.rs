//! Elman recurrence with a tanh nonlinearity.

use burn::module::Module;
use burn::nn::{Linear, LinearConfig};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// Simple (Elman) RNN cell
///
/// `h' = tanh(W_ih @ x + b_ih + W_hh @ h + b_hh)`
#[derive(Module, Debug)]
pub struct RnnCell<B: Backend> {
    input_size: usize,
    hidden_size: usize,
    input_map: Linear<B>,
    recurrent_map: Linear<B>,
}

impl<B: Backend> RnnCell<B> {
    /// Create a new RNN cell with biased input and recurrent maps
    pub fn new(input_size: usize, hidden_size: usize, device: &B::Device) -> Self {
        let input_map = LinearConfig::new(input_size, hidden_size)
            .with_bias(true)
            .init(device);

        let recurrent_map = LinearConfig::new(hidden_size, hidden_size)
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

    /// Advance one timestep
    ///
    /// # Arguments
    /// * `input` - `[batch_size, input_size]`
    /// * `hidden_state` - `[batch_size, hidden_size]`
    ///
    /// # Returns
    /// New hidden state `[batch_size, hidden_size]`
    pub fn forward(&self, input: Tensor<B, 2>, hidden_state: Tensor<B, 2>) -> Tensor<B, 2> {
        (self.input_map.forward(input) + self.recurrent_map.forward(hidden_state)).tanh()
    }
}
