use burn::module::Module;
use burn::nn::{Linear, LinearConfig};
use burn::tensor::activation;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// Long short-term memory cell
///
/// Implements the standard LSTM equations, gates ordered input, forget, cell, output:
/// - i = sigmoid(W_ii @ x + b_ii + W_hi @ h + b_hi)
/// - f = sigmoid(W_if @ x + b_if + W_hf @ h + b_hf)
/// - g = tanh(W_ig @ x + b_ig + W_hg @ h + b_hg)
/// - o = sigmoid(W_io @ x + b_io + W_ho @ h + b_ho)
/// - c' = f * c + i * g
/// - h' = o * tanh(c')
#[derive(Module, Debug)]
pub struct LstmCell<B: Backend> {
    input_size: usize,
    hidden_size: usize,
    input_map: Linear<B>,     // Maps input to 4 * hidden_size
    recurrent_map: Linear<B>, // Maps hidden state to 4 * hidden_size
}

impl<B: Backend> LstmCell<B> {
    /// Create a new LSTM cell
    ///
    /// # Arguments
    /// * `input_size` - Size of the input features
    /// * `hidden_size` - Size of the hidden state
    /// * `device` - Device to create the module on
    pub fn new(input_size: usize, hidden_size: usize, device: &B::Device) -> Self {
        let input_map = LinearConfig::new(input_size, 4 * hidden_size)
            .with_bias(true)
            .init(device);

        let recurrent_map = LinearConfig::new(hidden_size, 4 * hidden_size)
            .with_bias(true)
            .init(device);

        Self {
            input_size,
            hidden_size,
            input_map,
            recurrent_map,
        }
    }

    /// Get the input size
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Get the hidden size
    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Perform a forward pass through the LSTM cell
    ///
    /// # Arguments
    /// * `input` - Input tensor of shape `[batch_size, input_size]`
    /// * `states` - Tuple of (hidden_state, cell_state), each of shape `[batch_size, hidden_size]`
    ///
    /// # Returns
    /// Tuple of (new_hidden_state, new_cell_state)
    pub fn forward(
        &self,
        input: Tensor<B, 2>,
        states: (Tensor<B, 2>, Tensor<B, 2>),
    ) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let (hidden_state, cell_state) = states;

        let z = self.input_map.forward(input) + self.recurrent_map.forward(hidden_state);

        let chunks = z.chunk(4, 1);
        let input_gate = activation::sigmoid(chunks[0].clone());
        let forget_gate = activation::sigmoid(chunks[1].clone());
        let candidate = chunks[2].clone().tanh();
        let output_gate = activation::sigmoid(chunks[3].clone());

        let new_cell = cell_state * forget_gate + candidate * input_gate;
        let new_hidden = new_cell.clone().tanh() * output_gate;

        (new_hidden, new_cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::backend::Backend as BurnBackend;
    use burn::tensor::Distribution;

    type TestBackend = NdArray<f32>;
    type TestDevice = <TestBackend as BurnBackend>::Device;

    fn get_test_device() -> TestDevice {
        Default::default()
    }

    #[test]
    fn test_lstm_cell_creation() {
        let device = get_test_device();
        let cell = LstmCell::<TestBackend>::new(20, 50, &device);

        assert_eq!(cell.input_size(), 20);
        assert_eq!(cell.hidden_size(), 50);
    }

    #[test]
    fn test_lstm_forward() {
        let device = get_test_device();
        let cell = LstmCell::<TestBackend>::new(20, 50, &device);

        let batch_size = 4;
        let input = Tensor::<TestBackend, 2>::zeros([batch_size, 20], &device);
        let h = Tensor::<TestBackend, 2>::zeros([batch_size, 50], &device);
        let c = Tensor::<TestBackend, 2>::zeros([batch_size, 50], &device);

        let (new_h, new_c) = cell.forward(input, (h, c));

        assert_eq!(new_h.dims(), [batch_size, 50]);
        assert_eq!(new_c.dims(), [batch_size, 50]);
    }

    #[test]
    fn test_lstm_state_persistence() {
        let device = get_test_device();
        let cell = LstmCell::<TestBackend>::new(10, 20, &device);

        let mut h = Tensor::<TestBackend, 2>::zeros([1, 20], &device);
        let mut c = Tensor::<TestBackend, 2>::zeros([1, 20], &device);

        for _ in 0..3 {
            let input =
                Tensor::<TestBackend, 2>::random([1, 10], Distribution::Uniform(0.0, 1.0), &device);
            (h, c) = cell.forward(input, (h, c));
        }

        let h_sum = h.abs().sum().into_scalar();
        let c_sum = c.abs().sum().into_scalar();
        assert!(
            h_sum != 0.0 || c_sum != 0.0,
            "States should have changed after processing sequence"
        );
    }

    #[test]
    fn test_lstm_hidden_bounded_by_one() {
        let device = get_test_device();
        let cell = LstmCell::<TestBackend>::new(10, 20, &device);

        let h = Tensor::<TestBackend, 2>::zeros([1, 20], &device);
        let c = Tensor::<TestBackend, 2>::ones([1, 20], &device) * 10.0;
        let input =
            Tensor::<TestBackend, 2>::random([1, 10], Distribution::Uniform(-5.0, 5.0), &device);

        let (new_h, _) = cell.forward(input, (h, c));

        // h' = o * tanh(c') with o in (0, 1)
        let max_abs: f32 = new_h.abs().max().into_scalar();
        assert!(max_abs < 1.0);
    }

    #[test]
    fn test_lstm_batch_sizes() {
        let device = get_test_device();
        let cell = LstmCell::<TestBackend>::new(20, 50, &device);

        for batch_size in [1, 4, 16, 32] {
            let input = Tensor::<TestBackend, 2>::zeros([batch_size, 20], &device);
            let h = Tensor::<TestBackend, 2>::zeros([batch_size, 50], &device);
            let c = Tensor::<TestBackend, 2>::zeros([batch_size, 50], &device);

            let (new_h, new_c) = cell.forward(input, (h, c));

            assert_eq!(new_h.dims(), [batch_size, 50]);
            assert_eq!(new_c.dims(), [batch_size, 50]);
        }
    }

    #[test]
    fn test_lstm_matches_hand_computed_gates() {
        use crate::cells::reference::{affine, assert_close, rows, sigmoid};

        let device = get_test_device();
        let hidden = 4;
        let cell = LstmCell::<TestBackend>::new(3, hidden, &device);

        let input =
            Tensor::<TestBackend, 2>::random([2, 3], Distribution::Uniform(-1.0, 1.0), &device);
        let h = Tensor::<TestBackend, 2>::random(
            [2, hidden],
            Distribution::Uniform(-1.0, 1.0),
            &device,
        );
        let c = Tensor::<TestBackend, 2>::random(
            [2, hidden],
            Distribution::Uniform(-1.0, 1.0),
            &device,
        );

        let x_in = affine(&cell.input_map, &rows(input.clone()));
        let h_in = affine(&cell.recurrent_map, &rows(h.clone()));
        let c_rows = rows(c.clone());

        let mut expected_h = Vec::new();
        let mut expected_c = Vec::new();
        for b in 0..2 {
            // Column blocks of width `hidden`, in the order i, f, g, o
            let pre = |gate: usize, j: usize| x_in[b][gate * hidden + j] + h_in[b][gate * hidden + j];
            let mut h_row = Vec::new();
            let mut c_row = Vec::new();
            for j in 0..hidden {
                let i = sigmoid(pre(0, j));
                let f = sigmoid(pre(1, j));
                let g = pre(2, j).tanh();
                let o = sigmoid(pre(3, j));
                let c_new = f * c_rows[b][j] + i * g;
                c_row.push(c_new);
                h_row.push(o * c_new.tanh());
            }
            expected_h.push(h_row);
            expected_c.push(c_row);
        }

        let (new_h, new_c) = cell.forward(input, (h, c));
        assert_close(new_h, &expected_h);
        assert_close(new_c, &expected_c);
    }
}
