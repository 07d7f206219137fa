//! Multi-layer recurrent layer
//!
//! Unrolls a stack of cells over a time-major sequence, with dropout between
//! layers.

use burn::module::Module;
use burn::nn::{Dropout, DropoutConfig};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::cells::{CellKind, RecurrentCell};
use crate::error::{CharRnnError, Result};
use crate::rnn::HiddenState;

/// Reject layer sizes and dropout values the stack cannot be built with
pub(crate) fn check_stack_params(
    input_size: usize,
    hidden_size: usize,
    num_layers: usize,
    dropout: f64,
) -> Result<()> {
    if input_size == 0 {
        return Err(CharRnnError::Config("input_size must be positive".into()));
    }
    if hidden_size == 0 {
        return Err(CharRnnError::Config("hidden_size must be positive".into()));
    }
    if num_layers == 0 {
        return Err(CharRnnError::Config("num_layers must be positive".into()));
    }
    if !(0.0..1.0).contains(&dropout) {
        return Err(CharRnnError::Config(format!(
            "dropout must be in [0, 1), got {dropout}"
        )));
    }
    Ok(())
}

/// Stacked RNN layer
///
/// Layer 0 consumes the input features; layer `i > 0` consumes the output of
/// layer `i - 1` at the same timestep. All layers share one cell kind.
///
/// Dropout sits between layers for every kind, the simple RNN included, where
/// the usual `nn.RNN` stack takes no dropout at all.
///
/// # Type Parameters
/// * `B` - The backend type
#[derive(Module, Debug)]
pub struct StackedRnn<B: Backend> {
    /// One cell per layer
    layers: Vec<RecurrentCell<B>>,
    /// Applied to every layer output except the last; identity outside training
    dropout: Dropout,
    /// Input size (number of features)
    input_size: usize,
    /// Hidden size of every layer
    hidden_size: usize,
}

impl<B: Backend> StackedRnn<B> {
    /// Create a new stacked RNN
    ///
    /// # Arguments
    /// * `kind` - Cell kind shared by every layer
    /// * `input_size` - Number of input features
    /// * `hidden_size` - Number of hidden units per layer
    /// * `num_layers` - Number of stacked layers (at least one)
    /// * `dropout` - Dropout probability between layers
    /// * `device` - Device to create the module on
    ///
    /// Fails with [`CharRnnError::Config`] on zero sizes, zero layers or a
    /// dropout outside `[0, 1)`.
    pub fn new(
        kind: CellKind,
        input_size: usize,
        hidden_size: usize,
        num_layers: usize,
        dropout: f64,
        device: &B::Device,
    ) -> Result<Self> {
        check_stack_params(input_size, hidden_size, num_layers, dropout)?;

        let layers = (0..num_layers)
            .map(|layer| {
                let layer_input = if layer == 0 { input_size } else { hidden_size };
                RecurrentCell::new(kind, layer_input, hidden_size, device)
            })
            .collect();

        Ok(Self {
            layers,
            dropout: DropoutConfig::new(dropout).init(),
            input_size,
            hidden_size,
        })
    }

    /// Get input size
    pub fn input_size(&self) -> usize {
        self.input_size
    }

    /// Get hidden size
    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn kind(&self) -> CellKind {
        // `new` guarantees at least one layer
        self.layers[0].kind()
    }

    /// Zero state for `batch_size` sequences on `device`
    pub fn zero_state(&self, batch_size: usize, device: &B::Device) -> HiddenState<B> {
        HiddenState::zeros(
            self.kind(),
            self.num_layers(),
            batch_size,
            self.hidden_size,
            device,
        )
    }

    /// Forward pass through all layers
    ///
    /// # Arguments
    /// * `input` - Time-major input of shape `[seq_len, batch, input_size]`
    /// * `state` - Optional initial state `[num_layers, batch, hidden_size]`;
    ///   zeros on the input's device when absent
    ///
    /// # Returns
    /// Tuple of (output, final_state) where:
    /// - output: `[seq_len, batch, hidden_size]`, the last layer at every timestep
    /// - final_state: same shape contract as `state`
    pub fn forward(
        &self,
        input: Tensor<B, 3>,
        state: Option<HiddenState<B>>,
    ) -> Result<(Tensor<B, 3>, HiddenState<B>)> {
        let device = input.device();
        let [seq_len, batch_size, features] = input.dims();

        if seq_len == 0 || batch_size == 0 {
            return Err(CharRnnError::EmptyInput {
                batch: batch_size,
                seq_len,
            });
        }
        if features != self.input_size {
            return Err(CharRnnError::shape(
                [seq_len, batch_size, self.input_size],
                [seq_len, batch_size, features],
            ));
        }

        let state = match state {
            Some(state) => {
                state.validate(
                    self.kind(),
                    self.num_layers(),
                    batch_size,
                    self.hidden_size,
                    &device,
                )?;
                state
            }
            None => self.zero_state(batch_size, &device),
        };

        let last = self.layers.len() - 1;
        let mut layer_input = input;
        let mut final_states = Vec::with_capacity(self.layers.len());

        for (index, cell) in self.layers.iter().enumerate() {
            let mut current = state.layer(index);
            let mut outputs: Vec<Tensor<B, 2>> = Vec::with_capacity(seq_len);

            for t in 0..seq_len {
                // [t, batch, features] -> [batch, features]
                let step_input = layer_input.clone().narrow(0, t, 1).squeeze::<2>(0);
                current = cell.step(step_input, current)?;
                outputs.push(current.hidden());
            }

            let output: Tensor<B, 3> = Tensor::stack(outputs, 0);
            final_states.push(current);

            layer_input = if index < last {
                self.dropout.forward(output)
            } else {
                output
            };
        }

        Ok((layer_input, HiddenState::from_layers(final_states)))
    }
}
