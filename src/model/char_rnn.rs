//! The character RNN module.

use burn::module::Module;
use burn::nn::{Linear, LinearConfig};
use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor};

use crate::cells::CellKind;
use crate::encoder::{FeatureEncoder, FeatureMode};
use crate::error::{CharRnnError, Result};
use crate::model::CharRnnConfig;
use crate::rnn::{HiddenState, StackedRnn};

/// Character-level recurrent language model
///
/// `tokens [batch, seq_len]` -> encoder -> stacked RNN -> linear projection
/// -> `logits [batch * seq_len, vocab_size]`.
///
/// Built through [`CharRnnConfig::init`]. The module holds no state between
/// calls other than its parameters.
#[derive(Module, Debug)]
pub struct CharRnn<B: Backend> {
    encoder: FeatureEncoder<B>,
    rnn: StackedRnn<B>,
    /// Shared across every (batch, timestep) position
    project: Linear<B>,
    vocab_size: usize,
}

impl<B: Backend> CharRnn<B> {
    /// Allocate parameters for an already validated config
    pub(crate) fn new(config: &CharRnnConfig, device: &B::Device) -> Result<Self> {
        let encoder = FeatureEncoder::new(
            config.feature_mode,
            config.vocab_size,
            config.embed_dim,
            device,
        );

        let rnn = StackedRnn::new(
            config.cell_kind,
            config.rnn_input_size.unwrap_or(encoder.output_size()),
            config.hidden_size,
            config.num_layers,
            config.dropout,
            device,
        )?;

        let project = LinearConfig::new(config.hidden_size, config.vocab_size)
            .with_bias(true)
            .init(device);

        Ok(Self {
            encoder,
            rnn,
            project,
            vocab_size: config.vocab_size,
        })
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    pub fn hidden_size(&self) -> usize {
        self.rnn.hidden_size()
    }

    pub fn num_layers(&self) -> usize {
        self.rnn.num_layers()
    }

    pub fn cell_kind(&self) -> CellKind {
        self.rnn.kind()
    }

    pub fn feature_mode(&self) -> FeatureMode {
        self.encoder.mode()
    }

    /// Device holding the parameters
    pub fn device(&self) -> B::Device {
        self.project.weight.device()
    }

    /// Zero hidden state for `batch_size` sequences, on the module's device
    pub fn init_hidden(&self, batch_size: usize) -> HiddenState<B> {
        self.rnn.zero_state(batch_size, &self.device())
    }

    /// Forward pass
    ///
    /// # Arguments
    /// * `tokens` - `[batch, seq_len]` token indices in `[0, vocab_size)`
    /// * `state` - Optional `[num_layers, batch, hidden_size]` state from a
    ///   previous call; zeros sized from this batch when `None`
    ///
    /// # Returns
    /// Tuple of (logits, new_state) where logits is
    /// `[batch * seq_len, vocab_size]` with row `b * seq_len + t` holding
    /// example `b` at timestep `t`.
    pub fn forward(
        &self,
        tokens: Tensor<B, 2, Int>,
        state: Option<HiddenState<B>>,
    ) -> Result<(Tensor<B, 2>, HiddenState<B>)> {
        let [batch_size, seq_len] = tokens.dims();
        if batch_size == 0 || seq_len == 0 {
            return Err(CharRnnError::EmptyInput {
                batch: batch_size,
                seq_len,
            });
        }

        let device = self.device();
        let input_device = tokens.device();
        if input_device != device {
            return Err(CharRnnError::DeviceMismatch {
                expected: format!("{device:?}"),
                got: format!("{input_device:?}"),
            });
        }

        let state = match state {
            Some(state) => {
                state.validate(
                    self.cell_kind(),
                    self.num_layers(),
                    batch_size,
                    self.hidden_size(),
                    &device,
                )?;
                state
            }
            None => self.init_hidden(batch_size),
        };

        // [seq, batch, features]
        let features = self.encoder.forward(tokens)?;
        let (output, state) = self.rnn.forward(features, Some(state))?;

        let [seq_len, batch_size, hidden_size] = output.dims();
        let logits = self
            .project
            .forward(output.reshape([seq_len * batch_size, hidden_size]))
            .reshape([seq_len, batch_size, self.vocab_size])
            .swap_dims(0, 1)
            .reshape([batch_size * seq_len, self.vocab_size]);

        log::debug!(
            "forward: batch={batch_size} seq_len={seq_len} logits={:?}",
            logits.dims()
        );

        Ok((logits, state))
    }
}
