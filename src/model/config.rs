//! Model configuration.

use burn::config::Config;
use burn::tensor::backend::Backend;

use crate::cells::CellKind;
use crate::encoder::FeatureMode;
use crate::error::CharRnnError;
use crate::model::CharRnn;
use crate::rnn::stacked::check_stack_params;

#[derive(Config, Debug)]
pub struct CharRnnConfig {
    /// Number of distinct tokens; also the output width
    pub vocab_size: usize,

    /// Embedding width, used in embed mode only
    pub embed_dim: usize,

    pub hidden_size: usize,

    #[config(default = "1")]
    pub num_layers: usize,

    /// Dropout between stacked layers, active only while training
    #[config(default = "0.0")]
    pub dropout: f64,

    #[config(default = "FeatureMode::Embed")]
    pub feature_mode: FeatureMode,

    #[config(default = "CellKind::Rnn")]
    pub cell_kind: CellKind,

    /// Input width of the first recurrent layer. Derived from the encoder
    /// when unset; must equal the encoder output width when set.
    pub rnn_input_size: Option<usize>,
}

impl CharRnnConfig {
    /// Build a config from mode/kind names such as `"embed"` and `"LSTM"`
    pub fn from_names(
        vocab_size: usize,
        embed_dim: usize,
        hidden_size: usize,
        num_layers: usize,
        dropout: f64,
        feature_mode: &str,
        cell_kind: &str,
    ) -> crate::error::Result<Self> {
        Ok(Self::new(vocab_size, embed_dim, hidden_size)
            .with_num_layers(num_layers)
            .with_dropout(dropout)
            .with_feature_mode(feature_mode.parse()?)
            .with_cell_kind(cell_kind.parse()?))
    }

    /// Width of the feature vectors the encoder emits
    pub fn encoder_output_size(&self) -> usize {
        match self.feature_mode {
            FeatureMode::Embed => self.embed_dim,
            FeatureMode::OneHot => self.vocab_size,
        }
    }

    /// Check the configuration without allocating parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.vocab_size == 0 {
            return Err(CharRnnError::Config("vocab_size must be positive".into()));
        }
        if self.feature_mode == FeatureMode::Embed && self.embed_dim == 0 {
            return Err(CharRnnError::Config(
                "embed_dim must be positive in embed mode".into(),
            ));
        }
        check_stack_params(
            self.encoder_output_size(),
            self.hidden_size,
            self.num_layers,
            self.dropout,
        )?;

        let encoder = self.encoder_output_size();
        if let Some(recurrent) = self.rnn_input_size {
            if recurrent != encoder {
                return Err(CharRnnError::WidthMismatch { encoder, recurrent });
            }
        }

        Ok(())
    }

    /// Validate and initialize the model on `device`
    pub fn init<B: Backend>(&self, device: &B::Device) -> crate::error::Result<CharRnn<B>> {
        self.validate()?;

        if self.dropout > 0.0 && self.num_layers == 1 {
            log::warn!(
                "dropout={} has no effect with a single recurrent layer",
                self.dropout
            );
        }

        let model = CharRnn::new(self, device)?;
        log::info!(
            "using {} cell: {} layer(s), hidden={}, vocab={}, features={} ({} params)",
            self.cell_kind,
            self.num_layers,
            self.hidden_size,
            self.vocab_size,
            self.feature_mode,
            burn::module::Module::num_params(&model)
        );

        Ok(model)
    }
}
