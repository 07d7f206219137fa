//! Feature encoder: maps token indices to per-timestep feature vectors.
//!
//! Two modes are supported:
//! - **Embed**: trainable lookup table, `[batch, seq_len]` -> `[batch, seq_len, embed_dim]`
//! - **OneHot**: stateless, one `[batch, vocab_size]` indicator per timestep
//!
//! Either way [`FeatureEncoder::forward`] returns the time-major layout the
//! recurrent core consumes.

use std::fmt;
use std::str::FromStr;

use burn::module::Module;
use burn::nn::{Embedding, EmbeddingConfig};
use burn::tensor::backend::Backend;
use burn::tensor::{ElementConversion, Int, Tensor};

use crate::error::{CharRnnError, Result};

/// How tokens are turned into features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FeatureMode {
    /// Trainable embedding table of shape `[vocab_size, embed_dim]`
    Embed,
    /// Fixed one-hot vectors of width `vocab_size`
    OneHot,
}

impl fmt::Display for FeatureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureMode::Embed => f.write_str("embed"),
            FeatureMode::OneHot => f.write_str("onehot"),
        }
    }
}

impl FromStr for FeatureMode {
    type Err = CharRnnError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "embed" | "embedding" => Ok(FeatureMode::Embed),
            "onehot" | "one_hot" | "one-hot" => Ok(FeatureMode::OneHot),
            _ => Err(CharRnnError::UnknownFeatureMode(s.to_string())),
        }
    }
}

/// One-hot encode a batch of indices: `[batch]` -> `[batch, num_classes]`
///
/// Indices must already lie in `[0, num_classes)`; see [`check_token_range`].
pub fn one_hot<B: Backend>(indices: Tensor<B, 1, Int>, num_classes: usize) -> Tensor<B, 2> {
    let [batch_size] = indices.dims();
    let device = indices.device();

    let classes = Tensor::<B, 1, Int>::arange(0..num_classes as i64, &device)
        .reshape([1, num_classes])
        .repeat_dim(0, batch_size);
    let targets = indices.reshape([batch_size, 1]).repeat_dim(1, num_classes);

    classes.equal(targets).float()
}

/// Reject any index outside `[0, vocab_size)`
pub fn check_token_range<B: Backend>(tokens: &Tensor<B, 2, Int>, vocab_size: usize) -> Result<()> {
    let min: i64 = tokens.clone().min().into_scalar().elem();
    if min < 0 {
        return Err(CharRnnError::TokenOutOfRange {
            index: min,
            vocab_size,
        });
    }

    let max: i64 = tokens.clone().max().into_scalar().elem();
    if max >= vocab_size as i64 {
        return Err(CharRnnError::TokenOutOfRange {
            index: max,
            vocab_size,
        });
    }

    Ok(())
}

/// Token feature encoder
///
/// Holds an embedding table in [`FeatureMode::Embed`] and nothing trainable
/// in [`FeatureMode::OneHot`].
#[derive(Module, Debug)]
pub struct FeatureEncoder<B: Backend> {
    embedding: Option<Embedding<B>>,
    vocab_size: usize,
}

impl<B: Backend> FeatureEncoder<B> {
    /// Create a new encoder
    ///
    /// # Arguments
    /// * `mode` - Embedding or one-hot
    /// * `vocab_size` - Number of distinct tokens
    /// * `embed_dim` - Embedding width (ignored in one-hot mode)
    /// * `device` - Device to create the embedding table on
    pub fn new(mode: FeatureMode, vocab_size: usize, embed_dim: usize, device: &B::Device) -> Self {
        let embedding = match mode {
            FeatureMode::Embed => Some(EmbeddingConfig::new(vocab_size, embed_dim).init(device)),
            FeatureMode::OneHot => None,
        };

        Self {
            embedding,
            vocab_size,
        }
    }

    pub fn mode(&self) -> FeatureMode {
        if self.embedding.is_some() {
            FeatureMode::Embed
        } else {
            FeatureMode::OneHot
        }
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// Width of each feature vector produced per timestep
    pub fn output_size(&self) -> usize {
        match &self.embedding {
            Some(embedding) => embedding.weight.dims()[1],
            None => self.vocab_size,
        }
    }

    /// One `[batch, vocab_size]` one-hot tensor per timestep
    pub fn one_hot_steps(&self, tokens: Tensor<B, 2, Int>) -> Vec<Tensor<B, 2>> {
        let [_, seq_len] = tokens.dims();
        (0..seq_len)
            .map(|t| {
                let column = tokens.clone().narrow(1, t, 1).squeeze::<1>(1);
                one_hot(column, self.vocab_size)
            })
            .collect()
    }

    /// Encode tokens
    ///
    /// # Arguments
    /// * `tokens` - `[batch, seq_len]` token indices in `[0, vocab_size)`
    ///
    /// # Returns
    /// Time-major features `[seq_len, batch, output_size]`
    pub fn forward(&self, tokens: Tensor<B, 2, Int>) -> Result<Tensor<B, 3>> {
        check_token_range(&tokens, self.vocab_size)?;

        let features = match &self.embedding {
            // [batch, seq, embed] -> [seq, batch, embed]
            Some(embedding) => embedding.forward(tokens).swap_dims(0, 1),
            None => Tensor::stack(self.one_hot_steps(tokens), 0),
        };

        Ok(features)
    }
}
