//! # char-rnn - Character-level recurrent language model
//!
//! A character RNN built on the Burn framework: a feature encoder (trainable
//! embedding or one-hot), a stack of recurrent layers (simple RNN, LSTM or
//! GRU) and a linear projection back to vocabulary logits at every timestep.
//!
//! ## Features
//!
//! - **Cells**: Elman RNN, LSTM and GRU single-step cells
//! - **Stacked core**: any number of layers with inter-layer dropout
//! - **Encoders**: embedding lookup or one-hot vectors
//! - **Checked forward pass**: token range, hidden-state shape and device are
//!   validated and reported as [`CharRnnError`]
//!
//! ## Quick Start
//!
//! ```rust
//! use burn::backend::NdArray;
//! use burn::tensor::{Int, Tensor};
//! use char_rnn::prelude::*;
//!
//! type Backend = NdArray<f32>;
//! let device = Default::default();
//!
//! let model = CharRnnConfig::new(10, 4, 8)
//!     .with_cell_kind(CellKind::Lstm)
//!     .init::<Backend>(&device)
//!     .unwrap();
//!
//! let tokens = Tensor::<Backend, 2, Int>::from_ints([[0, 1, 2]], &device);
//! let (logits, state) = model.forward(tokens, None).unwrap();
//!
//! assert_eq!(logits.dims(), [3, 10]);
//! assert_eq!(state.dims(), [1, 1, 8]);
//! assert!(state.is_pair());
//! ```
//!
//! ## Training
//!
//! Nothing here trains. Use an autodiff backend, compute a per-token loss
//! against targets flattened the same way as the logits
//! (`[batch * seq_len]`, batch-major), and step a Burn optimizer.

pub mod cells;
pub mod encoder;
pub mod error;
pub mod model;
pub mod rnn;

pub use error::{CharRnnError, Result};

pub mod prelude {
    pub use crate::cells::{CellKind, GruCell, LstmCell, RecurrentCell, RnnCell};
    pub use crate::encoder::{FeatureEncoder, FeatureMode};
    pub use crate::error::CharRnnError;
    pub use crate::model::{CharRnn, CharRnnConfig};
    pub use crate::rnn::{HiddenState, StackedRnn};
}
