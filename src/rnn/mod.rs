//! # Stacked Recurrent Core
//!
//! This module unrolls the cells from [`crate::cells`] over a whole sequence
//! and across several stacked layers, and defines the [`HiddenState`] that
//! callers carry between calls.
//!
//! ## Tensor Shapes
//!
//! | Tensor | Shape | Notes |
//! |--------|-------|-------|
//! | input | `[seq_len, batch, input_size]` | Time-major |
//! | output | `[seq_len, batch, hidden_size]` | Top layer at every timestep |
//! | state | `[num_layers, batch, hidden_size]` | Paired `(hidden, cell)` for LSTM |
//!
//! ## Stateful Processing
//!
//! ```ignore
//! let rnn = StackedRnn::<Backend>::new(CellKind::Lstm, 16, 64, 2, 0.1, &device)?;
//!
//! let (out1, state) = rnn.forward(window1, None)?;
//! let (out2, state) = rnn.forward(window2, Some(state.detach()))?;
//! // State persists across windows; `detach` stops gradients at the boundary
//! ```
//!
//! When no state is supplied, a zero state is built from the batch size of
//! the current call, so two calls without explicit state never share memory.

pub mod stacked;
pub mod state;

pub use stacked::StackedRnn;
pub use state::HiddenState;
