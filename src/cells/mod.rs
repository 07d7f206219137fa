//! # Recurrent Cell Implementations
//!
//! Single-timestep cells. These process one timestep at a time and are stacked
//! and unrolled over a sequence by [`crate::rnn::StackedRnn`].
//!
//! ## Cell Types
//!
//! | Cell | Update rule | State |
//! |------|-------------|-------|
//! | [`RnnCell`] | `h = tanh(W_ih x + b_ih + W_hh h + b_hh)` | `h` |
//! | [`LstmCell`] | four gates (input, forget, cell, output) | `(h, c)` |
//! | [`GruCell`] | reset/update gates | `h` |
//!
//! ## Tensor Shapes
//!
//! All cells expect 2D tensors for single-timestep processing:
//!
//! | Tensor | Shape |
//! |--------|-------|
//! | `input` | `[batch, input_size]` |
//! | `hidden_state` / `cell_state` | `[batch, hidden_size]` |
//!
//! ## Example
//!
//! ```rust
//! use burn::backend::NdArray;
//! use burn::tensor::Tensor;
//! use char_rnn::cells::{CellKind, CellState, RecurrentCell};
//!
//! type Backend = NdArray<f32>;
//! let device = Default::default();
//!
//! let cell = RecurrentCell::<Backend>::new(CellKind::Lstm, 16, 32, &device);
//! let state = CellState::zeros(CellKind::Lstm, 4, 32, &device);
//! let input = Tensor::<Backend, 2>::zeros([4, 16], &device);
//!
//! let next = cell.step(input, state).unwrap();
//! assert_eq!(next.hidden().dims(), [4, 32]);
//! ```

pub mod gru_cell;
pub mod lstm_cell;
pub mod rnn_cell;

pub use gru_cell::GruCell;
pub use lstm_cell::LstmCell;
pub use rnn_cell::RnnCell;

use std::fmt;
use std::str::FromStr;

use burn::module::Module;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::error::CharRnnError;

/// Which recurrence rule the layers use. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CellKind {
    Rnn,
    Lstm,
    Gru,
}

impl CellKind {
    pub fn name(&self) -> &'static str {
        match self {
            CellKind::Rnn => "RNN",
            CellKind::Lstm => "LSTM",
            CellKind::Gru => "GRU",
        }
    }

    /// Whether the state is a (hidden, cell) pair
    pub fn is_paired(&self) -> bool {
        matches!(self, CellKind::Lstm)
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CellKind {
    type Err = CharRnnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RNN" => Ok(CellKind::Rnn),
            "LSTM" => Ok(CellKind::Lstm),
            "GRU" => Ok(CellKind::Gru),
            _ => Err(CharRnnError::UnknownCellKind(s.to_string())),
        }
    }
}

/// Per-layer state carried between timesteps
#[derive(Debug, Clone)]
pub enum CellState<B: Backend> {
    Single(Tensor<B, 2>),
    Pair {
        hidden: Tensor<B, 2>,
        cell: Tensor<B, 2>,
    },
}

impl<B: Backend> CellState<B> {
    pub fn zeros(kind: CellKind, batch_size: usize, hidden_size: usize, device: &B::Device) -> Self {
        let zeros = || Tensor::<B, 2>::zeros([batch_size, hidden_size], device);
        if kind.is_paired() {
            CellState::Pair {
                hidden: zeros(),
                cell: zeros(),
            }
        } else {
            CellState::Single(zeros())
        }
    }

    /// The hidden output of the cell, which feeds the next layer
    pub fn hidden(&self) -> Tensor<B, 2> {
        match self {
            CellState::Single(h) => h.clone(),
            CellState::Pair { hidden, .. } => hidden.clone(),
        }
    }
}

/// One of the three cell kinds, chosen once at construction
#[derive(Module, Debug)]
pub enum RecurrentCell<B: Backend> {
    Rnn(RnnCell<B>),
    Lstm(LstmCell<B>),
    Gru(GruCell<B>),
}

impl<B: Backend> RecurrentCell<B> {
    pub fn new(kind: CellKind, input_size: usize, hidden_size: usize, device: &B::Device) -> Self {
        match kind {
            CellKind::Rnn => RecurrentCell::Rnn(RnnCell::new(input_size, hidden_size, device)),
            CellKind::Lstm => RecurrentCell::Lstm(LstmCell::new(input_size, hidden_size, device)),
            CellKind::Gru => RecurrentCell::Gru(GruCell::new(input_size, hidden_size, device)),
        }
    }

    pub fn kind(&self) -> CellKind {
        match self {
            RecurrentCell::Rnn(_) => CellKind::Rnn,
            RecurrentCell::Lstm(_) => CellKind::Lstm,
            RecurrentCell::Gru(_) => CellKind::Gru,
        }
    }

    pub fn input_size(&self) -> usize {
        match self {
            RecurrentCell::Rnn(cell) => cell.input_size(),
            RecurrentCell::Lstm(cell) => cell.input_size(),
            RecurrentCell::Gru(cell) => cell.input_size(),
        }
    }

    pub fn hidden_size(&self) -> usize {
        match self {
            RecurrentCell::Rnn(cell) => cell.hidden_size(),
            RecurrentCell::Lstm(cell) => cell.hidden_size(),
            RecurrentCell::Gru(cell) => cell.hidden_size(),
        }
    }

    /// Advance one timestep.
    ///
    /// Fails with [`CharRnnError::StateKindMismatch`] when the state variant
    /// does not belong to this cell kind.
    pub fn step(&self, input: Tensor<B, 2>, state: CellState<B>) -> Result<CellState<B>, CharRnnError> {
        match (self, state) {
            (RecurrentCell::Lstm(cell), CellState::Pair { hidden, cell: c }) => {
                let (hidden, cell_state) = cell.forward(input, (hidden, c));
                Ok(CellState::Pair {
                    hidden,
                    cell: cell_state,
                })
            }
            (RecurrentCell::Rnn(cell), CellState::Single(hidden)) => {
                Ok(CellState::Single(cell.forward(input, hidden)))
            }
            (RecurrentCell::Gru(cell), CellState::Single(hidden)) => {
                Ok(CellState::Single(cell.forward(input, hidden)))
            }
            (RecurrentCell::Lstm(_), CellState::Single(_)) => Err(CharRnnError::StateKindMismatch {
                expected: "pair",
                got: "single",
            }),
            (_, CellState::Pair { .. }) => Err(CharRnnError::StateKindMismatch {
                expected: "single",
                got: "pair",
            }),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_cell_kind_parsing() {
        assert_eq!("RNN".parse::<CellKind>().unwrap(), CellKind::Rnn);
        assert_eq!("lstm".parse::<CellKind>().unwrap(), CellKind::Lstm);
        assert_eq!(" Gru ".parse::<CellKind>().unwrap(), CellKind::Gru);

        let err = "transformer".parse::<CellKind>().unwrap_err();
        assert_eq!(err, CharRnnError::UnknownCellKind("transformer".to_string()));
    }

    #[test]
    fn test_cell_kind_display_round_trip() {
        for kind in [CellKind::Rnn, CellKind::Lstm, CellKind::Gru] {
            assert_eq!(kind.to_string().parse::<CellKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_recurrent_cell_dispatch() {
        let device = Default::default();

        for kind in [CellKind::Rnn, CellKind::Lstm, CellKind::Gru] {
            let cell = RecurrentCell::<TestBackend>::new(kind, 6, 10, &device);
            assert_eq!(cell.kind(), kind);
            assert_eq!(cell.input_size(), 6);
            assert_eq!(cell.hidden_size(), 10);

            let state = CellState::zeros(kind, 3, 10, &device);
            let input = Tensor::<TestBackend, 2>::ones([3, 6], &device);
            let next = cell.step(input, state).unwrap();

            assert_eq!(next.hidden().dims(), [3, 10]);
            assert_eq!(matches!(next, CellState::Pair { .. }), kind.is_paired());
        }
    }

    #[test]
    fn test_step_rejects_state_of_other_kind() {
        let device = Default::default();
        let input = Tensor::<TestBackend, 2>::ones([2, 4], &device);

        for kind in [CellKind::Rnn, CellKind::Gru] {
            let cell = RecurrentCell::<TestBackend>::new(kind, 4, 6, &device);
            let err = cell
                .step(input.clone(), CellState::zeros(CellKind::Lstm, 2, 6, &device))
                .unwrap_err();
            assert_eq!(
                err,
                CharRnnError::StateKindMismatch {
                    expected: "single",
                    got: "pair"
                }
            );
        }

        let lstm = RecurrentCell::<TestBackend>::new(CellKind::Lstm, 4, 6, &device);
        let err = lstm
            .step(input, CellState::zeros(CellKind::Rnn, 2, 6, &device))
            .unwrap_err();
        assert_eq!(
            err,
            CharRnnError::StateKindMismatch {
                expected: "pair",
                got: "single"
            }
        );
    }
}
