//! Hidden state carried between forward calls.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::cells::{CellKind, CellState};
use crate::error::{CharRnnError, Result};

/// Stacked hidden state, shaped `[num_layers, batch, hidden_size]`.
///
/// RNN and GRU layers carry a single tensor; LSTM layers carry the
/// `(hidden, cell)` pair, both with the same shape. The caller owns the state
/// between calls and decides whether to thread it into the next window.
#[derive(Debug, Clone)]
pub enum HiddenState<B: Backend> {
    Single(Tensor<B, 3>),
    Pair {
        hidden: Tensor<B, 3>,
        cell: Tensor<B, 3>,
    },
}

impl<B: Backend> HiddenState<B> {
    /// All-zero state for the given cell kind and shape
    pub fn zeros(
        kind: CellKind,
        num_layers: usize,
        batch_size: usize,
        hidden_size: usize,
        device: &B::Device,
    ) -> Self {
        let shape = [num_layers, batch_size, hidden_size];
        if kind.is_paired() {
            HiddenState::Pair {
                hidden: Tensor::zeros(shape, device),
                cell: Tensor::zeros(shape, device),
            }
        } else {
            HiddenState::Single(Tensor::zeros(shape, device))
        }
    }

    /// `[num_layers, batch, hidden_size]` of the hidden tensor
    pub fn dims(&self) -> [usize; 3] {
        self.hidden().dims()
    }

    pub fn batch_size(&self) -> usize {
        self.dims()[1]
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, HiddenState::Pair { .. })
    }

    pub fn device(&self) -> B::Device {
        self.hidden().device()
    }

    pub fn hidden(&self) -> Tensor<B, 3> {
        match self {
            HiddenState::Single(h) => h.clone(),
            HiddenState::Pair { hidden, .. } => hidden.clone(),
        }
    }

    /// Cell state, present only for LSTM
    pub fn cell(&self) -> Option<Tensor<B, 3>> {
        match self {
            HiddenState::Single(_) => None,
            HiddenState::Pair { cell, .. } => Some(cell.clone()),
        }
    }

    /// Cut the autodiff graph, keeping the values.
    ///
    /// Used when carrying state across training windows (truncated BPTT).
    pub fn detach(self) -> Self {
        match self {
            HiddenState::Single(h) => HiddenState::Single(h.detach()),
            HiddenState::Pair { hidden, cell } => HiddenState::Pair {
                hidden: hidden.detach(),
                cell: cell.detach(),
            },
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            HiddenState::Single(_) => "single",
            HiddenState::Pair { .. } => "pair",
        }
    }

    /// Check variant, shape and device against the expected configuration
    pub fn validate(
        &self,
        kind: CellKind,
        num_layers: usize,
        batch_size: usize,
        hidden_size: usize,
        device: &B::Device,
    ) -> Result<()> {
        let expected_kind = if kind.is_paired() { "pair" } else { "single" };
        if self.is_pair() != kind.is_paired() {
            return Err(CharRnnError::StateKindMismatch {
                expected: expected_kind,
                got: self.kind_name(),
            });
        }

        let expected = [num_layers, batch_size, hidden_size];
        let tensors = match self {
            HiddenState::Single(h) => vec![h],
            HiddenState::Pair { hidden, cell } => vec![hidden, cell],
        };
        for tensor in tensors {
            if tensor.dims() != expected {
                return Err(CharRnnError::shape(expected, tensor.dims()));
            }
            let got = tensor.device();
            if &got != device {
                return Err(CharRnnError::DeviceMismatch {
                    expected: format!("{device:?}"),
                    got: format!("{got:?}"),
                });
            }
        }

        Ok(())
    }

    /// State of a single layer, `[batch, hidden_size]`
    pub(crate) fn layer(&self, index: usize) -> CellState<B> {
        let pick = |t: &Tensor<B, 3>| t.clone().narrow(0, index, 1).squeeze::<2>(0);
        match self {
            HiddenState::Single(h) => CellState::Single(pick(h)),
            HiddenState::Pair { hidden, cell } => CellState::Pair {
                hidden: pick(hidden),
                cell: pick(cell),
            },
        }
    }

    /// Reassemble per-layer final states into a stacked state
    pub(crate) fn from_layers(layers: Vec<CellState<B>>) -> Self {
        let mut hiddens = Vec::with_capacity(layers.len());
        let mut cells = Vec::with_capacity(layers.len());
        for state in layers {
            match state {
                CellState::Single(h) => hiddens.push(h),
                CellState::Pair { hidden, cell } => {
                    hiddens.push(hidden);
                    cells.push(cell);
                }
            }
        }

        let hidden: Tensor<B, 3> = Tensor::stack(hiddens, 0);
        if cells.is_empty() {
            HiddenState::Single(hidden)
        } else {
            HiddenState::Pair {
                hidden,
                cell: Tensor::stack(cells, 0),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use burn::tensor::Int;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_zero_state_shapes() {
        let device = Default::default();

        let single = HiddenState::<TestBackend>::zeros(CellKind::Gru, 2, 5, 7, &device);
        assert!(!single.is_pair());
        assert_eq!(single.dims(), [2, 5, 7]);
        assert_eq!(single.batch_size(), 5);
        assert!(single.cell().is_none());

        let pair = HiddenState::<TestBackend>::zeros(CellKind::Lstm, 2, 5, 7, &device);
        assert!(pair.is_pair());
        assert_eq!(pair.cell().map(|c| c.dims()), Some([2, 5, 7]));

        let total: f32 = pair.hidden().abs().sum().into_scalar();
        assert_eq!(total, 0.0);
    }

    #[test]
    fn test_validate_rejects_wrong_variant() {
        let device = Default::default();
        let state = HiddenState::<TestBackend>::zeros(CellKind::Rnn, 1, 2, 4, &device);

        let err = state
            .validate(CellKind::Lstm, 1, 2, 4, &device)
            .unwrap_err();
        assert!(matches!(err, CharRnnError::StateKindMismatch { .. }));
    }

    #[test]
    fn test_validate_rejects_wrong_shape() {
        let device = Default::default();
        let state = HiddenState::<TestBackend>::zeros(CellKind::Lstm, 2, 3, 4, &device);

        assert!(state.validate(CellKind::Lstm, 2, 3, 4, &device).is_ok());

        let err = state
            .validate(CellKind::Lstm, 2, 1, 4, &device)
            .unwrap_err();
        assert!(matches!(err, CharRnnError::ShapeMismatch { .. }));

        let err = state
            .validate(CellKind::Lstm, 1, 3, 4, &device)
            .unwrap_err();
        assert!(matches!(err, CharRnnError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_layer_split_and_reassemble() {
        let device = Default::default();
        let hidden = Tensor::<TestBackend, 1, Int>::arange(0..24, &device)
            .float()
            .reshape([3, 2, 4]);
        let state = HiddenState::Single(hidden.clone());

        let layers = (0..3).map(|l| state.layer(l)).collect::<Vec<_>>();
        assert_eq!(layers[1].hidden().dims(), [2, 4]);

        let rebuilt = HiddenState::from_layers(layers);
        let diff: f32 = (rebuilt.hidden() - hidden).abs().sum().into_scalar();
        assert_eq!(diff, 0.0);
    }
}
