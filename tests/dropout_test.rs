//! Inter-layer dropout on an autodiff backend, where it is active

use burn::backend::{Autodiff, NdArray};
use burn::module::AutodiffModule;
use burn::tensor::{Int, Tensor};
use char_rnn::prelude::*;

type Backend = Autodiff<NdArray<f32>>;

fn create_model(kind: CellKind, layers: usize) -> CharRnn<Backend> {
    let device = Default::default();
    CharRnnConfig::new(10, 4, 16)
        .with_num_layers(layers)
        .with_dropout(0.9)
        .with_cell_kind(kind)
        .init(&device)
        .unwrap()
}

fn tokens() -> Tensor<Backend, 2, Int> {
    let device = Default::default();
    Tensor::from_ints([[0, 1, 2, 3, 4], [5, 6, 7, 8, 9]], &device)
}

#[test]
fn test_dropout_changes_stacked_outputs_while_training() {
    for kind in [CellKind::Rnn, CellKind::Lstm, CellKind::Gru] {
        let model = create_model(kind, 2);

        let (first, _) = model.forward(tokens(), None).unwrap();
        let (second, _) = model.forward(tokens(), None).unwrap();

        let diff: f32 = (first - second).abs().max().into_scalar();
        assert!(diff > 0.0, "{} stack should drop units between layers", kind);
    }
}

#[test]
fn test_single_layer_has_nothing_to_drop() {
    for kind in [CellKind::Rnn, CellKind::Lstm, CellKind::Gru] {
        let model = create_model(kind, 1);

        let (first, _) = model.forward(tokens(), None).unwrap();
        let (second, _) = model.forward(tokens(), None).unwrap();

        first.into_data().assert_eq(&second.into_data(), false);
    }
}

#[test]
fn test_inference_copy_disables_dropout() {
    let model = create_model(CellKind::Gru, 3).valid();
    let device = Default::default();
    let input = Tensor::<NdArray<f32>, 2, Int>::from_ints([[0, 1, 2, 3, 4]], &device);

    let (first, _) = model.forward(input.clone(), None).unwrap();
    let (second, _) = model.forward(input, None).unwrap();

    first.into_data().assert_eq(&second.into_data(), false);
}
