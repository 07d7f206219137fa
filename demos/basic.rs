//! Basic usage of the character RNN
//!
//! Builds one model per cell kind and feature mode and prints the shapes
//! produced by a forward pass.

use burn::backend::NdArray;
use burn::tensor::{Int, Tensor};
use char_rnn::prelude::*;

fn main() -> Result<(), CharRnnError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== char-rnn Basic Example ===\n");

    // Use the NdArray backend (CPU)
    type Backend = NdArray<f32>;
    let device = Default::default();

    // Input shape: [batch=2, seq=5], vocabulary of 10 tokens
    let tokens = Tensor::<Backend, 2, Int>::from_ints([[0, 1, 2, 3, 4], [9, 8, 7, 6, 5]], &device);

    for mode in [FeatureMode::Embed, FeatureMode::OneHot] {
        for kind in [CellKind::Rnn, CellKind::Lstm, CellKind::Gru] {
            let model = CharRnnConfig::new(10, 4, 16)
                .with_num_layers(2)
                .with_feature_mode(mode)
                .with_cell_kind(kind)
                .init::<Backend>(&device)?;

            let (logits, state) = model.forward(tokens.clone(), None)?;

            println!("{kind} / {mode}:");
            println!("  Logits shape: {:?}", logits.dims());
            println!("  State shape:  {:?} (paired: {})", state.dims(), state.is_pair());
            println!();
        }
    }

    // Out-of-range tokens are rejected rather than clamped
    let model = CharRnnConfig::new(10, 4, 16).init::<Backend>(&device)?;
    let bad = Tensor::<Backend, 2, Int>::from_ints([[0, 10]], &device);
    match model.forward(bad, None) {
        Err(err) => println!("Rejected bad input: {err}"),
        Ok(_) => println!("Unexpectedly accepted bad input"),
    }

    println!("\n=== Examples completed successfully! ===");
    Ok(())
}
