//! Training Demo - next-character prediction
//!
//! Runs a few optimizer steps on an autodiff backend. The loss compares the
//! flattened logits `[batch * seq_len, vocab]` against targets flattened the
//! same way (batch-major).

use std::collections::BTreeSet;

use burn::backend::{Autodiff, NdArray};
use burn::nn::loss::CrossEntropyLossConfig;
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::tensor::{Int, Tensor, TensorData};
use char_rnn::prelude::*;

type Backend = Autodiff<NdArray<f32>>;

const CORPUS: &str = "hello world, hello rust, hello recurrent networks. ";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let device = Default::default();
    let alphabet: Vec<char> = CORPUS.chars().collect::<BTreeSet<_>>().into_iter().collect();
    let ids: Vec<i64> = CORPUS
        .chars()
        .filter_map(|c| alphabet.iter().position(|&a| a == c))
        .map(|i| i as i64)
        .collect();

    // Non-overlapping windows, target shifted by one character
    let seq_len = 8;
    let batch_size = (ids.len() - 1) / seq_len;
    let mut inputs = Vec::with_capacity(batch_size * seq_len);
    let mut targets = Vec::with_capacity(batch_size * seq_len);
    for b in 0..batch_size {
        let start = b * seq_len;
        inputs.extend_from_slice(&ids[start..start + seq_len]);
        targets.extend_from_slice(&ids[start + 1..start + seq_len + 1]);
    }

    let inputs =
        Tensor::<Backend, 2, Int>::from_data(TensorData::new(inputs, [batch_size, seq_len]), &device);
    let targets = Tensor::<Backend, 1, Int>::from_data(
        TensorData::new(targets, [batch_size * seq_len]),
        &device,
    );

    let config = CharRnnConfig::new(alphabet.len(), 16, 32)
        .with_num_layers(2)
        .with_dropout(0.1)
        .with_cell_kind(CellKind::Gru);
    let mut model = config.init::<Backend>(&device)?;

    let mut optim = AdamConfig::new().init();
    let loss_fn = CrossEntropyLossConfig::new().init(&device);

    println!("Training on {batch_size} windows of {seq_len} characters");
    for step in 1..=30 {
        let (logits, _) = model.forward(inputs.clone(), None)?;
        let loss = loss_fn.forward(logits, targets.clone());

        if step % 5 == 0 {
            println!("  step {step:>3}: loss {:.4}", loss.clone().into_scalar());
        }

        let grads = GradientsParams::from_grads(loss.backward(), &model);
        model = optim.step(1e-2, model, grads);
    }

    println!("Done.");
    Ok(())
}
