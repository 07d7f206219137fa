//! Sampling loop
//!
//! Feeds one character at a time, threading the hidden state between calls
//! and sampling the next character from the softmax of the logits. The model
//! is untrained, so the output is noise drawn from the corpus alphabet.

use std::collections::BTreeSet;

use burn::backend::NdArray;
use burn::tensor::activation::softmax;
use burn::tensor::{Int, Tensor, TensorData};
use char_rnn::prelude::*;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;

type Backend = NdArray<f32>;

const CORPUS: &str = "the quick brown fox jumps over the lazy dog";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let device = Default::default();
    let alphabet: Vec<char> = CORPUS.chars().collect::<BTreeSet<_>>().into_iter().collect();

    let model = CharRnnConfig::new(alphabet.len(), 16, 64)
        .with_num_layers(2)
        .with_cell_kind(CellKind::Lstm)
        .init::<Backend>(&device)?;

    let temperature = 0.8f32;
    let mut rng = StdRng::seed_from_u64(42);

    let mut token = alphabet.iter().position(|&c| c == 't').unwrap_or(0);
    let mut state: Option<HiddenState<Backend>> = None;
    let mut text = String::from(alphabet[token]);

    for _ in 0..60 {
        let input = Tensor::<Backend, 2, Int>::from_data(
            TensorData::new(vec![token as i64], [1, 1]),
            &device,
        );
        let (logits, next) = model.forward(input, state)?;
        state = Some(next);

        let probs = softmax(logits / temperature, 1)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| format!("{e:?}"))?;
        token = WeightedIndex::new(&probs)?.sample(&mut rng);
        text.push(alphabet[token]);
    }

    println!("Sampled: {text}");
    Ok(())
}
