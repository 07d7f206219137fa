//! Character-level language model: encoder, stacked recurrent core and
//! output projection.

pub mod char_rnn;
pub mod config;

pub use char_rnn::CharRnn;
pub use config::CharRnnConfig;
