//! Sentence Search command line front end
//!
//! Reads a plain-text file, splits it into sentences, indexes them and prints
//! the sentences nearest in meaning to each query.

pub mod app;
pub mod args;
pub mod output;

pub use app::run;
pub use args::Args;
