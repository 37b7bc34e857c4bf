//! pagelib command line
//!
//! Argument handling and the prerender pass behind the `pagelib` binary.

pub mod args;
pub mod prerender;

pub use args::{Args, ArgsError, Command, USAGE};
pub use prerender::{load_config, prerender, PrerenderReport};
