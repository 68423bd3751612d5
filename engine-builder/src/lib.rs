//! Engine compilation through an external accelerator compiler.
//!
//! TensorRT's `trtexec` performs layer fusion, precision selection and
//! kernel auto-tuning; this crate only drives it: probe, invoke, capture,
//! and move the finished engine into place.

pub mod error;
pub mod trtexec;

pub use error::{CompilerError, Result};
pub use trtexec::EngineBuilder;
