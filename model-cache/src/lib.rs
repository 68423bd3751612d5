//! Model acquisition: resolves a model identifier to a serialized model on
//! local storage.
//!
//! Two sources are provided:
//! - [`UltralyticsSource`] loads the model through the Ultralytics Python
//!   package, moves it to the CPU and saves it.
//! - [`HubSource`] downloads a published checkpoint over HTTP.

pub mod acquire;
pub mod download;
pub mod error;
pub mod python;
pub mod source;

pub use acquire::ModelAcquirer;
pub use download::{HubSource, HUGGINGFACE_BASE};
pub use error::{AcquisitionError, Result};
pub use python::UltralyticsSource;
pub use source::ModelSource;
