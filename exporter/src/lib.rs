//! Conversion of serialized models into the ONNX interchange format.
//!
//! # Architecture
//!
//! ```text
//! Converter::convert(model.pt, model.onnx)
//!   ├─▶ stage a private copy of model.pt
//!   ├─▶ Exporter::export(staged.pt, ExportOptions::PINNED)
//!   ├─▶ locate Exporter::default_output(staged.pt)   (missing -> MissingOutput)
//!   └─▶ rename into model.onnx
//! ```

pub mod convert;
pub mod error;
pub mod exporter;
pub mod options;

pub use convert::Converter;
pub use error::{ConversionError, Result};
pub use exporter::{Exporter, UltralyticsExporter};
pub use options::ExportOptions;
