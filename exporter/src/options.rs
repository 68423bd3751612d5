/// Export configuration applied to every conversion.
///
/// These values are fixed so that the same serialized model always yields
/// the same interchange graph; they are not exposed as user options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: &'static str,
    pub opset: u32,
    pub simplify: bool,
    pub verbose: bool,
}

impl ExportOptions {
    pub const PINNED: ExportOptions = ExportOptions {
        format: "onnx",
        opset: 14,
        simplify: true,
        verbose: false,
    };

    /// Keyword arguments for a Python `export(...)` call.
    pub fn python_kwargs(&self) -> String {
        format!(
            "format={:?}, simplify={}, opset={}, verbose={}",
            self.format,
            py_bool(self.simplify),
            self.opset,
            py_bool(self.verbose)
        )
    }
}

fn py_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}
