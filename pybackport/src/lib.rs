// Prevent accidental debug output in library code.
// CLI binaries (bin/) may use eprintln!() for user-facing error messages.
#![deny(clippy::print_stderr)]

// Core modules
pub mod config;
pub mod diagnostics;
pub mod source;

// Rewrite stages: interpolation, annotations, statement form
pub mod stages;

// Pipeline: scan and rewrite source text
pub mod pipeline;
pub use pipeline::RewriteResult;

// Rust API for programmatic use
pub mod api;
pub use api::{transcode, transcode_str, transcode_str_with_config, transcode_with_diagnostics};

pub use config::TranscoderConfig;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use source::{Dialect, SourceUnit};

// Re-export the scanner surface so callers need only one crate
pub use pybackport_scanner as scanner;
