pub mod animation;
pub mod error;
pub mod format;
pub mod ops;
pub mod suite;
pub mod synthetic;
pub mod timing;

pub use animation::{analyze_gif, resize_gif, GifAnalysis, GifMode};
pub use error::{Error, Result};
pub use format::OutputFormat;
pub use suite::{BenchCase, BenchKind, CaseReport, Runner, Suite};
pub use timing::{Summary, Timings};
