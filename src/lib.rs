#![forbid(unsafe_code)]

pub mod cli;
pub mod error;
pub mod logging;
pub mod model;
pub mod records;
pub mod shell;
pub mod storage;

pub use error::{FxError, FxResult};
pub use model::{Fixlet, LoadReport, MalformedRowPolicy, OutputFormat};
