//! Core building blocks shared by the graph pipeline
//!
//! Types, configuration, errors, logging, the series parser and the color and
//! text helpers used by layout and rendering.

mod config;
mod error;
pub mod logging;
mod palette;
mod series;
mod text;
mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use palette::*;
pub use series::*;
pub use text::*;
pub use types::*;
