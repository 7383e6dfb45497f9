//! Single-case design graphs
//!
//! The pipeline stages, in order: [`GraphBuilder`] assembles an immutable
//! [`Graph`], [`PhaseLayoutAlgorithm`] places phases on the session axis,
//! [`GraphRenderer`] draws a [`Figure`], and the exporters encode it as SVG
//! or PNG.

mod builder;
mod document;
pub mod example;
mod export;
mod layout;
mod pipeline;
mod renderer;
mod scene;
mod svg;

pub use builder::*;
pub use document::*;
pub use export::*;
pub use layout::*;
pub use pipeline::*;
pub use renderer::*;
pub use scene::*;
pub use svg::{render_svg, SvgOptions, SvgWriter, FONT_FAMILY, TIGHT_PAD};
