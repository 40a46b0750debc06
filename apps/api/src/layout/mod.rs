// Page geometry, text measurement and the surface scale.
// Everything here works in design units; only the scaler knows about surface pixels.

pub mod font_metrics;
pub mod page;
pub mod scaler;
pub mod wrap;

pub use page::PageConfig;
