//! Hover animations for the hoverfx terminal page.
//!
//! Two effects are provided: a cosmos of stars, nebulae, dust and meteors,
//! and a stock ticker whose trend line sweeps across the screen between
//! floating readouts. Both simulate in virtual pixels and are rasterized
//! into terminal cells by [`raster::Raster`]. [`EffectState`] owns whichever
//! one is running.

pub mod animations;
mod chars;
pub mod color;
pub mod raster;
mod state;
pub mod typewriter;

pub use animations::cosmos::CosmosScene;
pub use animations::ticker::{TickerScene, Trend};
pub use state::EffectState;
