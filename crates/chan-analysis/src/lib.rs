pub mod composer;
pub mod divergence;
pub mod emotion;
pub mod fractal;
pub mod points;
pub mod position;
pub mod stroke;
pub mod strategy;
pub mod trend;


pub use composer::*;
pub use divergence::*;
pub use emotion::*;
pub use fractal::*;
pub use points::*;
pub use position::*;
pub use stroke::*;
pub use strategy::*;
pub use trend::*;
