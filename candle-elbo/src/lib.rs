pub mod elbo;
pub mod gaussian;
pub mod loss_functions;

pub use candle_core;
pub use candle_nn;
