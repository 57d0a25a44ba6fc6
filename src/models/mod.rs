pub mod config;
pub mod dataset;
pub mod token;
pub mod turn;

pub use config::*;
pub use dataset::*;
pub use token::*;
pub use turn::*;
