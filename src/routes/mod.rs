pub mod tx;
pub mod utils;
