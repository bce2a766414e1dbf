pub mod pool;
pub mod pool_key;

pub use pool::*;
pub use pool_key::*;
