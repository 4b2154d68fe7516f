pub mod pool;
pub mod records;

pub use pool::create_pool;
