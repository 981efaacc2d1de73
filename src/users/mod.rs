pub mod model;
pub mod storage;

pub use storage::UserStorage;
