// Utils compartidos

pub mod constants;
pub mod phone;
pub mod storage;

pub use constants::*;
pub use phone::*;
pub use storage::*;
