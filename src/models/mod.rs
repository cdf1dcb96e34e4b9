pub mod condition;
pub mod enums;

pub use condition::*;
