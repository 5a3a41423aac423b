pub mod links;
pub mod markdown;

pub use links::*;
pub use markdown::*;
