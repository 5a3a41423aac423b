pub mod examples;
pub mod health;
pub mod search;
pub mod tool;

pub use examples::*;
pub use health::*;
pub use search::*;
pub use tool::*;
