pub mod backends;
pub mod contracts;
pub mod executor;

pub use backends::*;
pub use contracts::*;
pub use executor::*;
