pub mod goal;
pub mod validation;

pub use goal::*;
pub use validation::*;
