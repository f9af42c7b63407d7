pub mod presets;
pub mod quantity;
pub mod state;
pub mod validation;

#[cfg(test)]
mod tests;

pub use presets::*;
pub use quantity::*;
pub use state::*;
pub use validation::*;
