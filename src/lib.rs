pub mod config;
pub mod dose;
pub mod input;
pub mod optimizer;

#[cfg(target_arch = "wasm32")]
pub mod wasm;
