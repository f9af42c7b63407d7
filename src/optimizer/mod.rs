// Reconstitution helper: pick the diluent volume so one dose reads
// exactly 10 units on a 100-unit syringe.

pub mod form;

pub use form::*;
