pub mod active;
pub mod eval;
pub mod resolve;
