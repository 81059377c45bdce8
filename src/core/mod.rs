pub mod error;
pub mod quantity;
pub mod terms;
