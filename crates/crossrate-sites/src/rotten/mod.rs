pub mod adapter;
pub mod inject;
pub mod parser;

pub use adapter::RottenTomatoesAdapter;
