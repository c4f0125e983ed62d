pub mod adapter;
pub mod inject;
pub mod parser;

pub use adapter::{ImdbAdapter, STAR_LOGO_URL};
