pub mod traits;
pub mod dom;
pub mod error;
pub mod factory;
pub mod fetch;
pub mod numbers;
pub mod structured;
pub mod templates;
pub mod urls;
pub mod imdb;
pub mod rotten;

pub use traits::{InjectionSummary, SiteAdapter};
pub use dom::{Document, Element};
pub use error::SiteError;
pub use fetch::{FetchedPage, Fetcher, HttpFetcher, MemoryFetcher};
pub use numbers::DisplayLocale;
pub use imdb::ImdbAdapter;
pub use rotten::RottenTomatoesAdapter;
