pub mod query;
pub mod resolver;
pub mod orchestrator;

pub use query::{query_text, unwrap_redirect_notice, SearchEngine};
pub use resolver::{CrossSiteResolver, Discovery};
pub use orchestrator::{LookupRequest, LookupResponse, Orchestrator};
