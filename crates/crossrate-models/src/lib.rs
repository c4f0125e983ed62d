pub mod error;
pub mod movie;
pub mod rating;
pub mod site;

pub use error::ModelError;
pub use movie::{MovieInfo, MovieInfoWithRatings, Summary};
pub use rating::{Favorability, Ratings};
pub use site::SiteName;

/// Length of the IMDb "Top Rated Movies" chart; positions outside 1..=TOPLIST_SIZE are discarded.
pub const TOPLIST_SIZE: u16 = 250;
