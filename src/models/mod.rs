pub mod movie;
pub mod search;

pub use movie::{MediaType, MovieRecord, NewMovieRecord, RecordError, Source};
pub use search::{QueryError, SearchQuery, SearchResult};
