pub mod popularity;
pub mod recommendations;
pub mod tfidf;

pub use popularity::PopularityRanker;
pub use recommendations::Recommender;
