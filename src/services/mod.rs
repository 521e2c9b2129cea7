pub mod batching;
pub mod candidates;
pub mod features;
pub mod providers;
pub mod publisher;
pub mod recommendations;
pub mod recommender;
pub mod similarity;

pub use providers::{CatalogProvider, ProviderConnector};
pub use recommendations::{
    build_recommended_playlist, compute_recommendations, PipelineSettings, PlaylistOutcome,
    RecommendationRun,
};
