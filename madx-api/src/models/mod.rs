//! Data types shared by services and HTTP handlers

pub mod requests;
pub mod tree;

pub use requests::{
    optimization_goals, CreateAdCreativeRequest, CreateAdRequest, CreateAdSetRequest,
    CreateCampaignRequest, RecommendRequest, OBJECTIVE_OPTIMIZATION_GOALS,
};
pub use tree::{AccountTree, AdNode, AdSetNode, CampaignInsights, CampaignNode, TreeCounts};
