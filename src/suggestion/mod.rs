pub mod suggestion_dto;
pub mod suggestion_handlers;
pub mod suggestion_models;
pub mod suggestion_repository;
pub mod suggestion_service;

pub use suggestion_dto::{CreateSuggestionRequest, SuggestionVoteRequest, UpdateSuggestionRequest};
pub use suggestion_handlers::{
    create_suggestion, delete_suggestion, list_suggestions, update_suggestion, vote_suggestion,
};
pub use suggestion_models::{CommunitySuggestion, SuggestionVoteResponse};
pub use suggestion_service::SuggestionService;
