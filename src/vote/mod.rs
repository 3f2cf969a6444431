pub mod vote_dto;
pub mod vote_handlers;
pub mod vote_models;
pub mod vote_repository;
pub mod vote_service;

pub use vote_dto::SubmitVoteRequest;
pub use vote_handlers::{my_votes, submit_vote, vote_counts};
pub use vote_models::{SubmitVoteResponse, Vote, VoteCount, VoteOutcome};
pub use vote_service::VoteService;
