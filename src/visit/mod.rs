pub mod visit_dto;
pub mod visit_handlers;
pub mod visit_models;
pub mod visit_repository;
pub mod visit_service;

pub use visit_dto::TrackVisitRequest;
pub use visit_handlers::{track_visit, visit_summary};
pub use visit_models::{TrackOutcome, Visit, VisitSummary};
pub use visit_service::VisitTracker;
