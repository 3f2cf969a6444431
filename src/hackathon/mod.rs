pub mod hackathon_dto;
pub mod hackathon_handlers;
pub mod hackathon_models;
pub mod hackathon_repository;
pub mod hackathon_service;

pub use hackathon_dto::{CreateHackathonRequest, UpdateParticipantNotificationsRequest};
pub use hackathon_handlers::{
    create_hackathon, get_hackathon, join_hackathon, list_hackathons,
    update_participant_notifications,
};
pub use hackathon_models::{Hackathon, HackathonResponse, HackathonStatus, Participant};
pub use hackathon_service::HackathonService;
