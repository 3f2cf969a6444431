pub mod sponsor_dto;
pub mod sponsor_handlers;
pub mod sponsor_models;
pub mod sponsor_repository;
pub mod sponsor_service;

pub use sponsor_dto::{CreateSponsorTierRequest, RejectSponsorRequest, SponsorApplicationRequest};
pub use sponsor_handlers::{
    apply_to_sponsor, approve_sponsor, create_sponsor_tier, list_hackathon_sponsors,
    list_sponsor_tiers, list_sponsors, reject_sponsor,
};
pub use sponsor_models::{Sponsor, SponsorApprovalStatus, SponsorTier};
pub use sponsor_service::SponsorService;
