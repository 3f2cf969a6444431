pub mod mailing_list_dto;
pub mod mailing_list_handlers;
pub mod mailing_list_models;
pub mod mailing_list_repository;
pub mod mailing_list_service;

pub use mailing_list_dto::{SubscribeRequest, TokenUnsubscribeRequest, UpdatePreferencesRequest};
pub use mailing_list_handlers::{
    delete_subscription, get_subscription, list_subscriptions, subscribe, unsubscribe,
    unsubscribe_link, unsubscribe_with_token, update_preferences,
};
pub use mailing_list_models::{MailingListAck, MailingListPreferences, Subscription};
pub use mailing_list_service::MailingListService;
