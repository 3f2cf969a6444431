pub mod notification_dto;
pub mod notification_handlers;
pub mod notification_models;
pub mod notification_repository;
pub mod notification_service;
pub mod notification_templates;

pub use notification_dto::SendNotificationRequest;
pub use notification_handlers::{get_notifications, recent_notifications, send_notification};
pub use notification_models::{DispatchReport, Notification};
pub use notification_service::NotificationDispatcher;
pub use notification_templates::NotificationTemplate;
