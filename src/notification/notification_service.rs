use std::sync::Arc;

use super::{
    notification_dto::SendNotificationRequest,
    notification_models::{DispatchReport, Notification},
    notification_repository::{NewNotification, NotificationRepository},
};
use crate::{
    admin::AdminUser,
    error::{AppError, Result},
    hackathon::hackathon_repository::HackathonRepository,
};

const DEFAULT_RECENT_LIMIT: i64 = 50;
const MAX_RECENT_LIMIT: i64 = 200;

/// Broadcasts admin messages to hackathon participants.
///
/// Sending writes a single record; participants with notifications enabled
/// see it in their inbox. There is no per-recipient delivery.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifications: Arc<dyn NotificationRepository>,
    hackathons: Arc<dyn HackathonRepository>,
    public_base_url: String,
}

impl NotificationDispatcher {
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        hackathons: Arc<dyn HackathonRepository>,
        public_base_url: String,
    ) -> Self {
        Self {
            notifications,
            hackathons,
            public_base_url,
        }
    }

    pub async fn send(
        &self,
        admin: &AdminUser,
        payload: SendNotificationRequest,
    ) -> Result<DispatchReport> {
        let hackathon = self
            .hackathons
            .find_by_id(payload.hackathon_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Hackathon not found".to_string()))?;

        let rendered = payload.template.map(|template| {
            template.render(&hackathon, &self.public_base_url, payload.voting_duration_hours)
        });

        let explicit = |field: Option<String>| {
            field
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let title = explicit(payload.title).or_else(|| rendered.as_ref().map(|r| r.title.clone()));
        let message =
            explicit(payload.message).or_else(|| rendered.as_ref().map(|r| r.message.clone()));

        let (title, message) = match (title, message) {
            (Some(title), Some(message)) => (title, message),
            _ => {
                return Err(AppError::Validation(
                    "Title and message are required".to_string(),
                ))
            }
        };

        let recipients = self.hackathons.notifiable_participants(hackathon.id).await?;
        let recipient_count = recipients.len() as i64;

        let notification = self
            .notifications
            .create(&NewNotification {
                hackathon_id: hackathon.id,
                title,
                message,
                recipient_count,
                sent_by: Some(admin.id().to_string()),
            })
            .await?;

        tracing::info!(
            "Admin {} sent notification {} for {} to {} participants",
            admin.id(),
            notification.id,
            hackathon.slug,
            recipient_count
        );

        Ok(DispatchReport {
            notification,
            recipient_count,
            message: format!("Notification sent to {} participants", recipient_count),
        })
    }

    /// Notifications of every hackathon the user follows, newest first.
    pub async fn inbox(&self, user_id: &str) -> Result<Vec<Notification>> {
        let hackathon_ids = self.hackathons.notifiable_hackathon_ids(user_id).await?;
        self.notifications.list_for_hackathons(&hackathon_ids).await
    }

    pub async fn recent(&self, _admin: &AdminUser, limit: Option<i64>) -> Result<Vec<Notification>> {
        let limit = limit
            .unwrap_or(DEFAULT_RECENT_LIMIT)
            .clamp(1, MAX_RECENT_LIMIT);
        self.notifications.list_recent(limit).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        hackathon::hackathon_repository::{MemoryHackathonRepository, NewHackathon},
        notification::{
            notification_repository::MemoryNotificationRepository,
            notification_templates::NotificationTemplate,
        },
    };
    use chrono::Utc;
    use uuid::Uuid;

    async fn setup() -> (NotificationDispatcher, Arc<MemoryHackathonRepository>, Uuid) {
        let hackathons = Arc::new(MemoryHackathonRepository::new());
        let now = Utc::now();
        let hackathon = hackathons
            .create(&NewHackathon {
                slug: "spring".to_string(),
                title: "Spring".to_string(),
                description: None,
                start_date: now,
                end_date: now,
                location_type: "virtual".to_string(),
                has_voting: false,
                voting_categories: vec![],
            })
            .await
            .unwrap();

        let dispatcher = NotificationDispatcher::new(
            Arc::new(MemoryNotificationRepository::new()),
            hackathons.clone(),
            "https://vibecode.party".to_string(),
        );
        (dispatcher, hackathons, hackathon.id)
    }

    fn plain(hackathon_id: Uuid) -> SendNotificationRequest {
        SendNotificationRequest {
            hackathon_id,
            title: Some("Heads up".to_string()),
            message: Some("Doors open at nine".to_string()),
            template: None,
            voting_duration_hours: None,
        }
    }

    #[tokio::test]
    async fn test_send_counts_only_participants_with_notifications_enabled() {
        let (dispatcher, hackathons, id) = setup().await;
        let admin = AdminUser::for_tests("user_1");
        hackathons.join(id, "user_2").await.unwrap();
        hackathons.join(id, "user_3").await.unwrap();
        hackathons.join(id, "user_4").await.unwrap();
        hackathons.set_notifications(id, "user_4", false).await.unwrap();

        let report = dispatcher.send(&admin, plain(id)).await.unwrap();
        assert_eq!(report.recipient_count, 2);
        assert_eq!(report.notification.sent_by.as_deref(), Some("user_1"));

        assert_eq!(dispatcher.inbox("user_2").await.unwrap().len(), 1);
        assert!(dispatcher.inbox("user_4").await.unwrap().is_empty());
        assert_eq!(dispatcher.recent(&admin, None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_send_without_participants_still_records() {
        let (dispatcher, _, id) = setup().await;
        let admin = AdminUser::for_tests("user_1");

        let report = dispatcher.send(&admin, plain(id)).await.unwrap();
        assert_eq!(report.recipient_count, 0);
        assert_eq!(dispatcher.recent(&admin, Some(10)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_send_renders_template_unless_overridden() {
        let (dispatcher, _, id) = setup().await;
        let admin = AdminUser::for_tests("user_1");

        let report = dispatcher
            .send(
                &admin,
                SendNotificationRequest {
                    hackathon_id: id,
                    title: Some("  ".to_string()),
                    message: None,
                    template: Some(NotificationTemplate::GoingLive),
                    voting_duration_hours: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(report.notification.title, "Spring is Now Live");

        let overridden = dispatcher
            .send(
                &admin,
                SendNotificationRequest {
                    title: Some("Custom".to_string()),
                    template: Some(NotificationTemplate::GoingLive),
                    ..plain(id)
                },
            )
            .await
            .unwrap();
        assert_eq!(overridden.notification.title, "Custom");
        assert_eq!(overridden.notification.message, "Doors open at nine");
    }

    #[tokio::test]
    async fn test_send_rejects_missing_content_and_unknown_hackathon() {
        let (dispatcher, _, id) = setup().await;
        let admin = AdminUser::for_tests("user_1");

        let empty = dispatcher
            .send(
                &admin,
                SendNotificationRequest {
                    message: None,
                    ..plain(id)
                },
            )
            .await;
        assert!(matches!(empty, Err(AppError::Validation(_))));

        let unknown = dispatcher.send(&admin, plain(Uuid::new_v4())).await;
        assert!(matches!(unknown, Err(AppError::NotFound(_))));
    }
}
