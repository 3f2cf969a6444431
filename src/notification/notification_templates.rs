use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::hackathon::Hackathon;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationTemplate {
    GoingLive,
    EndedWithVoting,
    EndedNoVoting,
}

pub struct RenderedNotification {
    pub title: String,
    pub message: String,
}

impl NotificationTemplate {
    pub fn render(
        self,
        hackathon: &Hackathon,
        base_url: &str,
        voting_duration_hours: Option<u32>,
    ) -> RenderedNotification {
        let url = format!("{}/hackathons/{}", base_url, hackathon.slug);
        let name = &hackathon.title;

        match self {
            NotificationTemplate::GoingLive => RenderedNotification {
                title: format!("{} is Now Live", name),
                message: format!(
                    "The {name} hackathon has officially begun!\n\n\
                     Time to start building!\n\
                     • You can now create your project and start submitting code\n\
                     • You can connect your project to your GitHub repository\n\
                     • Make sure you post project updates so they show up on the activity feed!\n\n\
                     View the hackathon and submit your project here:\n{url}\n\n\
                     Good luck and happy hacking!"
                ),
            },
            NotificationTemplate::EndedWithVoting => {
                let duration = voting_duration_hours
                    .map(|hours| format!(" and will run for {} hours", hours))
                    .unwrap_or_default();
                let categories = if hackathon.voting_categories.is_empty() {
                    String::new()
                } else {
                    let lines: Vec<String> = hackathon
                        .voting_categories
                        .iter()
                        .map(|c| format!("• {}", c))
                        .collect();
                    format!("\n\nVoting Categories:\n{}", lines.join("\n"))
                };

                RenderedNotification {
                    title: format!("{} - Submissions Closed", name),
                    message: format!(
                        "The {name} hackathon has officially ended and submissions are now closed!\n\n\
                         What happens next:\n\
                         • Community voting is now open{duration}\n\
                         • Review and vote on other projects to support the community{categories}\n\
                         • Winners will be announced after the voting period\n\
                         • Stay tuned for the results announcement\n\n\
                         Vote for your favorite projects here:\n{url}\n\n\
                         Thank you for participating and good luck in the voting phase!"
                    ),
                }
            }
            NotificationTemplate::EndedNoVoting => {
                let format = "%A, %B %-d, %Y %H:%M UTC";
                RenderedNotification {
                    title: format!("{} - Submissions Closed", name),
                    message: format!(
                        "The {name} hackathon has officially ended and submissions are now closed!\n\n\
                         What happens next:\n\
                         • Our judges will begin reviewing all submissions\n\
                         • Winners will be announced soon\n\
                         • Stay tuned for the results announcement\n\n\
                         View all submissions here:\n{url}\n\n\
                         Thank you for participating and making this hackathon a success!\n\n\
                         Final Statistics:\n\
                         • Hackathon Duration: {} to {}\n\
                         • Location Type: {}",
                        hackathon.start_date.format(format),
                        hackathon.end_date.format(format),
                        hackathon.location_type,
                    ),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn hackathon(categories: Vec<&str>) -> Hackathon {
        let start = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 3, 18, 0, 0).unwrap();
        Hackathon {
            id: Uuid::new_v4(),
            slug: "spring-jam".to_string(),
            title: "Spring Jam".to_string(),
            description: None,
            start_date: start,
            end_date: end,
            location_type: "virtual".to_string(),
            has_voting: !categories.is_empty(),
            voting_categories: categories.into_iter().map(str::to_string).collect(),
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn test_going_live_links_to_hackathon() {
        let rendered =
            NotificationTemplate::GoingLive.render(&hackathon(vec![]), "https://vibecode.party", None);

        assert_eq!(rendered.title, "Spring Jam is Now Live");
        assert!(rendered
            .message
            .contains("https://vibecode.party/hackathons/spring-jam"));
    }

    #[test]
    fn test_ended_with_voting_lists_categories_and_duration() {
        let rendered = NotificationTemplate::EndedWithVoting.render(
            &hackathon(vec!["Best Overall", "Most Fun"]),
            "https://vibecode.party",
            Some(48),
        );

        assert_eq!(rendered.title, "Spring Jam - Submissions Closed");
        assert!(rendered.message.contains("will run for 48 hours"));
        assert!(rendered.message.contains("• Best Overall\n• Most Fun"));
    }

    #[test]
    fn test_ended_no_voting_reports_dates() {
        let rendered = NotificationTemplate::EndedNoVoting.render(
            &hackathon(vec![]),
            "https://vibecode.party",
            None,
        );

        assert!(rendered.message.contains("Sunday, June 1, 2025 09:00 UTC"));
        assert!(rendered.message.contains("Location Type: virtual"));
    }

    #[test]
    fn test_template_names_on_the_wire() {
        let template: NotificationTemplate = serde_json::from_str("\"ended_with_voting\"").unwrap();
        assert_eq!(template, NotificationTemplate::EndedWithVoting);
    }
}
