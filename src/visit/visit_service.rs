use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Utc};

use super::{
    visit_models::{TrackOutcome, VisitSummary},
    visit_repository::{NewVisit, VisitRepository},
};
use crate::{admin::AdminUser, error::Result};

const BROWSER_MARKERS: &[&str] = &["chrome", "firefox", "safari", "edge", "opera", "edg", "opr"];

/// Site pages worth counting. A trailing `/*` admits the prefix and anything below it.
const KNOWN_PAGES: &[&str] = &[
    "about",
    "account/*",
    "admin",
    "admin/analytics",
    "admin/comments",
    "admin/community-suggestions",
    "admin/hackathons/*",
    "admin/mailing-list",
    "admin/notifications",
    "admin/posts",
    "admin/sponsors",
    "get-started",
    "hackathons/*",
    "mailing-list",
    "messages",
    "privacy",
    "terms",
    "unsubscribe",
];

const DEFAULT_WINDOW_DAYS: i64 = 30;
const RECENT_VISITS: i64 = 10;

#[derive(Clone)]
pub struct VisitTracker {
    repo: Arc<dyn VisitRepository>,
}

impl VisitTracker {
    pub fn new(repo: Arc<dyn VisitRepository>) -> Self {
        Self { repo }
    }

    /// Records a page view. Views from non-browser agents or of unknown pages
    /// are dropped without an error.
    pub async fn track(
        &self,
        caller: Option<&str>,
        path: &str,
        user_agent: Option<&str>,
        referrer: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<TrackOutcome> {
        if !is_browser(user_agent) || !is_known_page(path) {
            tracing::debug!("Visit to {} not recorded", path);
            return Ok(TrackOutcome { recorded: false });
        }

        self.repo
            .record(&NewVisit {
                user_id: caller.map(str::to_string),
                path: path.to_string(),
                referrer: referrer.filter(|r| !r.is_empty()).map(str::to_string),
                user_agent: user_agent.map(str::to_string),
                created_at: now.trunc_subsecs(0),
            })
            .await?;

        Ok(TrackOutcome { recorded: true })
    }

    pub async fn summary(
        &self,
        _admin: &AdminUser,
        days: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<VisitSummary> {
        let days = days.unwrap_or(DEFAULT_WINDOW_DAYS).clamp(1, 365);
        let since = now - Duration::days(days);

        Ok(VisitSummary {
            since,
            total_visits: self.repo.count_since(since).await?,
            recent: self.repo.recent_since(since, RECENT_VISITS).await?,
        })
    }
}

fn is_browser(user_agent: Option<&str>) -> bool {
    user_agent.map_or(false, |ua| {
        let ua = ua.to_lowercase();
        BROWSER_MARKERS.iter().any(|marker| ua.contains(marker))
    })
}

fn is_known_page(path: &str) -> bool {
    if path == "/" {
        return true;
    }

    let normalized = path.strip_prefix('/').unwrap_or(path);
    if KNOWN_PAGES.contains(&normalized) {
        return true;
    }

    // Every leading run of segments may be covered by a wildcard entry
    let mut prefix = String::new();
    for segment in normalized.split('/') {
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(segment);
        if KNOWN_PAGES
            .iter()
            .any(|page| page.strip_suffix("/*") == Some(prefix.as_str()))
        {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visit::visit_repository::MemoryVisitRepository;
    use chrono::TimeZone;

    const FIREFOX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

    fn tracker() -> VisitTracker {
        VisitTracker::new(Arc::new(MemoryVisitRepository::new()))
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap() + Duration::milliseconds(750)
    }

    #[test]
    fn test_browser_filter() {
        assert!(is_browser(Some(FIREFOX)));
        assert!(is_browser(Some("Mozilla/5.0 ... Edg/120.0")));
        assert!(!is_browser(Some("curl/8.5.0")));
        assert!(!is_browser(Some("Googlebot/2.1")));
        assert!(!is_browser(None));
    }

    #[test]
    fn test_known_pages() {
        assert!(is_known_page("/"));
        assert!(is_known_page("/about"));
        assert!(is_known_page("mailing-list"));
        assert!(is_known_page("/hackathons/spring"));
        assert!(is_known_page("/account/profile/security"));
        assert!(is_known_page("/admin/hackathons/42/edit"));
        assert!(!is_known_page("/wp-login.php"));
        assert!(!is_known_page("/about/team"));
        assert!(!is_known_page(""));
    }

    #[tokio::test]
    async fn test_track_records_browser_views_only() {
        let tracker = tracker();

        let bot = tracker
            .track(None, "/about", Some("curl/8.5.0"), None, now())
            .await
            .unwrap();
        assert!(!bot.recorded);

        let unknown = tracker
            .track(None, "/.env", Some(FIREFOX), None, now())
            .await
            .unwrap();
        assert!(!unknown.recorded);

        let view = tracker
            .track(Some("user_2"), "/hackathons/spring", Some(FIREFOX), Some(""), now())
            .await
            .unwrap();
        assert!(view.recorded);

        let summary = tracker
            .summary(&AdminUser::for_tests("user_1"), None, now())
            .await
            .unwrap();
        assert_eq!(summary.total_visits, 1);
        let visit = &summary.recent[0];
        assert_eq!(visit.user_id.as_deref(), Some("user_2"));
        assert_eq!(visit.path, "/hackathons/spring");
        assert!(visit.referrer.is_none());
        assert_eq!(visit.created_at, Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_summary_window_and_recent_limit() {
        let tracker = tracker();
        let admin = AdminUser::for_tests("user_1");

        tracker
            .track(None, "/about", Some(FIREFOX), None, now() - Duration::days(40))
            .await
            .unwrap();
        for minute in 0..12 {
            tracker
                .track(None, "/", Some(FIREFOX), None, now() - Duration::minutes(minute))
                .await
                .unwrap();
        }

        let month = tracker.summary(&admin, None, now()).await.unwrap();
        assert_eq!(month.total_visits, 12);
        assert_eq!(month.recent.len(), 10);
        assert!(month.recent[0].created_at >= month.recent[9].created_at);

        let quarter = tracker.summary(&admin, Some(90), now()).await.unwrap();
        assert_eq!(quarter.total_visits, 13);
    }
}
