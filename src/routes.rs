use crate::{
    admin::admin_authorization,
    hackathon, mailing_list,
    middleware::auth_middleware,
    notification, sponsor, status,
    state::AppState,
    suggestion, visit, vote,
};
use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::mailing_list::mailing_list_handlers::get_subscription,
        crate::mailing_list::mailing_list_handlers::subscribe,
        crate::mailing_list::mailing_list_handlers::unsubscribe,
        crate::mailing_list::mailing_list_handlers::update_preferences,
        crate::mailing_list::mailing_list_handlers::unsubscribe_with_token,
        crate::mailing_list::mailing_list_handlers::list_subscriptions,
        crate::mailing_list::mailing_list_handlers::delete_subscription,
        crate::mailing_list::mailing_list_handlers::unsubscribe_link,
        crate::hackathon::hackathon_handlers::list_hackathons,
        crate::hackathon::hackathon_handlers::get_hackathon,
        crate::hackathon::hackathon_handlers::create_hackathon,
        crate::hackathon::hackathon_handlers::join_hackathon,
        crate::hackathon::hackathon_handlers::update_participant_notifications,
        crate::vote::vote_handlers::submit_vote,
        crate::vote::vote_handlers::vote_counts,
        crate::vote::vote_handlers::my_votes,
        crate::notification::notification_handlers::get_notifications,
        crate::notification::notification_handlers::send_notification,
        crate::notification::notification_handlers::recent_notifications,
        crate::sponsor::sponsor_handlers::apply_to_sponsor,
        crate::sponsor::sponsor_handlers::list_hackathon_sponsors,
        crate::sponsor::sponsor_handlers::list_sponsor_tiers,
        crate::sponsor::sponsor_handlers::list_sponsors,
        crate::sponsor::sponsor_handlers::approve_sponsor,
        crate::sponsor::sponsor_handlers::reject_sponsor,
        crate::sponsor::sponsor_handlers::create_sponsor_tier,
        crate::suggestion::suggestion_handlers::list_suggestions,
        crate::suggestion::suggestion_handlers::create_suggestion,
        crate::suggestion::suggestion_handlers::update_suggestion,
        crate::suggestion::suggestion_handlers::delete_suggestion,
        crate::suggestion::suggestion_handlers::vote_suggestion,
        crate::visit::visit_handlers::track_visit,
        crate::visit::visit_handlers::visit_summary,
        crate::status::get_status,
    ),
    components(
        schemas(
            crate::mailing_list::MailingListPreferences,
            crate::mailing_list::Subscription,
            crate::mailing_list::MailingListAck,
            crate::mailing_list::SubscribeRequest,
            crate::mailing_list::UpdatePreferencesRequest,
            crate::mailing_list::TokenUnsubscribeRequest,
            crate::mailing_list::mailing_list_models::TokenUnsubscribeOutcome,
            crate::mailing_list::mailing_list_models::UnsubscribeLink,
            crate::hackathon::HackathonStatus,
            crate::hackathon::HackathonResponse,
            crate::hackathon::Participant,
            crate::hackathon::CreateHackathonRequest,
            crate::hackathon::UpdateParticipantNotificationsRequest,
            crate::vote::SubmitVoteRequest,
            crate::vote::SubmitVoteResponse,
            crate::vote::VoteOutcome,
            crate::vote::VoteCount,
            crate::vote::Vote,
            crate::notification::Notification,
            crate::notification::DispatchReport,
            crate::notification::NotificationTemplate,
            crate::notification::SendNotificationRequest,
            crate::sponsor::Sponsor,
            crate::sponsor::SponsorTier,
            crate::sponsor::SponsorApprovalStatus,
            crate::sponsor::SponsorApplicationRequest,
            crate::sponsor::RejectSponsorRequest,
            crate::sponsor::CreateSponsorTierRequest,
            crate::suggestion::CommunitySuggestion,
            crate::suggestion::SuggestionVoteResponse,
            crate::suggestion::CreateSuggestionRequest,
            crate::suggestion::UpdateSuggestionRequest,
            crate::suggestion::SuggestionVoteRequest,
            crate::visit::TrackVisitRequest,
            crate::visit::TrackOutcome,
            crate::visit::Visit,
            crate::visit::VisitSummary,
            crate::status::StatusResponse,
            crate::status::ConnectionStatus,
            crate::status::FeatureStatus,
        )
    ),
    tags(
        (name = "mailing-list", description = "Mailing list subscription actions"),
        (name = "hackathons", description = "Hackathon catalogue and participation"),
        (name = "votes", description = "Community voting"),
        (name = "notifications", description = "Participant notifications"),
        (name = "sponsors", description = "Sponsor applications"),
        (name = "community", description = "Community suggestions"),
        (name = "analytics", description = "Page visit tracking"),
        (name = "admin", description = "Admin-only endpoints")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::Http::new(
                        utoipa::openapi::security::HttpAuthScheme::Bearer,
                    ),
                ),
            )
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Action endpoints; they answer 200 with a result envelope
    let mailing_list_routes = Router::new()
        .route("/subscription", get(mailing_list::get_subscription))
        .route("/subscribe", post(mailing_list::subscribe))
        .route("/unsubscribe", post(mailing_list::unsubscribe))
        .route("/preferences", put(mailing_list::update_preferences))
        .route(
            "/unsubscribe-token",
            post(mailing_list::unsubscribe_with_token),
        );

    let hackathon_routes = Router::new()
        .route("/", get(hackathon::list_hackathons))
        .route("/:slug", get(hackathon::get_hackathon))
        .route("/:slug/join", post(hackathon::join_hackathon))
        .route(
            "/:slug/notifications",
            put(hackathon::update_participant_notifications),
        )
        .route("/:slug/votes", get(vote::vote_counts).post(vote::submit_vote))
        .route("/:slug/votes/me", get(vote::my_votes))
        .route(
            "/:slug/sponsors",
            get(sponsor::list_hackathon_sponsors).post(sponsor::apply_to_sponsor),
        )
        .route("/:slug/sponsor-tiers", get(sponsor::list_sponsor_tiers));

    let notification_routes = Router::new().route("/", get(notification::get_notifications));

    let suggestion_admin_routes = Router::new()
        .route(
            "/:id",
            patch(suggestion::update_suggestion).delete(suggestion::delete_suggestion),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_authorization,
        ));

    let suggestion_routes = Router::new()
        .route(
            "/",
            get(suggestion::list_suggestions).post(suggestion::create_suggestion),
        )
        .route("/vote", post(suggestion::vote_suggestion))
        .merge(suggestion_admin_routes);

    let admin_routes = Router::new()
        .route("/mailing-list", get(mailing_list::list_subscriptions))
        .route("/mailing-list/:id", delete(mailing_list::delete_subscription))
        .route(
            "/mailing-list/:id/unsubscribe-link",
            get(mailing_list::unsubscribe_link),
        )
        .route("/hackathons", post(hackathon::create_hackathon))
        .route(
            "/notifications",
            get(notification::recent_notifications).post(notification::send_notification),
        )
        .route("/sponsors", get(sponsor::list_sponsors))
        .route("/sponsors/:id/approve", post(sponsor::approve_sponsor))
        .route("/sponsors/:id/reject", post(sponsor::reject_sponsor))
        .route("/sponsor-tiers", post(sponsor::create_sponsor_tier))
        .route("/visits", get(visit::visit_summary))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_authorization,
        ));

    let status_routes = Router::new()
        .route("/status", get(status::get_status))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_authorization,
        ));

    // Sessions are resolved for every API route; extractors decide who may pass
    let api_routes = Router::new()
        .nest("/mailing-list", mailing_list_routes)
        .nest("/hackathons", hackathon_routes)
        .nest("/notifications", notification_routes)
        .nest("/community-suggestions", suggestion_routes)
        .nest("/admin", admin_routes)
        .route("/visits", post(visit::track_visit))
        .merge(status_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
