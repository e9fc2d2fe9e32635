//! End-to-end tests for the HTTP client side against a live server.
//!
//! The server runs on an ephemeral port backed by mock repositories.
//! Run with: `cargo test --features "axum_api client mocks" --test e2e_client`

#![cfg(all(feature = "axum_api", feature = "client", feature = "mocks"))]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use swifttasks::actions::ProvisionProfileAction;
use swifttasks::api::axum::{AuthState, DashboardState, app};
use swifttasks::client::ApiClient;
use swifttasks::config::OnboardingConfig;
use swifttasks::invitation::{HttpInvitationApi, InvitationResolver};
use swifttasks::onboarding::{Completion, HttpProfileProbe, Reconciler, RedirectReason};
use swifttasks::provisioning::ProfileProvisioner;
use swifttasks::repository::{NewInvitation, Team};
use swifttasks::session::{HttpSessionProvider, LocalSessionProvider};
use swifttasks::{
    AccountType, InvitationRepository, MockDocSpaceRepository, MockIdentityRepository,
    MockInvitationRepository, MockProfileRepository, MockProjectRepository,
    MockSessionTokenRepository, MockTeamRepository, ProfileRepository, SecretString,
    SessionProvider, SignupMetadata, SwiftError, SwiftTasksConfig, TeamRepository,
};
use tokio::net::TcpListener;
use uuid::Uuid;

const PASSWORD: &str = "correct-horse-battery";

type Sessions = LocalSessionProvider<MockIdentityRepository, MockSessionTokenRepository>;

struct Server {
    api: ApiClient,
    sessions: Sessions,
    profiles: MockProfileRepository,
    teams: MockTeamRepository,
    invitations: MockInvitationRepository,
}

impl Server {
    fn resolver(&self) -> InvitationResolver<HttpInvitationApi, HttpSessionProvider> {
        InvitationResolver::new(
            HttpInvitationApi::new(self.api.clone()),
            HttpSessionProvider::new(self.api.clone()),
        )
    }

    async fn seed_invitation(&self, code: &str, email: &str) -> Team {
        let team = self.teams.create("Acme").await.unwrap();
        self.invitations
            .create(NewInvitation {
                code: code.to_owned(),
                email: email.to_owned(),
                team_id: team.id,
                team_name: team.name.clone(),
                invited_by: Uuid::new_v4(),
                expires_at: Utc::now() + Duration::days(7),
            })
            .await
            .unwrap();
        team
    }
}

async fn start_server() -> Server {
    let config = Arc::new(SwiftTasksConfig::development());
    let identities = MockIdentityRepository::new();
    let tokens = MockSessionTokenRepository::new();
    let profiles = MockProfileRepository::new();
    let teams = MockTeamRepository::new();
    let invitations = MockInvitationRepository::new();

    let sessions: Sessions =
        LocalSessionProvider::new(identities.clone(), tokens, config.session.clone());
    let provisioner = ProfileProvisioner::spawn(
        identities.clone(),
        ProvisionProfileAction::new(profiles.clone(), teams.clone(), invitations.clone()),
    );

    let router = app(
        AuthState {
            sessions: sessions.clone(),
            identities,
            profiles: profiles.clone(),
            teams: teams.clone(),
            invitations: invitations.clone(),
            provisioner,
            config: config.clone(),
        },
        DashboardState {
            sessions: sessions.clone(),
            profiles: profiles.clone(),
            doc_spaces: MockDocSpaceRepository::new(),
            projects: MockProjectRepository::new(),
            config,
        },
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Server {
        api: ApiClient::new(format!("http://{addr}")),
        sessions,
        profiles,
        teams,
        invitations,
    }
}

fn fast_onboarding() -> OnboardingConfig {
    OnboardingConfig {
        poll_interval: StdDuration::from_millis(50),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_validate_known_and_unknown_codes() {
    let server = start_server().await;
    let team = server.seed_invitation("ABC123", "a@x.com").await;
    let resolver = server.resolver();

    let validation = resolver.validate("ABC123").await;
    assert!(validation.valid);
    let invite = validation.invite.unwrap();
    assert_eq!(invite.team_name, "Acme");
    assert_eq!(invite.team_id, team.id);
    assert_eq!(invite.email, "a@x.com");

    let unknown = resolver.validate("ZZZ999").await;
    assert!(!unknown.valid);
    assert_eq!(unknown.error.as_deref(), Some("Invitation not found"));

    // rejected locally, never sent
    let malformed = resolver.validate("abc-123").await;
    assert!(!malformed.valid);
}

#[tokio::test]
async fn test_signup_acceptance_reaches_dashboard() {
    let server = start_server().await;
    let team = server.seed_invitation("ABC123", "a@x.com").await;
    let resolver = server.resolver();

    let pending = resolver
        .accept_via_signup("a@x.com", PASSWORD, "Ann", "ABC123")
        .await
        .unwrap();
    let session = pending.session.expect("development config skips verification");

    let handle = Reconciler::spawn(
        HttpProfileProbe::new(server.api.clone(), session.access_token.clone()),
        fast_onboarding(),
    );
    let completion = tokio::time::timeout(StdDuration::from_secs(5), handle.completion())
        .await
        .unwrap();
    assert_eq!(completion, Completion::Dashboard(RedirectReason::ProfileFound));

    let profile = server
        .profiles
        .find_by_id(pending.user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.account_type, AccountType::TeamMember);
    assert_eq!(profile.team_id, Some(team.id));
    assert!(!profile.is_team_owner);

    let members = server.teams.members(team.id).await.unwrap();
    assert!(members.iter().any(|m| m.user_id == pending.user.id));

    let used = resolver.validate("ABC123").await;
    assert!(!used.valid);
    assert_eq!(used.error.as_deref(), Some("Invitation has already been used"));
}

#[tokio::test]
async fn test_token_acceptance_creates_member_profile() {
    let server = start_server().await;
    let team = server.seed_invitation("DEF456", "b@x.com").await;
    let resolver = server.resolver();

    // an identity created out of band, as by an emailed sign-in link
    let outcome = server
        .sessions
        .sign_up("b@x.com", PASSWORD, SignupMetadata::solo("Bea"))
        .await
        .unwrap();
    let link_session = outcome.session.unwrap();

    let invite = resolver.validate("DEF456").await.invite.unwrap();
    let session = resolver
        .accept_via_token(
            link_session.access_token.expose_secret(),
            Some(link_session.refresh_token.expose_secret()),
            "Bea",
            &invite,
        )
        .await
        .unwrap();
    assert_eq!(session.user.id, outcome.user.id);

    let profile = server
        .profiles
        .find_by_id(outcome.user.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.account_type, AccountType::TeamMember);
    assert_eq!(profile.team_id, Some(team.id));
}

#[tokio::test]
async fn test_token_acceptance_requires_refresh_token() {
    let server = start_server().await;
    server.seed_invitation("ABC123", "a@x.com").await;
    let resolver = server.resolver();
    let invite = resolver.validate("ABC123").await.invite.unwrap();

    let result = resolver
        .accept_via_token("some-access-token", None, "Ann", &invite)
        .await;
    assert_eq!(result.unwrap_err(), SwiftError::InvalidToken);

    let blank = resolver
        .accept_via_token("some-access-token", Some("  "), "Ann", &invite)
        .await;
    assert_eq!(blank.unwrap_err(), SwiftError::InvalidToken);
}

#[tokio::test]
async fn test_probe_without_session_sends_to_login() {
    let server = start_server().await;

    let handle = Reconciler::spawn(
        HttpProfileProbe::new(server.api.clone(), SecretString::new("not-a-token")),
        fast_onboarding(),
    );
    let completion = tokio::time::timeout(StdDuration::from_secs(5), handle.completion())
        .await
        .unwrap();
    assert_eq!(completion, Completion::Login);
}

#[tokio::test]
async fn test_http_session_provider_round_trip() {
    let server = start_server().await;
    let sessions = HttpSessionProvider::new(server.api.clone());

    let outcome = sessions
        .sign_up("sam@example.com", PASSWORD, SignupMetadata::solo("Sam"))
        .await
        .unwrap();
    let session = outcome.session.unwrap();

    let user = sessions
        .get_session(session.access_token.expose_secret())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.email, "sam@example.com");

    let refreshed = sessions
        .refresh(session.refresh_token.expose_secret())
        .await
        .unwrap();
    assert_eq!(refreshed.user.id, outcome.user.id);

    sessions
        .sign_out(refreshed.access_token.expose_secret())
        .await
        .unwrap();
    assert!(
        sessions
            .get_session(refreshed.access_token.expose_secret())
            .await
            .unwrap()
            .is_none()
    );

    let wrong = sessions.sign_in("sam@example.com", "wrong-password-1").await;
    assert_eq!(wrong.unwrap_err(), SwiftError::InvalidCredentials);
}
