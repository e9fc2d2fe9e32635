//! Embedded schema migrations.
//!
//! Creates, in order:
//! - `identities`, `session_tokens`
//! - `teams`, `team_members`, `profiles`, `team_invitations`
//! - `doc_spaces`, `doc_pages`, `projects`, `boards`, `board_columns`, `board_statuses`
//! - `teams.created_by`, one founded team per identity
//!
//! Foreign keys cascade on delete. CHECK constraints hold the single-owner
//! rule for doc spaces and projects and the account type/team rules for
//! profiles.

use sqlx::PgPool;

pub async fn run(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
