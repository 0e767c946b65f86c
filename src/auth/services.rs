use tracing::{debug, info};

use crate::{
    auth::{repo::UserRepository, repo_types::User},
    db::RepoError,
};

/// Finds the user for `subject_id`, creating it on first sight.
///
/// Two first requests for the same subject can race to insert; the loser
/// gets a unique violation and reads the winner's row instead.
pub async fn resolve_user(users: &dyn UserRepository, subject_id: &str) -> Result<User, RepoError> {
    if let Some(user) = users.find_by_subject(subject_id).await? {
        return Ok(user);
    }

    match users.create(subject_id).await {
        Ok(user) => {
            info!(user_id = %user.id, "user created on first sign-in");
            Ok(user)
        }
        Err(RepoError::Conflict(_)) => {
            debug!("concurrent user creation, reading existing row");
            users
                .find_by_subject(subject_id)
                .await?
                .ok_or(RepoError::NotFound)
        }
        Err(e) => Err(e),
    }
}
