//! Shared credential checks for the use cases.

use crate::domain::{ChatRepository, Identity, IdentityVerifier, User};

use super::error::ChatError;

/// Verify `token` and resolve the durable user behind it.
pub(crate) async fn authenticate(
    verifier: &dyn IdentityVerifier,
    repository: &dyn ChatRepository,
    token: &str,
) -> Result<(Identity, User), ChatError> {
    let identity = verifier.verify(token)?;
    let user = repository
        .find_user(&identity.user_id)
        .await?
        .ok_or_else(|| ChatError::UserNotFound(identity.user_id.to_string()))?;
    Ok((identity, user))
}

/// Like `authenticate`, but only stored administrators get through.
pub(crate) async fn authenticate_admin(
    verifier: &dyn IdentityVerifier,
    repository: &dyn ChatRepository,
    token: &str,
) -> Result<User, ChatError> {
    let (_, user) = authenticate(verifier, repository, token).await?;
    if !user.is_admin {
        return Err(ChatError::Forbidden);
    }
    Ok(user)
}
