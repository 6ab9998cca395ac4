//! Matrix client creation.
//!
//! The first start logs in with the bot password and persists the session;
//! later starts restore it. Both build the client on the sqlite store of the
//! [`SessionStore`], encrypted with the configured passphrase.

use anyhow::Context;
use log::{debug, info};
use matrix_sdk::{Client, ruma::OwnedUserId};

use crate::matrix::{UserCredentials, session::SessionStore};

async fn build_client(
    user_id: &OwnedUserId,
    user_credentials: &UserCredentials,
    session_store: &SessionStore,
) -> anyhow::Result<Client> {
    let client = Client::builder()
        .server_name(user_id.server_name())
        .sqlite_store(
            session_store.sqlite_path(),
            Some(&user_credentials.passphrase),
        )
        .build()
        .await?;

    debug!("matrix client created");
    Ok(client)
}

async fn login(
    user_credentials: &UserCredentials,
    session_store: &SessionStore,
) -> anyhow::Result<Client> {
    info!("logging in as {}", user_credentials.user_id);

    let user_id: OwnedUserId = user_credentials.user_id.clone().try_into()?;
    let client = build_client(&user_id, user_credentials, session_store).await?;

    client
        .matrix_auth()
        .login_username(user_id, &user_credentials.password)
        .initial_device_display_name("quincy bot")
        .send()
        .await?;

    let user_session = client
        .matrix_auth()
        .session()
        .context("no session after login")?;
    session_store
        .persist_user_session(&user_session)
        .await
        .context("error persisting user session")?;

    info!("logged in");
    Ok(client)
}

async fn restore(
    user_credentials: &UserCredentials,
    session_store: &SessionStore,
) -> anyhow::Result<Client> {
    info!("restoring matrix session from disk");

    let user_session = session_store
        .user_session()
        .context("no session to restore")?
        .clone();
    let user_id: OwnedUserId = user_credentials.user_id.clone().try_into()?;
    let client = build_client(&user_id, user_credentials, session_store).await?;

    client.restore_session(user_session).await?;

    info!("matrix session restored");
    Ok(client)
}

/// Returns a logged-in client, restoring the stored session when there is one.
///
/// # Errors
///
/// Fails when the user id is invalid, the store cannot be opened or the
/// homeserver refuses the credentials.
pub async fn setup_client(
    user_credentials: &UserCredentials,
    session_store: &SessionStore,
) -> anyhow::Result<Client> {
    if session_store.has_session() {
        restore(user_credentials, session_store).await
    } else {
        login(user_credentials, session_store).await
    }
}
