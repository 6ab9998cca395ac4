//! Matrix transport.
//!
//! - [`session`] - session file and sqlite store locations
//! - [`login`] - password login or session restore
//! - [`sync`] - sync loop producing [`ChatEvent`](crate::transport::ChatEvent)s
//! - [`client`] - [`MatrixClient`], implementing [`Messenger`](crate::transport::Messenger)

mod client;
mod login;
mod session;
mod sync;

pub use crate::matrix::client::MatrixClient;

/// Credentials of the bot account.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: String,
    pub password: String,
    /// Passphrase encrypting the sqlite store
    pub passphrase: String,
}
