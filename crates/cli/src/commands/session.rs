//! Session commands: store and drop the cart API token.
//!
//! The token lives in the data directory under the `token` key and is read
//! back by every cart command. `login` verifies the token by loading the
//! server cart before persisting it, so a rejected token leaves the
//! previous session in place.

use tracing::info;

use almas_dimas_storefront::storage::StorageError;
use almas_dimas_storefront::{
    AuthSession, CartHolder, FileStorage, StorageBackend, StorefrontConfig,
};

use super::CliError;

/// Storage key for the bearer token.
const TOKEN_KEY: &str = "token";

/// Build a session from the token stored in the data directory.
pub(crate) fn from_storage(storage: &FileStorage) -> Result<AuthSession, StorageError> {
    Ok(match storage.get(TOKEN_KEY)? {
        Some(token) => AuthSession::with_token(token),
        None => AuthSession::guest(),
    })
}

/// Store a cart API token and switch to the server cart.
pub async fn login(token: &str) -> Result<(), CliError> {
    let config = StorefrontConfig::from_env()?;
    let storage = FileStorage::new(&config.data_dir);

    let session = AuthSession::with_token(token);
    let mut holder = CartHolder::from_config(&config, storage.clone(), session);
    let cart = holder.login().await?;
    info!("Signed in; server cart has {} items", cart.item_count());

    storage.set(TOKEN_KEY, token)?;
    Ok(())
}

/// Drop the stored token and return to the guest cart.
pub fn logout() -> Result<(), CliError> {
    let config = StorefrontConfig::from_env()?;
    let storage = FileStorage::new(&config.data_dir);
    storage.remove(TOKEN_KEY)?;
    info!("Signed out; guest cart active");
    Ok(())
}
