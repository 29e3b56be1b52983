//! HTTP clients for external services.

mod identity_client;

#[cfg(test)]
pub use identity_client::MockIdentityProvider;
pub use identity_client::{
    IdentityError, IdentityProvider, IdentityResult, SignUpParams, SupabaseAuthClient,
};
