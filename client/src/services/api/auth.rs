//! # Authentication Endpoints
//!
//! Login, registration and the current user's profile.

use shared::{AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, User};

use super::client::ApiClient;
use crate::core::Result;

/// Login with email and password.
#[tracing::instrument(skip(client, credentials), fields(email = %credentials.email))]
pub async fn login(client: &ApiClient, credentials: &LoginRequest) -> Result<AuthResponse> {
    tracing::info!("Attempting login");
    let start = std::time::Instant::now();

    let result = client
        .post_anonymous::<_, AuthResponse>("/auth/login", credentials)
        .await;

    match &result {
        Ok(response) => tracing::info!(
            user_id = response.user.id,
            duration_ms = start.elapsed().as_millis() as u64,
            "Login successful"
        ),
        Err(e) => tracing::warn!(
            error = %e,
            duration_ms = start.elapsed().as_millis() as u64,
            "Login failed"
        ),
    }
    result
}

/// Register a new account.
#[tracing::instrument(skip(client, details), fields(email = %details.email))]
pub async fn register(client: &ApiClient, details: &RegisterRequest) -> Result<AuthResponse> {
    client.post_anonymous("/auth/register", details).await
}

/// Profile of the token's owner.
pub async fn current_user(client: &ApiClient) -> Result<User> {
    client.get("/users/me").await
}

pub async fn update_profile(client: &ApiClient, changes: &UpdateProfileRequest) -> Result<User> {
    client.put("/users/me", changes).await
}
