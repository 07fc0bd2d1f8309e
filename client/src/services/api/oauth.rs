//! # Account-Level OAuth Endpoints
//!
//! Connect the signed-in user's own GitHub or Gitea account (as opposed to a
//! configured [`shared::GitProvider`]).

use shared::{GiteaInitRequest, OAuthUrl, Repository, RepositoryList};

use super::client::ApiClient;
use crate::core::Result;

pub async fn github_auth_url(client: &ApiClient) -> Result<OAuthUrl> {
    client.get("/auth/oauth/github/init").await
}

/// The backend may answer with a body or with 204; either way nothing useful comes back.
pub async fn disconnect_github(client: &ApiClient) -> Result<()> {
    client
        .execute(reqwest::Method::GET, "/auth/oauth/github/disconnect", None, true)
        .await
        .map(|_| ())
}

pub async fn list_github_repositories(client: &ApiClient) -> Result<Vec<Repository>> {
    let list: RepositoryList = client.get("/auth/oauth/github/repositories").await?;
    Ok(list.repositories)
}

#[tracing::instrument(skip(client))]
pub async fn gitea_auth_url(client: &ApiClient, gitea_url: &str) -> Result<OAuthUrl> {
    client
        .post(
            "/auth/oauth/gitea/init",
            &GiteaInitRequest {
                gitea_url: gitea_url.to_string(),
            },
        )
        .await
}

pub async fn disconnect_gitea(client: &ApiClient) -> Result<()> {
    client
        .execute(reqwest::Method::GET, "/auth/oauth/gitea/disconnect", None, true)
        .await
        .map(|_| ())
}

pub async fn list_gitea_repositories(client: &ApiClient) -> Result<Vec<Repository>> {
    let list: RepositoryList = client.get("/auth/oauth/gitea/repositories").await?;
    Ok(list.repositories)
}
