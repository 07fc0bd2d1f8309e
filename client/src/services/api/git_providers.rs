//! # Git Provider Endpoints
//!
//! User-configured GitHub/Gitea/GitLab OAuth applications, their connection
//! state and repository listings.

use shared::{
    CreateProviderRequest, GitProvider, GitProviderList, MessageResponse, OAuthUrl, ProviderType,
    Repository, RepositoryList, UpdateProviderRequest,
};

use super::client::ApiClient;
use crate::core::{ClientError, Result};

pub async fn list_providers(client: &ApiClient) -> Result<Vec<GitProvider>> {
    let list: GitProviderList = client.get("/git-providers").await?;
    Ok(list.providers)
}

pub async fn get_provider(client: &ApiClient, provider_id: i64) -> Result<GitProvider> {
    client.get(&format!("/git-providers/{provider_id}")).await
}

#[tracing::instrument(skip(client, request), fields(provider_type = request.provider_type.as_str(), name = %request.name))]
pub async fn create_provider(client: &ApiClient, request: &CreateProviderRequest) -> Result<GitProvider> {
    client.post("/git-providers", request).await
}

pub async fn update_provider(
    client: &ApiClient,
    provider_id: i64,
    changes: &UpdateProviderRequest,
) -> Result<GitProvider> {
    client.put(&format!("/git-providers/{provider_id}"), changes).await
}

pub async fn delete_provider(client: &ApiClient, provider_id: i64) -> Result<()> {
    client.delete(&format!("/git-providers/{provider_id}")).await
}

/// Drop the stored OAuth token; the provider configuration stays.
pub async fn disconnect_provider(client: &ApiClient, provider_id: i64) -> Result<MessageResponse> {
    client
        .post_empty(&format!("/git-providers/{provider_id}/disconnect"))
        .await
}

pub async fn list_repositories(client: &ApiClient, provider_id: i64) -> Result<Vec<Repository>> {
    let list: RepositoryList = client
        .get(&format!("/git-providers/{provider_id}/repositories"))
        .await?;
    Ok(list.repositories)
}

/// Authorization URL for connecting a provider.
///
/// Only GitHub and Gitea have an OAuth flow; other types fail with
/// [`ClientError::UnsupportedProvider`] without a second request.
#[tracing::instrument(skip(client))]
pub async fn initiate_oauth(client: &ApiClient, provider_id: i64) -> Result<OAuthUrl> {
    let provider = get_provider(client, provider_id).await?;
    let path = match provider.provider_type {
        ProviderType::Github | ProviderType::Gitea => provider.provider_type.as_str(),
        other => {
            tracing::warn!(provider_type = other.as_str(), "OAuth not supported for provider type");
            return Err(ClientError::UnsupportedProvider(other.as_str().to_string()));
        }
    };
    client
        .get(&format!("/auth/oauth/{path}/init?provider_id={provider_id}"))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::client::tests::harness;
    use mockito::Matcher;
    use serde_json::json;

    fn provider_json(provider_type: &str) -> String {
        json!({
            "id": 5,
            "type": provider_type,
            "name": "Company",
            "connected": false,
            "is_default": true,
            "created_at": "2024-05-01T10:00:00Z"
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_initiate_oauth_for_gitea() {
        let mut h = harness().await;
        h.server
            .mock("GET", "/git-providers/5")
            .with_status(200)
            .with_body(provider_json("gitea"))
            .create_async()
            .await;
        let init = h
            .server
            .mock("GET", Matcher::Regex("^/auth/oauth/gitea/init".to_string()))
            .match_query(Matcher::UrlEncoded("provider_id".to_string(), "5".to_string()))
            .with_status(200)
            .with_body(r#"{"url":"https://git.example.com/login/oauth/authorize?client_id=x"}"#)
            .create_async()
            .await;

        let url = initiate_oauth(&h.api, 5).await.unwrap();
        assert!(url.url.starts_with("https://git.example.com/"));
        init.assert_async().await;
    }

    #[tokio::test]
    async fn test_initiate_oauth_rejects_gitlab() {
        let mut h = harness().await;
        h.server
            .mock("GET", "/git-providers/5")
            .with_status(200)
            .with_body(provider_json("gitlab"))
            .create_async()
            .await;

        let err = initiate_oauth(&h.api, 5).await.unwrap_err();
        assert!(matches!(err, ClientError::UnsupportedProvider(ref t) if t == "gitlab"));
    }

    #[tokio::test]
    async fn test_disconnect_returns_message() {
        let mut h = harness().await;
        h.server
            .mock("POST", "/git-providers/5/disconnect")
            .with_status(200)
            .with_body(r#"{"message":"Provider disconnected"}"#)
            .create_async()
            .await;

        let response = disconnect_provider(&h.api, 5).await.unwrap();
        assert_eq!(response.message, "Provider disconnected");
    }
}
