use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Github,
    Gitea,
    Gitlab,
}

impl ProviderType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Github => "github",
            Self::Gitea => "gitea",
            Self::Gitlab => "gitlab",
        }
    }
}

/// Provider summary; client credentials and OAuth tokens never leave the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitProvider {
    pub id: i64,
    #[serde(rename = "type")]
    pub provider_type: ProviderType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitProviderList {
    pub providers: Vec<GitProvider>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateProviderRequest {
    #[serde(rename = "type")]
    pub provider_type: ProviderType,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub client_id: String,
    pub client_secret: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UpdateProviderRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

/// Authorization URL the user must visit to finish an OAuth flow
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OAuthUrl {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GiteaInitRequest {
    pub gitea_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositoryOwner {
    pub username: String,
}

/// Repository as listed by GitHub or Gitea. Only Gitea reports `owner`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    pub html_url: String,
    pub clone_url: String,
    #[serde(default)]
    pub default_branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<RepositoryOwner>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositoryList {
    pub repositories: Vec<Repository>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_type_field_is_named_type() {
        let provider: GitProvider = serde_json::from_value(json!({
            "id": 4,
            "type": "gitea",
            "name": "Home Gitea",
            "url": "https://git.home.lan",
            "connected": true,
            "username": "ops",
            "is_default": false,
            "created_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(provider.provider_type, ProviderType::Gitea);
        assert_eq!(provider.url.as_deref(), Some("https://git.home.lan"));
    }

    #[test]
    fn test_github_repository_has_no_owner() {
        let repo: Repository = serde_json::from_value(json!({
            "name": "shop",
            "full_name": "acme/shop",
            "private": true,
            "html_url": "https://github.com/acme/shop",
            "clone_url": "https://github.com/acme/shop.git",
            "default_branch": "main"
        }))
        .unwrap();
        assert!(repo.owner.is_none());
    }
}
