use serde::{Deserialize, Serialize};

use super::deployment::Deployment;

/// Frontend framework detected for (or chosen by) a project
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkType {
    Sveltekit,
    React,
    Vue,
    Angular,
    Nextjs,
    Nuxt,
}

/// Backend-as-a-service bundled with a project; the empty string means none.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BaasType {
    Pocketbase,
    Supabase,
    Firebase,
    Appwrite,
    #[default]
    #[serde(rename = "")]
    None,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Pending,
    Deploying,
    Active,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub user_id: i64,
    pub git_url: String,
    pub git_branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_directory: Option<String>,
    pub framework: FrameworkType,
    #[serde(default)]
    pub baas_type: BaasType,
    #[serde(default)]
    pub build_command: String,
    #[serde(default)]
    pub output_dir: String,
    #[serde(default)]
    pub install_command: String,
    #[serde(default)]
    pub node_version: String,
    #[serde(default)]
    pub frontend_port: u16,
    #[serde(default)]
    pub backend_port: u16,
    #[serde(default)]
    pub auto_deploy: bool,
    #[serde(default)]
    pub deployment_path: String,
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_deployed: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployments: Option<Vec<Deployment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environments: Option<Vec<Environment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domains: Option<Vec<Domain>>,
}

/// Body of `POST /projects`. Also used (all-optional) for `PUT /projects/{id}`
/// through [`UpdateProjectRequest`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub git_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_directory: Option<String>,
    pub framework: FrameworkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baas_type: Option<BaasType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frontend_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_deploy: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UpdateProjectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_directory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<FrameworkType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baas_type: Option<BaasType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frontend_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_deploy: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectList {
    pub projects: Vec<Project>,
    #[serde(default)]
    pub total: i64,
}

/// Git coordinates used by detection, branch and directory listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositoryProbe {
    pub git_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_directory: Option<String>,
}

impl RepositoryProbe {
    pub const DEFAULT_BRANCH: &'static str = "main";

    /// Public repository on the default branch.
    pub fn new(git_url: impl Into<String>) -> Self {
        Self {
            git_url: git_url.into(),
            git_branch: Some(Self::DEFAULT_BRANCH.to_string()),
            git_username: None,
            git_token: None,
            root_directory: None,
        }
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.git_branch = Some(branch.into());
        self
    }

    pub fn credentials(mut self, username: impl Into<String>, token: impl Into<String>) -> Self {
        self.git_username = Some(username.into());
        self.git_token = Some(token.into());
        self
    }

    pub fn root_directory(mut self, dir: impl Into<String>) -> Self {
        self.root_directory = Some(dir.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionResult {
    pub framework: FrameworkType,
    #[serde(default)]
    pub baas_type: BaasType,
    pub detected: bool,
    #[serde(default)]
    pub build_command: String,
    #[serde(default)]
    pub install_command: String,
    #[serde(default)]
    pub output_dir: String,
    #[serde(default)]
    pub start_command: String,
    #[serde(default)]
    pub dev_command: String,
    #[serde(default)]
    pub frontend_port: u16,
    #[serde(default)]
    pub backend_port: u16,
    #[serde(default)]
    pub node_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BranchList {
    pub branches: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectoryList {
    pub directories: Vec<String>,
}

/// Project environment variable
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Environment {
    pub id: i64,
    pub project_id: i64,
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub is_secret: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvironmentList {
    pub environments: Vec<Environment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateEnvironmentRequest {
    pub key: String,
    pub value: String,
    pub is_secret: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateEnvironmentRequest {
    pub value: String,
}

/// Custom domain attached to a project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Domain {
    pub id: i64,
    pub project_id: i64,
    pub domain: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub ssl_enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DomainList {
    pub domains: Vec<Domain>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateDomainRequest {
    pub domain: String,
    pub ssl_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UpdateDomainRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
