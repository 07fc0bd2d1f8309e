//! # Project Endpoints
//!
//! Projects, repository probing (framework detection, branches, directories),
//! environment variables and custom domains.

use shared::{
    BranchList, CreateDomainRequest, CreateEnvironmentRequest, CreateProjectRequest,
    DetectionResult, DirectoryList, Domain, DomainList, Environment, EnvironmentList, Project,
    ProjectList, RepositoryProbe, UpdateDomainRequest, UpdateEnvironmentRequest,
    UpdateProjectRequest,
};

use super::client::ApiClient;
use crate::core::Result;

#[tracing::instrument(skip(client))]
pub async fn list_projects(client: &ApiClient) -> Result<ProjectList> {
    let start = std::time::Instant::now();
    let list: ProjectList = client.get("/projects").await?;
    tracing::debug!(
        count = list.projects.len(),
        total = list.total,
        duration_ms = start.elapsed().as_millis() as u64,
        "Projects fetched"
    );
    Ok(list)
}

pub async fn get_project(client: &ApiClient, project_id: i64) -> Result<Project> {
    client.get(&format!("/projects/{project_id}")).await
}

#[tracing::instrument(skip(client, request), fields(name = %request.name))]
pub async fn create_project(client: &ApiClient, request: &CreateProjectRequest) -> Result<Project> {
    let project: Project = client.post("/projects", request).await?;
    tracing::info!(project_id = project.id, "Project created");
    Ok(project)
}

pub async fn update_project(
    client: &ApiClient,
    project_id: i64,
    changes: &UpdateProjectRequest,
) -> Result<Project> {
    client.put(&format!("/projects/{project_id}"), changes).await
}

#[tracing::instrument(skip(client))]
pub async fn delete_project(client: &ApiClient, project_id: i64) -> Result<()> {
    client.delete::<()>(&format!("/projects/{project_id}")).await?;
    tracing::info!("Project deleted");
    Ok(())
}

/// Inspect a repository and suggest framework, BaaS and build settings.
#[tracing::instrument(skip(client, probe), fields(git_url = %probe.git_url))]
pub async fn detect_framework(client: &ApiClient, probe: &RepositoryProbe) -> Result<DetectionResult> {
    client.post("/projects/detect", probe).await
}

pub async fn list_branches(client: &ApiClient, probe: &RepositoryProbe) -> Result<Vec<String>> {
    // The backend lists every branch; a branch in the probe would be meaningless.
    let request = RepositoryProbe {
        git_branch: None,
        root_directory: None,
        ..probe.clone()
    };
    let list: BranchList = client.post("/projects/branches", &request).await?;
    Ok(list.branches)
}

/// Top-level directories of the probed branch (monorepo root selection).
pub async fn list_directories(client: &ApiClient, probe: &RepositoryProbe) -> Result<Vec<String>> {
    let request = RepositoryProbe {
        root_directory: None,
        ..probe.clone()
    };
    let list: DirectoryList = client.post("/projects/directories", &request).await?;
    Ok(list.directories)
}

// region:    --- Environment variables

pub async fn list_environments(client: &ApiClient, project_id: i64) -> Result<Vec<Environment>> {
    let list: EnvironmentList = client
        .get(&format!("/projects/{project_id}/environments"))
        .await?;
    Ok(list.environments)
}

#[tracing::instrument(skip(client, request), fields(key = %request.key, is_secret = request.is_secret))]
pub async fn add_environment(
    client: &ApiClient,
    project_id: i64,
    request: &CreateEnvironmentRequest,
) -> Result<Environment> {
    client
        .post(&format!("/projects/{project_id}/environments"), request)
        .await
}

pub async fn update_environment(
    client: &ApiClient,
    project_id: i64,
    env_id: i64,
    request: &UpdateEnvironmentRequest,
) -> Result<Environment> {
    client
        .put(&format!("/projects/{project_id}/environments/{env_id}"), request)
        .await
}

pub async fn delete_environment(client: &ApiClient, project_id: i64, env_id: i64) -> Result<()> {
    client
        .delete(&format!("/projects/{project_id}/environments/{env_id}"))
        .await
}

// endregion: --- Environment variables

// region:    --- Domains

pub async fn list_domains(client: &ApiClient, project_id: i64) -> Result<Vec<Domain>> {
    let list: DomainList = client.get(&format!("/projects/{project_id}/domains")).await?;
    Ok(list.domains)
}

#[tracing::instrument(skip(client, request), fields(domain = %request.domain))]
pub async fn add_domain(
    client: &ApiClient,
    project_id: i64,
    request: &CreateDomainRequest,
) -> Result<Domain> {
    client
        .post(&format!("/projects/{project_id}/domains"), request)
        .await
}

pub async fn update_domain(
    client: &ApiClient,
    project_id: i64,
    domain_id: i64,
    changes: &UpdateDomainRequest,
) -> Result<Domain> {
    client
        .put(&format!("/projects/{project_id}/domains/{domain_id}"), changes)
        .await
}

pub async fn delete_domain(client: &ApiClient, project_id: i64, domain_id: i64) -> Result<()> {
    client
        .delete(&format!("/projects/{project_id}/domains/{domain_id}"))
        .await
}

// endregion: --- Domains
