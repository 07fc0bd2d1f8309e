//! # Deployment Endpoints
//!
//! Deployment history, triggering, cancellation and stored build logs.
//! Live progress comes from the event stream instead.

use shared::{BuildLog, BuildLogList, Deployment, DeploymentList};

use super::client::ApiClient;
use crate::core::Result;

pub async fn list_deployments(client: &ApiClient, project_id: i64) -> Result<DeploymentList> {
    client.get(&format!("/projects/{project_id}/deployments")).await
}

pub async fn get_deployment(client: &ApiClient, project_id: i64, deployment_id: i64) -> Result<Deployment> {
    client
        .get(&format!("/projects/{project_id}/deployments/{deployment_id}"))
        .await
}

/// Trigger a manual deployment of the project's configured branch.
#[tracing::instrument(skip(client))]
pub async fn create_deployment(client: &ApiClient, project_id: i64) -> Result<Deployment> {
    let deployment: Deployment = client
        .post_empty(&format!("/projects/{project_id}/deployments"))
        .await?;
    tracing::info!(deployment_id = deployment.id, status = deployment.status.as_str(), "Deployment triggered");
    Ok(deployment)
}

#[tracing::instrument(skip(client))]
pub async fn cancel_deployment(client: &ApiClient, project_id: i64, deployment_id: i64) -> Result<Deployment> {
    client
        .post_empty(&format!("/projects/{project_id}/deployments/{deployment_id}/cancel"))
        .await
}

pub async fn get_build_logs(client: &ApiClient, project_id: i64, deployment_id: i64) -> Result<Vec<BuildLog>> {
    let list: BuildLogList = client
        .get(&format!("/projects/{project_id}/deployments/{deployment_id}/logs"))
        .await?;
    Ok(list.logs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::client::tests::harness;
    use serde_json::json;
    use shared::{DeploymentStatus, LogType, TriggerSource};

    fn deployment_json(status: &str) -> serde_json::Value {
        json!({
            "id": 21,
            "project_id": 3,
            "commit_hash": "a1b2c3",
            "commit_message": "fix checkout",
            "commit_author": "ops",
            "branch": "main",
            "status": status,
            "duration": 0,
            "triggered_by": "manual",
            "triggered_by_id": 1,
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_create_and_cancel() {
        let mut h = harness().await;
        h.server
            .mock("POST", "/projects/3/deployments")
            .with_status(201)
            .with_body(deployment_json("pending").to_string())
            .create_async()
            .await;
        h.server
            .mock("POST", "/projects/3/deployments/21/cancel")
            .with_status(200)
            .with_body(deployment_json("cancelled").to_string())
            .create_async()
            .await;

        let created = create_deployment(&h.api, 3).await.unwrap();
        assert_eq!(created.status, DeploymentStatus::Pending);
        assert_eq!(created.triggered_by, TriggerSource::Manual);

        let cancelled = cancel_deployment(&h.api, 3, created.id).await.unwrap();
        assert!(cancelled.status.is_terminal());
    }

    #[tokio::test]
    async fn test_build_logs() {
        let mut h = harness().await;
        h.server
            .mock("GET", "/projects/3/deployments/21/logs")
            .with_status(200)
            .with_body(
                json!({
                    "logs": [{
                        "id": 1,
                        "deployment_id": 21,
                        "log": "npm ERR! missing script: build",
                        "log_type": "error",
                        "created_at": "2024-05-01T10:00:01Z",
                        "updated_at": "2024-05-01T10:00:01Z"
                    }],
                    "total": 1
                })
                .to_string(),
            )
            .create_async()
            .await;

        let logs = get_build_logs(&h.api, 3, 21).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].log_type, LogType::Error);
    }
}
