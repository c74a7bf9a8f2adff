use bce_auth_v1::BCE_PATH_ENCODE_SET;
use bce_client::{BceClient, ServiceRequest};
use bce_core::Result;
use percent_encoding::utf8_percent_encode;

use crate::model::*;

const URL_PREFIX: &str = "/v2";

/// Client for the compute service.
///
/// Wraps a [`BceClient`] pointed at a compute endpoint, e.g.
/// `bcc.bj.baidubce.com`. All operations live under the `/v2` API version.
#[derive(Debug)]
pub struct BccClient {
    client: BceClient,
}

impl BccClient {
    /// Create a client over a configured dispatcher.
    pub fn new(client: BceClient) -> Self {
        Self { client }
    }

    /// List one page of instances.
    pub async fn list_instances(
        &self,
        request: ListInstancesRequest,
    ) -> Result<ListInstancesResponse> {
        let req = ServiceRequest::get(instance_path(None))
            .query_opt("marker", request.marker)
            .query_opt("maxKeys", request.max_keys.map(|n| n.to_string()))
            .query_opt("zoneName", request.zone_name);

        let resp = self.client.send(req).await?;
        resp.json()
    }

    /// Fetch one instance by id.
    pub async fn get_instance(&self, instance_id: &str) -> Result<InstanceModel> {
        let resp = self
            .client
            .send(ServiceRequest::get(instance_path(Some(instance_id))))
            .await?;
        resp.json()
    }

    /// Create one or more instances.
    ///
    /// `client_token` makes the call idempotent: retries carrying the same
    /// token create the same instances instead of new ones. Pass `None` to
    /// let the SDK generate a fresh token.
    pub async fn create_instance(
        &self,
        request: &CreateInstanceRequest,
        client_token: Option<&str>,
    ) -> Result<CreateInstanceResponse> {
        let token = match client_token {
            Some(t) => t.to_string(),
            None => generate_client_token(),
        };

        let req = ServiceRequest::post(instance_path(None))
            .query("clientToken", token)
            .json(request)?;

        let resp = self.client.send(req).await?;
        resp.json()
    }

    /// Release an instance.
    pub async fn delete_instance(&self, instance_id: &str) -> Result<()> {
        self.client
            .send(ServiceRequest::delete(instance_path(Some(instance_id))))
            .await?;
        Ok(())
    }

    /// Start a stopped instance.
    pub async fn start_instance(&self, instance_id: &str) -> Result<()> {
        self.instance_action(instance_id, "start", None).await
    }

    /// Stop a running instance. `force` powers it off without a guest
    /// shutdown.
    pub async fn stop_instance(&self, instance_id: &str, force: bool) -> Result<()> {
        self.instance_action(instance_id, "stop", Some(force)).await
    }

    /// Reboot an instance. `force` resets it without a guest shutdown.
    pub async fn reboot_instance(&self, instance_id: &str, force: bool) -> Result<()> {
        self.instance_action(instance_id, "reboot", Some(force))
            .await
    }

    async fn instance_action(
        &self,
        instance_id: &str,
        action: &str,
        force: Option<bool>,
    ) -> Result<()> {
        let mut req = ServiceRequest::put(instance_path(Some(instance_id))).query("action", action);
        if let Some(force) = force {
            req = req.json(&serde_json::json!({ "forceStop": force }))?;
        }

        self.client.send(req).await?;
        Ok(())
    }
}

fn instance_path(instance_id: Option<&str>) -> String {
    match instance_id {
        Some(id) => format!(
            "{URL_PREFIX}/instance/{}",
            utf8_percent_encode(id, &BCE_PATH_ENCODE_SET)
        ),
        None => format!("{URL_PREFIX}/instance"),
    }
}

/// Random token for create idempotency, 32 hex chars.
fn generate_client_token() -> String {
    format!("{:032x}", rand::random::<u128>())
}
