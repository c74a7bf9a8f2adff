//! Request and response models for the compute API.

use serde::{Deserialize, Serialize};

/// Lifecycle state of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum InstanceStatus {
    /// Being provisioned.
    Starting,
    /// Up and serving.
    Running,
    /// Shutdown in progress.
    Stopping,
    /// Shut down, still billed for storage.
    Stopped,
    /// Released.
    Deleted,
    /// Snapshot in progress.
    SnapshotProcessing,
    /// Image build in progress.
    ImageProcessing,
    /// Any state this SDK does not know about.
    #[serde(other)]
    Unknown,
}

/// One compute instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceModel {
    /// Instance id, e.g. `i-YufwpQCy`.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Current lifecycle state.
    pub status: InstanceStatus,
    /// Number of virtual CPUs.
    #[serde(default)]
    pub cpu_count: u32,
    /// Memory size in GB.
    #[serde(default, rename = "memoryCapacityInGB")]
    pub memory_capacity_in_gb: u32,
    /// Image the instance was created from.
    #[serde(default)]
    pub image_id: Option<String>,
    /// Private network address.
    #[serde(default)]
    pub internal_ip: Option<String>,
    /// Public address, when one is bound.
    #[serde(default)]
    pub public_ip: Option<String>,
    /// Availability zone.
    #[serde(default)]
    pub zone_name: Option<String>,
    /// Creation timestamp, ISO 8601.
    #[serde(default)]
    pub create_time: Option<String>,
}

/// Response of `list_instances`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInstancesResponse {
    /// Echo of the requested marker.
    #[serde(default)]
    pub marker: Option<String>,
    /// Marker to pass for the next page when truncated.
    #[serde(default)]
    pub next_marker: Option<String>,
    /// Page size the service applied.
    #[serde(default)]
    pub max_keys: u32,
    /// Whether more results exist.
    #[serde(default)]
    pub is_truncated: bool,
    /// Instances in this page.
    #[serde(default)]
    pub instances: Vec<InstanceModel>,
}

/// Parameters of `list_instances`.
#[derive(Debug, Clone, Default)]
pub struct ListInstancesRequest {
    /// Start listing after this id.
    pub marker: Option<String>,
    /// Page size, service default is 1000.
    pub max_keys: Option<u32>,
    /// Only list instances in this zone.
    pub zone_name: Option<String>,
}

impl ListInstancesRequest {
    /// Create an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start listing after this id.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }

    /// Page size.
    pub fn with_max_keys(mut self, max_keys: u32) -> Self {
        self.max_keys = Some(max_keys);
        self
    }

    /// Only list instances in this zone.
    pub fn with_zone_name(mut self, zone_name: impl Into<String>) -> Self {
        self.zone_name = Some(zone_name.into());
        self
    }
}

/// Body of `create_instance`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstanceRequest {
    /// Number of virtual CPUs.
    pub cpu_count: u32,
    /// Memory size in GB.
    #[serde(rename = "memoryCapacityInGB")]
    pub memory_capacity_in_gb: u32,
    /// Image to boot from.
    pub image_id: String,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Root password. Sent as-is over TLS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_pass: Option<String>,
    /// Availability zone to place the instance in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_name: Option<String>,
    /// How many instances to create, default 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_count: Option<u32>,
}

impl CreateInstanceRequest {
    /// Create a request with the required fields.
    pub fn new(cpu_count: u32, memory_capacity_in_gb: u32, image_id: impl Into<String>) -> Self {
        Self {
            cpu_count,
            memory_capacity_in_gb,
            image_id: image_id.into(),
            name: None,
            admin_pass: None,
            zone_name: None,
            purchase_count: None,
        }
    }

    /// Display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Root password.
    pub fn with_admin_pass(mut self, admin_pass: impl Into<String>) -> Self {
        self.admin_pass = Some(admin_pass.into());
        self
    }

    /// Availability zone.
    pub fn with_zone_name(mut self, zone_name: impl Into<String>) -> Self {
        self.zone_name = Some(zone_name.into());
        self
    }

    /// How many instances to create.
    pub fn with_purchase_count(mut self, purchase_count: u32) -> Self {
        self.purchase_count = Some(purchase_count);
        self
    }
}

/// Response of `create_instance`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstanceResponse {
    /// Ids of the created instances.
    pub instance_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_instance() {
        let body = r#"{
            "id": "i-YufwpQCy",
            "name": "web-1",
            "status": "Running",
            "cpuCount": 2,
            "memoryCapacityInGB": 8,
            "imageId": "m-abcd1234",
            "internalIp": "192.168.0.4",
            "zoneName": "cn-bj-a",
            "createTime": "2024-01-02T03:04:05Z"
        }"#;

        let instance: InstanceModel = serde_json::from_str(body).unwrap();
        assert_eq!(instance.id, "i-YufwpQCy");
        assert_eq!(instance.status, InstanceStatus::Running);
        assert_eq!(instance.memory_capacity_in_gb, 8);
        assert_eq!(instance.public_ip, None);
    }

    #[test]
    fn test_unknown_status_does_not_fail() {
        let instance: InstanceModel =
            serde_json::from_str(r#"{"id": "i-1", "status": "Hibernated"}"#).unwrap();
        assert_eq!(instance.status, InstanceStatus::Unknown);
    }

    #[test]
    fn test_serialize_create_request_skips_unset_fields() {
        let req = CreateInstanceRequest::new(2, 8, "m-abcd1234").with_name("web-1");
        let body = serde_json::to_value(&req).unwrap();

        assert_eq!(body["cpuCount"], 2);
        assert_eq!(body["memoryCapacityInGB"], 8);
        assert_eq!(body["imageId"], "m-abcd1234");
        assert_eq!(body["name"], "web-1");
        assert!(body.get("adminPass").is_none());
        assert!(body.get("purchaseCount").is_none());
    }
}
