//! Instance spec and instance resource types

use crate::paths;
use serde::{Deserialize, Serialize};

/// Request body for creating an instance.
///
/// Immutable once submitted; the control plane owns the resource from
/// there on. Build one with [`InstanceSpec::new`] and the `with_*`
/// helpers, then validate before submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSpec {
    pub name: String,

    /// Zonal machine type path (`zones/<zone>/machineTypes/<type>`).
    pub machine_type: String,

    pub disks: Vec<AttachedDisk>,

    pub network_interfaces: Vec<NetworkInterface>,

    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,

    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
}

impl InstanceSpec {
    /// New spec with the default network and one-to-one NAT, no boot disk
    /// yet. `machine_type` is the short name (`f1-micro`); the zonal path
    /// is built here.
    pub fn new(name: impl Into<String>, zone: &str, machine_type: &str) -> Self {
        Self {
            name: name.into(),
            machine_type: paths::machine_type(zone, machine_type),
            disks: Vec::new(),
            network_interfaces: vec![NetworkInterface::default_nat()],
            metadata: Metadata::default(),
            tags: Tags::default(),
        }
    }

    /// Boot disk initialized from a public image path.
    pub fn with_boot_image(mut self, source_image: impl Into<String>) -> Self {
        self.disks.push(AttachedDisk::boot_from_image(source_image));
        self
    }

    /// Boot disk initialized from a snapshot name (the
    /// `global/snapshots/<name>` path is built here).
    pub fn with_boot_snapshot(mut self, snapshot_name: &str) -> Self {
        self.disks
            .push(AttachedDisk::boot_from_snapshot(paths::snapshot(snapshot_name)));
        self
    }

    /// Append a string-valued metadata item.
    pub fn with_metadata_item(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.items.push(MetadataItem {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Append a network tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.items.push(tag.into());
        self
    }

    /// Check the spec is submittable: valid name, exactly one boot source.
    pub fn validate(&self) -> crate::Result<()> {
        paths::validate_name(&self.name)?;

        let boot = self
            .disks
            .iter()
            .find(|d| d.boot)
            .ok_or_else(|| crate::CoreError::MissingBootDisk(self.name.clone()))?;

        if boot.initialize_params.source_image.is_some()
            && boot.initialize_params.source_snapshot.is_some()
        {
            return Err(crate::CoreError::ConflictingBootSource(self.name.clone()));
        }

        Ok(())
    }
}

/// A disk attached at instance creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedDisk {
    pub boot: bool,
    pub auto_delete: bool,
    pub initialize_params: InitializeParams,
}

impl AttachedDisk {
    pub fn boot_from_image(source_image: impl Into<String>) -> Self {
        Self {
            boot: true,
            auto_delete: true,
            initialize_params: InitializeParams {
                source_image: Some(source_image.into()),
                source_snapshot: None,
            },
        }
    }

    pub fn boot_from_snapshot(source_snapshot: impl Into<String>) -> Self {
        Self {
            boot: true,
            auto_delete: true,
            initialize_params: InitializeParams {
                source_image: None,
                source_snapshot: Some(source_snapshot.into()),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_image: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_snapshot: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    pub network: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub access_configs: Vec<AccessConfig>,
}

impl NetworkInterface {
    /// Default network with an external one-to-one NAT address.
    pub fn default_nat() -> Self {
        Self {
            network: paths::default_network(),
            access_configs: vec![AccessConfig {
                config_type: "ONE_TO_ONE_NAT".to_string(),
                name: "External NAT".to_string(),
                nat_ip: None,
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessConfig {
    #[serde(rename = "type")]
    pub config_type: String,

    pub name: String,

    /// Populated by the control plane on read; never set on submission.
    #[serde(rename = "natIP", skip_serializing_if = "Option::is_none")]
    pub nat_ip: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub items: Vec<MetadataItem>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|i| i.key == key)
            .map(|i| i.value.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataItem {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tags {
    #[serde(default)]
    pub items: Vec<String>,
}

impl Tags {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// An instance as the control plane reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub name: String,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub network_interfaces: Option<Vec<NetworkInterface>>,
}

impl Instance {
    /// External NAT IP of the first interface, if one is attached.
    pub fn external_ip(&self) -> Option<&str> {
        self.network_interfaces
            .as_ref()?
            .first()?
            .access_configs
            .first()?
            .nat_ip
            .as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.status.as_deref() == Some("RUNNING")
    }
}
