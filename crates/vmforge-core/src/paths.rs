//! Resource path helpers
//!
//! The control plane identifies most resources by partial URL rather than
//! bare name. These helpers build the handful of shapes VMForge submits.

/// Zonal machine type path, e.g. `zones/us-west1-b/machineTypes/f1-micro`.
pub fn machine_type(zone: &str, machine_type: &str) -> String {
    format!("zones/{}/machineTypes/{}", zone, machine_type)
}

/// Public image-family path, e.g.
/// `projects/debian-cloud/global/images/family/debian-11`.
pub fn image_family(project: &str, family: &str) -> String {
    format!("projects/{}/global/images/family/{}", project, family)
}

/// Global snapshot path, e.g. `global/snapshots/base-snapshot-web`.
pub fn snapshot(name: &str) -> String {
    format!("global/snapshots/{}", name)
}

/// The default VPC network.
pub fn default_network() -> String {
    "global/networks/default".to_string()
}

/// Validate an RFC-1035 style resource name (instances, firewalls,
/// snapshots all share the shape): lowercase letter first, then lowercase
/// letters, digits and hyphens, no trailing hyphen, at most 63 characters.
pub fn validate_name(name: &str) -> crate::Result<()> {
    let valid = !name.is_empty()
        && name.len() <= 63
        && name.starts_with(|c: char| c.is_ascii_lowercase())
        && !name.ends_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if valid {
        Ok(())
    } else {
        Err(crate::CoreError::InvalidName(name.to_string()))
    }
}
