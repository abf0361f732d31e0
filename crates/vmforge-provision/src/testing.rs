//! In-memory control plane for flow tests
//!
//! Records every mutating call and every poll in submission order, so
//! tests can assert sequencing (clone i+1 only after clone i's operation
//! is DONE) as well as call counts.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use vmforge_compute::error::{ComputeError, Result};
use vmforge_compute::ComputeApi;
use vmforge_core::{
    FirewallRule, Instance, InstanceSpec, Operation, OperationStatus, SnapshotSpec,
};

pub struct RecordingApi {
    zone: String,
    events: Mutex<Vec<String>>,
    specs: Mutex<Vec<InstanceSpec>>,
    instances: Mutex<Vec<Instance>>,
    firewalls: Mutex<HashMap<String, FirewallRule>>,
    poll_counts: Mutex<HashMap<String, usize>>,
    /// Polls an operation needs before it reports DONE.
    polls_until_done: usize,
    fail_firewall_lookup: bool,
}

impl RecordingApi {
    pub fn new(zone: &str) -> Self {
        Self {
            zone: zone.to_string(),
            events: Mutex::new(Vec::new()),
            specs: Mutex::new(Vec::new()),
            instances: Mutex::new(Vec::new()),
            firewalls: Mutex::new(HashMap::new()),
            poll_counts: Mutex::new(HashMap::new()),
            polls_until_done: 2,
            fail_firewall_lookup: false,
        }
    }

    pub fn with_polls_until_done(mut self, polls: usize) -> Self {
        self.polls_until_done = polls;
        self
    }

    pub fn failing_firewall_lookup(mut self) -> Self {
        self.fail_firewall_lookup = true;
        self
    }

    pub fn seed_firewall(&self, rule: FirewallRule) {
        self.firewalls.lock().unwrap().insert(rule.name.clone(), rule);
    }

    pub fn seed_instance(&self, instance: Instance) {
        self.instances.lock().unwrap().push(instance);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn submitted_specs(&self) -> Vec<InstanceSpec> {
        self.specs.lock().unwrap().clone()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    fn pending_op(name: String) -> Operation {
        Operation {
            name,
            status: OperationStatus::Pending,
            operation_type: None,
            target_link: None,
            error: None,
        }
    }
}

#[async_trait]
impl ComputeApi for RecordingApi {
    fn zone(&self) -> &str {
        &self.zone
    }

    async fn insert_instance(&self, spec: &InstanceSpec) -> Result<Operation> {
        spec.validate()?;
        self.record(format!("insert {}", spec.name));
        self.specs.lock().unwrap().push(spec.clone());

        // Created instances become visible with an external IP, the way
        // the control plane reports them after the operation completes.
        self.instances.lock().unwrap().push(Instance {
            name: spec.name.clone(),
            status: Some("RUNNING".to_string()),
            network_interfaces: Some(vec![vmforge_core::NetworkInterface {
                network: "global/networks/default".to_string(),
                access_configs: vec![vmforge_core::AccessConfig {
                    config_type: "ONE_TO_ONE_NAT".to_string(),
                    name: "External NAT".to_string(),
                    nat_ip: Some("203.0.113.10".to_string()),
                }],
            }]),
        });

        Ok(Self::pending_op(format!("op-{}", spec.name)))
    }

    async fn get_instance(&self, name: &str) -> Result<Instance> {
        self.instances
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.name == name)
            .cloned()
            .ok_or_else(|| ComputeError::NotFound(name.to_string()))
    }

    async fn list_instances(&self) -> Result<Vec<Instance>> {
        Ok(self.instances.lock().unwrap().clone())
    }

    async fn get_firewall(&self, name: &str) -> Result<Option<FirewallRule>> {
        if self.fail_firewall_lookup {
            return Err(ComputeError::Api {
                status: 403,
                message: "permission denied".to_string(),
            });
        }
        Ok(self.firewalls.lock().unwrap().get(name).cloned())
    }

    async fn insert_firewall(&self, rule: &FirewallRule) -> Result<Operation> {
        self.record(format!("insert-firewall {}", rule.name));
        self.firewalls
            .lock()
            .unwrap()
            .insert(rule.name.clone(), rule.clone());
        Ok(Self::pending_op(format!("op-firewall-{}", rule.name)))
    }

    async fn create_snapshot(&self, disk: &str, spec: &SnapshotSpec) -> Result<Operation> {
        self.record(format!("snapshot {} {}", disk, spec.name));
        Ok(Self::pending_op(format!("op-snapshot-{}", spec.name)))
    }

    async fn get_zone_operation(&self, name: &str) -> Result<Operation> {
        let mut counts = self.poll_counts.lock().unwrap();
        let count = counts.entry(name.to_string()).or_insert(0);
        *count += 1;

        let status = if *count >= self.polls_until_done {
            OperationStatus::Done
        } else {
            OperationStatus::Running
        };

        self.record(format!("poll {} -> {:?}", name, status));

        Ok(Operation {
            name: name.to_string(),
            status,
            operation_type: None,
            target_link: None,
            error: None,
        })
    }
}
