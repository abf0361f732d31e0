//! Batch clone driver
//!
//! Creates K instances from one snapshot, strictly in sequence: clone
//! i+1's create call is issued only after clone i's operation reaches
//! DONE. The sequencing is what makes the per-clone wall-clock timings
//! meaningful, so it must not be parallelized.

use crate::error::Result;
use std::path::Path;
use std::time::Instant;
use vmforge_compute::{ComputeApi, PollConfig, wait_for_operation};
use vmforge_core::InstanceSpec;

/// Options for a clone batch.
#[derive(Debug, Clone)]
pub struct CloneBatchOptions {
    /// Source snapshot name (bare name; the `global/snapshots/` path is
    /// built by the spec).
    pub snapshot: String,

    /// Instances are named `<prefix>-1` .. `<prefix>-<count>`.
    pub name_prefix: String,

    pub count: u32,

    pub machine_type: String,

    pub startup_script: Option<String>,

    pub tags: Vec<String>,
}

/// Wall-clock duration of one create+wait cycle.
#[derive(Debug, Clone)]
pub struct CloneTiming {
    pub name: String,
    pub seconds: f64,
}

/// Create one clone from the snapshot and block until its operation is
/// DONE, measuring the whole cycle.
pub async fn clone_one(
    api: &dyn ComputeApi,
    name: &str,
    options: &CloneBatchOptions,
    poll: &PollConfig,
) -> Result<CloneTiming> {
    let mut spec = InstanceSpec::new(name, api.zone(), &options.machine_type)
        .with_boot_snapshot(&options.snapshot);
    if let Some(script) = &options.startup_script {
        spec = spec.with_metadata_item("startup-script", script);
    }
    for tag in &options.tags {
        spec = spec.with_tag(tag.clone());
    }

    let start = Instant::now();
    let operation = api.insert_instance(&spec).await?;
    wait_for_operation(api, &operation, poll).await?;
    let seconds = start.elapsed().as_secs_f64();

    tracing::info!(instance = %name, "Clone created in {:.2} seconds", seconds);

    Ok(CloneTiming {
        name: name.to_string(),
        seconds,
    })
}

/// Run the whole batch in order, returning one timing per clone.
pub async fn run_batch(
    api: &dyn ComputeApi,
    options: &CloneBatchOptions,
    poll: &PollConfig,
) -> Result<Vec<CloneTiming>> {
    let mut timings = Vec::with_capacity(options.count as usize);

    for i in 1..=options.count {
        let name = format!("{}-{}", options.name_prefix, i);
        let timing = clone_one(api, &name, options, poll).await?;
        timings.push(timing);
    }

    Ok(timings)
}

/// One line per clone: `<name>: <seconds to 2 decimals> seconds`.
pub fn render_report(timings: &[CloneTiming]) -> String {
    let mut report = String::new();
    for timing in timings {
        report.push_str(&format!("{}: {:.2} seconds\n", timing.name, timing.seconds));
    }
    report
}

/// Persist the timing report after a completed batch.
pub fn write_report(path: &Path, timings: &[CloneTiming]) -> Result<()> {
    std::fs::write(path, render_report(timings))?;
    tracing::info!(path = %path.display(), "Timing report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingApi;

    fn options(count: u32) -> CloneBatchOptions {
        CloneBatchOptions {
            snapshot: "base-snapshot-x".to_string(),
            name_prefix: "flask-clone".to_string(),
            count,
            machine_type: "f1-micro".to_string(),
            startup_script: None,
            tags: vec!["allow-5000".to_string()],
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_is_strictly_sequential() {
        let api = RecordingApi::new("us-west1-b");

        let timings = run_batch(&api, &options(3), &PollConfig::default())
            .await
            .unwrap();

        assert_eq!(timings.len(), 3);

        // Each insert appears only after the previous operation's DONE
        // poll; no interleaving.
        assert_eq!(
            api.events(),
            vec![
                "insert flask-clone-1",
                "poll op-flask-clone-1 -> Running",
                "poll op-flask-clone-1 -> Done",
                "insert flask-clone-2",
                "poll op-flask-clone-2 -> Running",
                "poll op-flask-clone-2 -> Done",
                "insert flask-clone-3",
                "poll op-flask-clone-3 -> Running",
                "poll op-flask-clone-3 -> Done",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_clone_spec_references_snapshot() {
        let api = RecordingApi::new("us-west1-b");

        run_batch(&api, &options(1), &PollConfig::default())
            .await
            .unwrap();

        let specs = api.submitted_specs();
        assert_eq!(specs.len(), 1);
        assert_eq!(
            specs[0].machine_type,
            "zones/us-west1-b/machineTypes/f1-micro"
        );
        assert_eq!(
            specs[0].disks[0].initialize_params.source_snapshot.as_deref(),
            Some("global/snapshots/base-snapshot-x")
        );
        assert!(specs[0].disks[0].initialize_params.source_image.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_report_format() {
        let api = RecordingApi::new("us-west1-b");

        let timings = run_batch(&api, &options(3), &PollConfig::default())
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TIMING.md");
        write_report(&path, &timings).unwrap();

        let report = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 3);

        let pattern = regex::Regex::new(r"^flask-clone-\d: \d+\.\d{2} seconds$").unwrap();
        for line in lines {
            assert!(pattern.is_match(line), "bad report line: {}", line);
        }
    }

    #[test]
    fn test_render_report_line() {
        let timings = vec![CloneTiming {
            name: "flask-clone-1".to_string(),
            seconds: 42.4242,
        }];
        assert_eq!(render_report(&timings), "flask-clone-1: 42.42 seconds\n");
    }
}
