//! The per-heartbeat cycle: pick a center, scan, publish.
//!
//! `Tracker::run_cycle` is the single entry point. It never panics and never
//! returns an error to the host; failures end the current cycle, get logged,
//! and the next heartbeat starts from scratch.

use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use crate::host::{Heartbeat, Host, TickPhase};
use crate::profiler::CycleProfiler;
use crate::publisher::SnapshotPublisher;
use crate::scanner::{CenterPolicy, Scanner};
use crate::snapshot::Snapshot;
use tracing::{debug, info, warn};

/// Why a cycle produced no snapshot without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No actor is connected, so there is no scan center.
    NoActorAvailable,
}

/// How one cycle ended.
#[derive(Debug)]
pub enum CycleOutcome {
    /// The snapshot was written and is now the file's content.
    Published(Snapshot),
    Skipped(SkipReason),
    /// Nothing was written; the previous snapshot file is unchanged.
    Failed(TrackerError),
}

impl CycleOutcome {
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            CycleOutcome::Published(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn is_published(&self) -> bool {
        matches!(self, CycleOutcome::Published(_))
    }
}

pub struct Tracker {
    scanner: Scanner,
    publisher: SnapshotPublisher,
    policy: Box<dyn CenterPolicy>,
    profiler: CycleProfiler,
}

impl Tracker {
    /// Build a tracker from `config`, rejecting settings that would fail
    /// every cycle.
    pub fn new(config: &TrackerConfig) -> Result<Self> {
        config.validate()?;
        let tracker = Self {
            scanner: Scanner::new(config.tracked_kind, config.scan_radius),
            publisher: SnapshotPublisher::new(config.output_path.clone()),
            policy: config.center_policy.build(),
            profiler: CycleProfiler::new(),
        };
        info!(
            output = %tracker.publisher.output_path().display(),
            radius = tracker.scanner.radius,
            kind = ?tracker.scanner.kind,
            policy = tracker.policy.name(),
            "tracker initialized"
        );
        Ok(tracker)
    }

    /// Replace the center selection policy.
    pub fn with_policy(mut self, policy: impl CenterPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    pub fn publisher(&self) -> &SnapshotPublisher {
        &self.publisher
    }

    pub fn profiler(&self) -> &CycleProfiler {
        &self.profiler
    }

    /// Run one full scan and publish against `host`.
    pub fn run_cycle(&mut self, host: &dyn Host) -> CycleOutcome {
        let outcome = self.cycle(host);
        match &outcome {
            CycleOutcome::Published(_) => self.profiler.record_published(),
            CycleOutcome::Skipped(_) => self.profiler.record_skipped(),
            CycleOutcome::Failed(_) => self.profiler.record_failed(),
        }
        outcome
    }

    fn cycle(&mut self, host: &dyn Host) -> CycleOutcome {
        let actors = host.connected_actors();
        let Some(center) = self.policy.select_primary_center(&actors) else {
            debug!("no connected actors, skipping cycle");
            return CycleOutcome::Skipped(SkipReason::NoActorAvailable);
        };

        let scanner = self.scanner;
        let entities = match self
            .profiler
            .time_section("scan", || scanner.scan(host, center))
        {
            Ok(entities) => entities,
            Err(err) => {
                warn!(error = %err, "scan failed, keeping previous snapshot");
                return CycleOutcome::Failed(err);
            }
        };
        debug!(
            count = entities.len(),
            kind = ?scanner.kind,
            center = ?center,
            "found {} entities near the primary actor",
            entities.len()
        );

        let snapshot = Snapshot::from_entities(&entities);
        let publisher = &self.publisher;
        match self
            .profiler
            .time_section("publish", || publisher.publish(&snapshot))
        {
            Ok(report) => {
                debug!(path = %report.path.display(), records = report.records, bytes = report.bytes, "snapshot published");
                CycleOutcome::Published(snapshot)
            }
            Err(err) => {
                warn!(error = %err, "failed to publish snapshot");
                CycleOutcome::Failed(err)
            }
        }
    }
}

impl Heartbeat for Tracker {
    /// Runs a cycle at the end of every tick, once positions are settled.
    fn on_tick(&mut self, phase: TickPhase, host: &dyn Host) {
        if phase == TickPhase::End {
            self.run_cycle(host);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{EntityKind, Position};
    use crate::host::{ActorInfo, RawEntity};
    use crate::scanner::NearestToOrigin;
    use crate::snapshot::snapshot_from_json_string;
    use crate::spatial::ScanRegion;
    use std::cell::RefCell;
    use std::io::Write;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct StubHost {
        actors: Vec<ActorInfo>,
        entities: Vec<RawEntity>,
        regions: RefCell<Vec<ScanRegion>>,
    }

    impl Host for StubHost {
        fn connected_actors(&self) -> Vec<ActorInfo> {
            self.actors.clone()
        }

        fn entities_of_kind_within(&self, kind: EntityKind, region: &ScanRegion) -> Vec<RawEntity> {
            self.regions.borrow_mut().push(*region);
            self.entities
                .iter()
                .filter(|e| e.kind == kind && region.contains(&e.position))
                .cloned()
                .collect()
        }
    }

    fn actor(name: &str, x: f64, y: f64, z: f64) -> ActorInfo {
        ActorInfo {
            name: name.to_string(),
            position: Position::new(x, y, z),
        }
    }

    fn villager(label: &str, profession: i32, x: f64, y: f64, z: f64) -> RawEntity {
        RawEntity {
            kind: EntityKind::Villager,
            position: Position::new(x, y, z),
            raw_label: label.to_string(),
            profession: Some(profession),
        }
    }

    fn tracker_at(path: &Path) -> Tracker {
        Tracker::new(&TrackerConfig {
            output_path: path.to_path_buf(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let negative = TrackerConfig {
            scan_radius: -1.0,
            ..Default::default()
        };
        assert!(matches!(Tracker::new(&negative), Err(TrackerError::Config(_))));

        let nan = TrackerConfig {
            scan_radius: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(Tracker::new(&nan), Err(TrackerError::Config(_))));

        let no_path = TrackerConfig {
            output_path: std::path::PathBuf::new(),
            ..Default::default()
        };
        assert!(matches!(Tracker::new(&no_path), Err(TrackerError::Config(_))));
    }

    #[test]
    fn test_full_cycle_excludes_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("villagers.json");
        let mut tracker = tracker_at(&path);
        let host = StubHost {
            actors: vec![actor("alex", 0.0, 0.0, 0.0)],
            entities: vec![villager("", 0, 10.0, 0.0, 0.0), villager("", 1, 60.0, 0.0, 0.0)],
            ..Default::default()
        };

        let outcome = tracker.run_cycle(&host);
        let snapshot = outcome.snapshot().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.records[0].name, "Farmer");
        assert_eq!(snapshot.records[0].x, 10.0);

        let on_disk = snapshot_from_json_string(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(&on_disk, snapshot);
    }

    #[test]
    fn test_no_actor_skips_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("villagers.json");
        std::fs::write(&path, "previous").unwrap();
        let mut tracker = tracker_at(&path);
        let host = StubHost {
            entities: vec![villager("Bob", 1, 0.0, 0.0, 0.0)],
            ..Default::default()
        };

        let outcome = tracker.run_cycle(&host);
        assert!(matches!(outcome, CycleOutcome::Skipped(SkipReason::NoActorAvailable)));
        assert!(host.regions.borrow().is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous");
        assert_eq!(tracker.profiler().outcomes().skipped, 1);
    }

    #[test]
    fn test_scans_around_first_actor() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker_at(&dir.path().join("v.json"));
        let host = StubHost {
            actors: vec![actor("first", 100.0, 64.0, -20.0), actor("second", 0.0, 0.0, 0.0)],
            ..Default::default()
        };

        assert!(tracker.run_cycle(&host).is_published());
        let regions = host.regions.borrow();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].center, Position::new(100.0, 64.0, -20.0));
        assert_eq!(regions[0].half_extent, 50.0);
    }

    #[test]
    fn test_custom_policy() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = tracker_at(&dir.path().join("v.json")).with_policy(NearestToOrigin);
        let host = StubHost {
            actors: vec![actor("far", 500.0, 0.0, 0.0), actor("home", 1.0, 0.0, 0.0)],
            ..Default::default()
        };

        tracker.run_cycle(&host);
        assert_eq!(host.regions.borrow()[0].center, Position::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_empty_scan_publishes_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v.json");
        let mut tracker = tracker_at(&path);
        let host = StubHost {
            actors: vec![actor("alex", 0.0, 0.0, 0.0)],
            entities: vec![villager("Bob", 1, 500.0, 0.0, 0.0)],
            ..Default::default()
        };

        let outcome = tracker.run_cycle(&host);
        assert!(outcome.snapshot().unwrap().is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_non_finite_actor_fails_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v.json");
        let mut tracker = tracker_at(&path);
        let host = StubHost {
            actors: vec![actor("glitched", f64::NAN, 64.0, 0.0)],
            ..Default::default()
        };

        let outcome = tracker.run_cycle(&host);
        assert!(matches!(outcome, CycleOutcome::Failed(TrackerError::InvalidRegion { .. })));
        assert!(!path.exists());
        assert_eq!(tracker.profiler().outcomes().failed, 1);
    }

    #[test]
    fn test_io_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("v.json");
        let mut tracker = tracker_at(&path);
        let host = StubHost {
            actors: vec![actor("alex", 0.0, 0.0, 0.0)],
            entities: vec![villager("Bob", 1, 1.0, 0.0, 0.0)],
            ..Default::default()
        };

        let first = tracker.run_cycle(&host);
        assert!(matches!(first, CycleOutcome::Failed(TrackerError::Io { .. })));

        std::fs::create_dir(dir.path().join("no_such_dir")).unwrap();
        assert!(tracker.run_cycle(&host).is_published());
        assert!(path.exists());
        assert_eq!(tracker.profiler().outcomes().failed, 1);
        assert_eq!(tracker.profiler().outcomes().published, 1);
    }

    #[test]
    fn test_heartbeat_acts_only_on_end_phase() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v.json");
        let mut tracker = tracker_at(&path);
        let host = StubHost {
            actors: vec![actor("alex", 0.0, 0.0, 0.0)],
            ..Default::default()
        };

        tracker.on_tick(TickPhase::Start, &host);
        assert!(!path.exists());
        assert_eq!(tracker.profiler().outcomes().total(), 0);

        tracker.on_tick(TickPhase::End, &host);
        assert!(path.exists());
        assert_eq!(tracker.profiler().outcomes().published, 1);
        assert!(tracker.profiler().get_section("scan").is_some());
        assert!(tracker.profiler().get_section("publish").is_some());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_cycle_log_names_tracked_kind() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = Tracker::new(&TrackerConfig {
            output_path: dir.path().join("zombies.json"),
            tracked_kind: EntityKind::Zombie,
            ..Default::default()
        })
        .unwrap();
        let host = StubHost {
            actors: vec![actor("alex", 0.0, 0.0, 0.0)],
            entities: vec![RawEntity {
                kind: EntityKind::Zombie,
                position: Position::new(3.0, 0.0, 0.0),
                raw_label: "Shambler".to_string(),
                profession: None,
            }],
            ..Default::default()
        };

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            assert!(tracker.run_cycle(&host).is_published());
        });

        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(text.contains("found 1 entities near the primary actor"), "{text}");
        assert!(text.contains("kind=Zombie"), "{text}");
        assert!(!text.contains("villagers"), "{text}");
    }
}
