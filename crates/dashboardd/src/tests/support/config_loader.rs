//! Configuration loader serving loopback ports and a temporary snapshot.

use std::fs;
use std::sync::Arc;

use camino::Utf8PathBuf;
use ortho_config::OrthoError;
use tempfile::TempDir;

use dashboard_config::{Config, LogFormat};

use crate::bootstrap::ConfigLoader;

/// Namespace holding the snapshot's top-level installation.
pub const SNAPSHOT_NAMESPACE: &str = "garden";

const SNAPSHOT: &str = r#"{
  "installations": [
    {
      "metadata": {"name": "root", "namespace": "garden", "generation": 2},
      "status": {
        "observedGeneration": 2,
        "phase": "Succeeded",
        "executionRef": {"name": "root-exec", "namespace": "garden"}
      }
    },
    {
      "metadata": {
        "name": "nested",
        "namespace": "garden",
        "generation": 1,
        "labels": {"landscaper.gardener.cloud/encompassed-by": "root"}
      },
      "status": {"observedGeneration": 1, "phase": "Succeeded"}
    },
    {
      "metadata": {"name": "elsewhere", "namespace": "shoot", "generation": 1},
      "status": {"observedGeneration": 0, "phase": "Init"}
    }
  ],
  "executions": [
    {
      "metadata": {"name": "root-exec", "namespace": "garden", "generation": 3},
      "status": {
        "observedGeneration": 2,
        "phase": "Progressing",
        "deployItemRefs": [
          {"name": "main", "ref": {"name": "root-di", "namespace": "garden"}},
          {"name": "gone", "ref": {"name": "ghost", "namespace": "garden"}}
        ]
      }
    }
  ],
  "deployItems": [
    {
      "metadata": {"name": "root-di", "namespace": "garden", "generation": 1},
      "status": {"observedGeneration": 1, "phase": "Succeeded"}
    }
  ]
}"#;

/// Loader binding both transports to ephemeral loopback ports.
pub struct TestConfigLoader {
    _dir: TempDir,
    snapshot: Option<Utf8PathBuf>,
}

impl TestConfigLoader {
    /// Serves the fixture snapshot.
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temporary directory");
        let path = dir.path().join("cluster.json");
        fs::write(&path, SNAPSHOT).expect("failed to write snapshot");
        let snapshot = Utf8PathBuf::from_path_buf(path).expect("snapshot path was not UTF-8");
        Self {
            _dir: dir,
            snapshot: Some(snapshot),
        }
    }

    /// Names a snapshot file that does not exist.
    #[must_use]
    pub fn with_missing_snapshot() -> Self {
        let dir = TempDir::new().expect("failed to create temporary directory");
        let path = dir.path().join("absent.json");
        let snapshot = Utf8PathBuf::from_path_buf(path).expect("snapshot path was not UTF-8");
        Self {
            _dir: dir,
            snapshot: Some(snapshot),
        }
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(Config {
            listen_host: String::from("127.0.0.1"),
            http_port: 0,
            stream_port: 0,
            log_filter: String::from("warn"),
            log_format: LogFormat::Compact,
            cluster_snapshot: self.snapshot.clone(),
            request_timeout_secs: 5,
        })
    }
}
