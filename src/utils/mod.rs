//! Utilities around data collection.
//!
//! ## Components
//!
//! - **must-gather**: `oc adm must-gather` runs into timestamped directories
//! - **Extras**: per-test side files under the test log directory
//! - **Logging**: terminal logger setup for embedding binaries
//!
//! ### Running must-gather
//!
//! ```no_run
//! use ocp_data_collector::utils::must_gather::{run_must_gather, MustGatherCommand};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let command = MustGatherCommand::new()
//!     .image_url("registry.redhat.io/container-native-virtualization/cnv-must-gather-rhel9:v4.14")
//!     .kubeconfig("/home/user/.kube/config");
//!
//! let output = run_must_gather(command, Some(Path::new("tests-collected-info")))?;
//! println!("must-gather succeeded: {}", output.success);
//! # Ok(())
//! # }
//! ```

/// Per-test extras files
pub mod extras;

/// Terminal logger setup
pub mod logging;

/// must-gather command construction and execution
pub mod must_gather;
