//! Global constants for the data collector.
//!
//! Environment variable names, configuration keys and on-disk naming rules
//! live here so every component agrees on them.

// Environment variables
/// Path to a YAML file holding the collector configuration.
/// Takes precedence over the ambient configuration object.
pub const ENV_DATA_COLLECTOR_YAML: &str = "OPENSHIFT_PYTHON_WRAPPER_DATA_COLLECTOR_YAML";

/// Directory name inserted between the configured base directory and its leaf.
pub const ENV_DYNAMIC_BASE_DIR: &str = "OPENSHIFT_PYTHON_WRAPPER_DATA_COLLECTOR_DYNAMIC_BASE_DIR";

/// Per-test log directory, set by the test harness while a test runs.
pub const ENV_TEST_DIR_LOG: &str = "TEST_DIR_LOG";

/// Base directory for everything a test session collects.
pub const ENV_TEST_COLLECT_BASE_DIR: &str = "TEST_COLLECT_BASE_DIR";

// Configuration keys
/// Key of the collector section inside the ambient configuration object.
pub const AMBIENT_CONFIG_KEY: &str = "data_collector";

pub const KEY_BASE_DIRECTORY: &str = "data_collector_base_directory";
pub const KEY_COLLECT_FUNCTION: &str = "collect_data_function";
pub const KEY_COLLECT_POD_LOGS: &str = "collect_pod_logs";

/// Separator between module and function in a collect-function name
pub const FUNCTION_PATH_SEPARATOR: char = '.';

// On-disk naming
/// Extension of per-container log files
pub const LOG_FILE_EXTENSION: &str = "log";

/// Longest directory/file name produced by sanitization (in characters)
pub const MAX_SANITIZED_NAME_LEN: usize = 200;

/// Name used when sanitization leaves nothing behind
pub const UNNAMED_COMPONENT: &str = "unnamed";

/// Directory used for extras collected outside the scope of a test
pub const UTILITIES_DIR_NAME: &str = "utilities";

/// Default sub-directory for extras files
pub const DEFAULT_EXTRAS_DIR_NAME: &str = "extras";

// must-gather
/// Default CLI used to run must-gather
pub const DEFAULT_MUST_GATHER_PROGRAM: &str = "oc";

/// Prefix of the timestamped must-gather output directory
pub const MUST_GATHER_DIR_PREFIX: &str = "must_gather_";

/// UTC timestamp format appended to the must-gather directory name
pub const MUST_GATHER_TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H_%M_%S";
