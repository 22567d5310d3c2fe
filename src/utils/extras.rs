//! Side artifacts written during a test session.
//!
//! Extras land under the current test's log directory (`TEST_DIR_LOG`). Outside
//! the scope of a test they go to `<TEST_COLLECT_BASE_DIR>/utilities`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use log::error;

use crate::collectors::path_builder::ensure_dir;
use crate::constants::{
    DEFAULT_EXTRAS_DIR_NAME, ENV_TEST_COLLECT_BASE_DIR, ENV_TEST_DIR_LOG, UTILITIES_DIR_NAME,
};
use crate::security::sanitize_path_component;

/// Writer for extras files, bound to a test log directory setup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtrasWriter {
    test_dir_log: Option<PathBuf>,
    collect_base_dir: Option<PathBuf>,
}

impl ExtrasWriter {
    pub fn new(test_dir_log: Option<PathBuf>, collect_base_dir: Option<PathBuf>) -> Self {
        Self {
            test_dir_log: test_dir_log.filter(|dir| !dir.as_os_str().is_empty()),
            collect_base_dir: collect_base_dir.filter(|dir| !dir.as_os_str().is_empty()),
        }
    }

    /// Snapshot of `TEST_DIR_LOG` and `TEST_COLLECT_BASE_DIR`
    pub fn from_env() -> Self {
        Self::new(
            env::var_os(ENV_TEST_DIR_LOG).map(PathBuf::from),
            env::var_os(ENV_TEST_COLLECT_BASE_DIR).map(PathBuf::from),
        )
    }

    /// Directory for this test's logs, created if needed.
    pub fn prepare_test_dir(&self) -> Result<PathBuf> {
        let test_dir = match (&self.test_dir_log, &self.collect_base_dir) {
            (Some(test_dir), _) => test_dir.clone(),
            (None, Some(base)) => base.join(UTILITIES_DIR_NAME),
            (None, None) => {
                return Err(anyhow!(
                    "Neither {} nor {} is set, nowhere to write extras",
                    ENV_TEST_DIR_LOG,
                    ENV_TEST_COLLECT_BASE_DIR
                ))
            }
        };

        ensure_dir(&test_dir)?;
        Ok(test_dir)
    }

    /// Write `content` to `<test dir>/extras/<file_name>`
    pub fn write_extras_file(&self, file_name: &str, content: &str) -> Result<PathBuf> {
        self.write_extras_file_in(file_name, content, DEFAULT_EXTRAS_DIR_NAME)
    }

    /// Write `content` to `<test dir>/<dir_name>/<file_name>`.
    ///
    /// Directory setup failures are returned. A failing write is logged and
    /// swallowed, as extras must never break the test that produces them;
    /// the intended path is returned either way.
    pub fn write_extras_file_in(
        &self,
        file_name: &str,
        content: &str,
        dir_name: &str,
    ) -> Result<PathBuf> {
        let extras_dir = self.prepare_test_dir()?.join(sanitize_path_component(dir_name));
        ensure_dir(&extras_dir)?;

        let path = extras_dir.join(sanitize_path_component(file_name));
        write_or_log(&path, content);
        Ok(path)
    }
}

fn write_or_log(path: &Path, content: &str) {
    if let Err(e) = fs::write(path, content) {
        error!("Failed to write extras to file: {} {}", path.display(), e);
    }
}
