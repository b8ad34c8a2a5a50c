use anyhow::{Context, Result};
use log::debug;
use std::fs::{create_dir_all, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use crate::core::config::SampleLogConfig;

/// Dashed rule separating sample records in the log file
const RECORD_SEPARATOR: &str = "--------------------";

/// Appends occasional correctness samples to a per-host text file.
///
/// Each sample is a scoped open-append-close; no handle is held across
/// calls. Directory creation is idempotent. Filesystem errors are
/// propagated to the caller rather than swallowed.
pub struct SampleLogger {
    /// Sampling configuration
    config: SampleLogConfig,

    /// Host identifier baked into the sample directory name
    host: String,
}

impl SampleLogger {
    /// Create a logger keyed by the `HOSTNAME` environment variable
    pub fn new(config: SampleLogConfig) -> Self {
        let host = std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown-host".to_string());
        Self::with_host(config, host)
    }

    /// Create a logger with an explicit host identifier
    pub fn with_host(config: SampleLogConfig, host: impl Into<String>) -> Self {
        Self {
            config,
            host: host.into(),
        }
    }

    /// Directory holding this host's sample file
    pub fn sample_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.base_dir).join(format!("gsm8k_samples_from_{}", self.host))
    }

    /// Full path of the sample file
    pub fn sample_file(&self) -> PathBuf {
        self.sample_dir().join("correctness_samples.txt")
    }

    /// Roll the sampling gate; on a hit, append one record.
    ///
    /// Returns `Ok(true)` when a record was written.
    pub fn maybe_log(
        &self,
        question: &str,
        answer: &str,
        response: &str,
        extracted: &str,
    ) -> Result<bool> {
        if !self.config.enabled {
            return Ok(false);
        }
        if rand::random::<f64>() >= self.config.sample_rate {
            return Ok(false);
        }
        self.append_sample(question, answer, response, extracted)?;
        Ok(true)
    }

    /// Append one sample record unconditionally
    pub fn append_sample(
        &self,
        question: &str,
        answer: &str,
        response: &str,
        extracted: &str,
    ) -> Result<()> {
        let dir = self.sample_dir();
        create_dir_all(&dir)
            .with_context(|| format!("Failed to create sample directory: {:?}", dir))?;

        let path = dir.join("correctness_samples.txt");
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open sample file: {:?}", path))?;

        let record = format!(
            "{}Question:\n{}\n\nAnswer:\n{}\n\nResponse:\n{}\n\nExtracted:\n{}",
            RECORD_SEPARATOR, question, answer, response, extracted
        );
        file.write_all(record.as_bytes())
            .with_context(|| format!("Failed to write sample record: {:?}", path))?;

        debug!("Wrote correctness sample to {:?}", path);

        Ok(())
    }
}
