//! The current engine snapshot and the operations that replace it.
//!
//! Front-ends hold a `Session` and ask it for the current snapshot. Refresh
//! and regenerate never mutate a snapshot: they build a new one and swap the
//! `Arc`, so anyone still holding the previous snapshot keeps a consistent view.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::data::{GenerationSummary, GeneratorConfig, generate_sales, summarize};
use crate::engine::{EventSink, SalesAnalyzer};
use crate::error::{AppError, LoadError};
use crate::io::write_sales_csv;

pub struct Session {
    config: AppConfig,
    sink: Arc<dyn EventSink>,
    current: Arc<SalesAnalyzer>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("data_path", &self.config.data.path)
            .field("current", &self.current)
            .finish()
    }
}

impl Session {
    /// Load the configured data file.
    pub fn open(config: AppConfig, sink: Arc<dyn EventSink>) -> Result<Self, LoadError> {
        let analyzer = SalesAnalyzer::load(&config.data.path, &config.analysis, sink.clone())?;
        Ok(Self {
            config,
            sink,
            current: Arc::new(analyzer),
        })
    }

    /// Load the configured data file, generating demo data first when it is missing.
    ///
    /// Returns the generation summary when fixtures had to be created.
    pub fn open_or_generate(
        config: AppConfig,
        sink: Arc<dyn EventSink>,
        end_date: NaiveDate,
    ) -> Result<(Self, Option<GenerationSummary>), AppError> {
        match Self::open(config.clone(), sink.clone()) {
            Ok(session) => Ok((session, None)),
            Err(err) if err.is_not_found() => {
                info!(path = %config.data.path.display(), "no sales data found, generating demo data");
                let summary = generate_fixture(&config.data.path, &GeneratorConfig::from(&config.data), end_date)?;
                let session = Self::open(config, sink)?;
                Ok((session, Some(summary)))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn snapshot(&self) -> Arc<SalesAnalyzer> {
        Arc::clone(&self.current)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn data_path(&self) -> &Path {
        &self.config.data.path
    }

    /// Reload the data file into a fresh snapshot.
    ///
    /// On failure the previous snapshot stays current.
    pub fn refresh(&mut self) -> Result<Arc<SalesAnalyzer>, LoadError> {
        match SalesAnalyzer::load(&self.config.data.path, &self.config.analysis, self.sink.clone()) {
            Ok(analyzer) => {
                self.current = Arc::new(analyzer);
                info!(records = self.current.len(), "snapshot refreshed");
                Ok(self.snapshot())
            }
            Err(err) => {
                warn!(error = %err, "refresh failed, keeping previous snapshot");
                Err(err)
            }
        }
    }

    /// Overwrite the data file with freshly generated fixtures, then refresh.
    pub fn regenerate(&mut self, end_date: NaiveDate) -> Result<GenerationSummary, AppError> {
        let generator = GeneratorConfig::from(&self.config.data);
        let summary = generate_fixture(&self.config.data.path, &generator, end_date)?;
        self.refresh()?;
        Ok(summary)
    }
}

/// Generate fixtures and write them to `path`.
pub fn generate_fixture(
    path: &Path,
    generator: &GeneratorConfig,
    end_date: NaiveDate,
) -> Result<GenerationSummary, AppError> {
    let records = generate_sales(generator, end_date)?;
    write_sales_csv(path, &records)?;
    let summary = summarize(&records, generator, end_date);
    info!(
        records = summary.records,
        path = %path.display(),
        "generated demo sales data"
    );
    Ok(summary)
}
