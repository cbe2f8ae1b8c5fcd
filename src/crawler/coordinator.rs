//! Harvest coordinator - the ID-range crawl loop
//!
//! This module drives one sequential pass over `[start_id, end_id]`:
//! - Fetching and extracting each article ID
//! - Buffering records and flushing full batches
//! - Checkpointing and progress reporting at a fixed cadence
//! - Pacing between requests
//! - Flushing and checkpointing on termination, including Ctrl-C

use crate::article::ArticleId;
use crate::config::{validate_id_range, Config};
use crate::crawler::extractor::extract;
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchOutcome};
use crate::crawler::pacing::Pacer;
use crate::output::{open_sink, BatchWriter, ProgressReport, RecordSink, RunStatistics};
use crate::profile::FieldSelectorProfile;
use crate::state::{CrawlState, PageOutcome, SkipReason};
use crate::storage::{open_checkpoint, CheckpointStore, FileCheckpointStore, DEFAULT_START_ID};
use crate::HarvestError;
use reqwest::Client;
use std::future::Future;
use std::path::Path;

/// Run-level overrides, usually from the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct HarvestOptions {
    /// Ignore the stored checkpoint
    pub fresh: bool,

    /// Start here regardless of checkpoint and config
    pub start_id: Option<ArticleId>,

    /// Stop here instead of the configured end
    pub end_id: Option<ArticleId>,
}

/// Main harvest coordinator structure
pub struct Harvester {
    config: Config,
    client: Client,
    profile: FieldSelectorProfile,
    pacer: Pacer,
    checkpoint: FileCheckpointStore,
    writer: BatchWriter<Box<dyn RecordSink>>,
    start_id: ArticleId,
    end_id: ArticleId,
}

impl Harvester {
    /// Creates a new harvester instance
    ///
    /// The start ID is, in order of precedence: `options.start_id`, the
    /// stored checkpoint plus one (unless `options.fresh`), the configured
    /// `start-id`, and finally 1.
    ///
    /// # Arguments
    ///
    /// * `config` - The harvest configuration
    /// * `options` - Run-level overrides
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to run
    /// * `Err(HarvestError)` - Invalid override range, invalid profile or HTTP
    ///   client setup failure
    pub fn new(config: Config, options: HarvestOptions) -> Result<Self, HarvestError> {
        let end_id = options.end_id.unwrap_or(config.crawler.end_id);
        validate_id_range(options.start_id, end_id)?;

        let profile = FieldSelectorProfile::from_config(&config.source.profile)?;
        let client = build_http_client(&config.http)?;
        let pacer = Pacer::from_config(&config.crawler);
        let checkpoint = open_checkpoint(Path::new(&config.output.checkpoint_path));

        let configured_start = config.crawler.start_id.unwrap_or(DEFAULT_START_ID);
        let start_id = match options.start_id {
            Some(id) => id,
            None if options.fresh => configured_start,
            None => match checkpoint.load() {
                Some(_) => checkpoint.resume_from(),
                None => configured_start,
            },
        };

        let writer = BatchWriter::new(open_sink(&config.output), config.crawler.batch_size);

        Ok(Self {
            config,
            client,
            profile,
            pacer,
            checkpoint,
            writer,
            start_id,
            end_id,
        })
    }

    /// First ID this run will process
    pub fn start_id(&self) -> ArticleId {
        self.start_id
    }

    /// Last ID this run will process
    pub fn end_id(&self) -> ArticleId {
        self.end_id
    }

    /// The compiled selector profile
    pub fn profile(&self) -> &FieldSelectorProfile {
        &self.profile
    }

    /// Runs the crawl loop until the range is exhausted or Ctrl-C is pressed
    pub async fn run(&mut self) -> Result<RunStatistics, HarvestError> {
        self.run_until(tokio::signal::ctrl_c()).await
    }

    /// Runs the crawl loop until the range is exhausted or `shutdown` completes
    ///
    /// Buffered records are flushed and the checkpoint is written on every
    /// exit path. If the loop stopped on an error, that error is returned
    /// after the final flush.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<RunStatistics, HarvestError>
    where
        F: Future,
    {
        let mut state = CrawlState::new(self.start_id, self.end_id);
        tokio::pin!(shutdown);

        tracing::info!(
            "Harvesting {} ids {}..={} into {} (profile: {})",
            self.config.source.name,
            self.start_id,
            self.end_id,
            self.writer.sink().describe(),
            self.profile.name
        );

        let loop_result: Result<(), HarvestError> = loop {
            if state.is_done() {
                break Ok(());
            }
            let id = state.current_id();

            let outcome = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::warn!("Shutdown requested, stopping before id {}", id);
                    state.stats.interrupted = true;
                    break Ok(());
                }
                outcome = self.process_id(id) => outcome,
            };

            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(e) => break Err(e),
            };

            if let Err(e) = self.account(&mut state, id, outcome) {
                break Err(e);
            }

            if state.is_done() {
                continue;
            }

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::warn!("Shutdown requested, stopping after id {}", id);
                    state.stats.interrupted = true;
                    break Ok(());
                }
                _ = self.pacer.pause() => {}
            }
        };

        let result = self.finish(&mut state, loop_result);

        tracing::info!(
            "Harvest finished: {} ids processed, {} records harvested ({:.1}%)",
            state.stats.processed,
            state.stats.harvested,
            state.stats.success_rate()
        );

        result.map(|()| state.stats)
    }

    /// Fetches and extracts a single article ID
    ///
    /// Transport and extraction failures are returned as
    /// `PageOutcome::Skipped`; only an unbuildable URL is an error.
    pub async fn process_id(&self, id: ArticleId) -> Result<PageOutcome, HarvestError> {
        let url = self
            .config
            .source
            .article_url(id)
            .map_err(|e| HarvestError::ArticleUrl {
                id,
                message: e.to_string(),
            })?;

        let outcome = match fetch_page(&self.client, url.as_str(), &self.config.http.user_agents).await
        {
            FetchOutcome::Fetched {
                final_url,
                status_code,
                body,
            } => {
                tracing::trace!("Fetched id {} from {} (HTTP {})", id, final_url, status_code);
                extract(&body, &self.profile)
            }
            FetchOutcome::Failed(failure) => PageOutcome::Skipped(SkipReason::Fetch(failure)),
        };

        Ok(outcome)
    }

    /// Records one outcome, then runs the accounting and flush steps
    fn account(
        &mut self,
        state: &mut CrawlState,
        id: ArticleId,
        outcome: PageOutcome,
    ) -> Result<(), HarvestError> {
        state.record(&outcome);

        match outcome {
            PageOutcome::Harvested(record) => {
                tracing::debug!("Harvested id {}: {}", id, record.title);
                self.writer.append(record);
            }
            PageOutcome::Skipped(reason) => {
                tracing::debug!("Skipped id {}: {}", id, reason);
            }
        }

        if state.at_accounting_boundary(self.config.crawler.checkpoint_interval) {
            let total_elapsed = state.close_window();
            self.checkpoint.write(id)?;

            let report =
                ProgressReport::estimate(id, state.end_id(), total_elapsed, state.processed());
            tracing::info!(
                "Progress: {} ({:.2}%, {} harvested)",
                report,
                report.percent(),
                state.stats.harvested
            );
        }

        if self.writer.is_full() {
            let written = self.writer.flush()?;
            state.stats.rows_written += written as u64;
        }

        Ok(())
    }

    /// Final flush and checkpoint, run on every exit path
    fn finish(
        &mut self,
        state: &mut CrawlState,
        loop_result: Result<(), HarvestError>,
    ) -> Result<(), HarvestError> {
        let mut result = loop_result;
        if let Err(e) = &result {
            tracing::error!("Harvest loop stopped: {}", e);
        }

        match self.writer.flush() {
            Ok(written) => {
                state.stats.rows_written += written as u64;
                if let Some(last) = state.last_processed() {
                    if let Err(e) = self.checkpoint.write(last) {
                        tracing::error!("Failed to write final checkpoint {}: {}", last, e);
                        if result.is_ok() {
                            result = Err(e.into());
                        }
                    }
                }
            }
            Err(e) => {
                tracing::error!(
                    "Final flush failed, {} buffered records not written: {}",
                    self.writer.len(),
                    e
                );
                if result.is_ok() {
                    result = Err(e.into());
                }
            }
        }

        result
    }
}

/// Runs a complete harvest with Ctrl-C handling
///
/// # Example
///
/// ```no_run
/// use archive_harvest::config::load_config;
/// use archive_harvest::crawler::{run_harvest, HarvestOptions};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("configs/cnyes.toml"))?;
/// let stats = run_harvest(config, HarvestOptions::default()).await?;
/// println!("{} records", stats.harvested);
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(
    config: Config,
    options: HarvestOptions,
) -> Result<RunStatistics, HarvestError> {
    let mut harvester = Harvester::new(config, options)?;
    harvester.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::ArticleRecord;
    use crate::config::{
        CrawlerConfig, HttpConfig, OutputConfig, OutputFormat, ProfileConfig, SourceConfig,
    };
    use crate::ConfigError;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_config(dir: &TempDir, start_id: Option<u64>) -> Config {
        Config {
            crawler: CrawlerConfig {
                end_id: 100,
                start_id,
                batch_size: 5,
                checkpoint_interval: 5,
                pacing_min_ms: 0,
                pacing_max_ms: 0,
            },
            source: SourceConfig {
                name: "cmoney".to_string(),
                url_template: "http://127.0.0.1:1/notes/note-detail.aspx?nid=".to_string(),
                profile: ProfileConfig {
                    preset: Some("cmoney".to_string()),
                    ..Default::default()
                },
            },
            http: HttpConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Csv,
                path: dir.path().join("news.csv").display().to_string(),
                checkpoint_path: dir.path().join("ids.txt").display().to_string(),
                byte_order_mark: false,
            },
        }
    }

    #[test]
    fn test_start_defaults_to_one() {
        let dir = TempDir::new().unwrap();
        let harvester =
            Harvester::new(create_test_config(&dir, None), HarvestOptions::default()).unwrap();

        assert_eq!(harvester.start_id(), 1);
        assert_eq!(harvester.end_id(), 100);
        assert_eq!(harvester.profile().name, "cmoney");
    }

    #[test]
    fn test_start_resumes_after_checkpoint() {
        let dir = TempDir::new().unwrap();
        let config = create_test_config(&dir, Some(10));
        fs::write(&config.output.checkpoint_path, "40").unwrap();

        let harvester = Harvester::new(config, HarvestOptions::default()).unwrap();
        assert_eq!(harvester.start_id(), 41);
    }

    #[test]
    fn test_configured_start_without_checkpoint() {
        let dir = TempDir::new().unwrap();
        let harvester =
            Harvester::new(create_test_config(&dir, Some(10)), HarvestOptions::default())
                .unwrap();
        assert_eq!(harvester.start_id(), 10);
    }

    #[test]
    fn test_fresh_ignores_checkpoint() {
        let dir = TempDir::new().unwrap();
        let config = create_test_config(&dir, None);
        fs::write(&config.output.checkpoint_path, "40").unwrap();

        let options = HarvestOptions {
            fresh: true,
            ..Default::default()
        };
        let harvester = Harvester::new(config, options).unwrap();
        assert_eq!(harvester.start_id(), 1);
    }

    #[test]
    fn test_explicit_range_overrides() {
        let dir = TempDir::new().unwrap();
        let config = create_test_config(&dir, None);
        fs::write(&config.output.checkpoint_path, "40").unwrap();

        let options = HarvestOptions {
            fresh: false,
            start_id: Some(7),
            end_id: Some(9),
        };
        let harvester = Harvester::new(config, options).unwrap();
        assert_eq!(harvester.start_id(), 7);
        assert_eq!(harvester.end_id(), 9);
    }

    #[test]
    fn test_zero_start_override_rejected() {
        let dir = TempDir::new().unwrap();
        let options = HarvestOptions {
            start_id: Some(0),
            ..Default::default()
        };

        let result = Harvester::new(create_test_config(&dir, None), options);
        assert!(matches!(
            result,
            Err(HarvestError::Config(ConfigError::Validation(_)))
        ));
    }

    #[test]
    fn test_unterminated_end_override_rejected() {
        let dir = TempDir::new().unwrap();
        let options = HarvestOptions {
            end_id: Some(u64::MAX),
            ..Default::default()
        };

        let result = Harvester::new(create_test_config(&dir, None), options);
        assert!(matches!(
            result,
            Err(HarvestError::Config(ConfigError::Validation(_)))
        ));
    }

    fn harvested(id: ArticleId) -> PageOutcome {
        PageOutcome::Harvested(ArticleRecord {
            title: format!("Article {}", id),
            time: "2021-03-04".to_string(),
            author: "desk".to_string(),
            content: "body".to_string(),
            tags: String::new(),
        })
    }

    fn csv_row_count(path: &str) -> usize {
        match fs::read_to_string(path) {
            Ok(content) => content.lines().count(),
            Err(_) => 0,
        }
    }

    #[test]
    fn test_checkpoint_cadence_and_flush_threshold() {
        let dir = TempDir::new().unwrap();
        let mut config = create_test_config(&dir, None);
        config.crawler.end_id = 5;
        config.crawler.batch_size = 2;
        config.crawler.checkpoint_interval = 2;
        let output_path = config.output.path.clone();
        let checkpoint_path = config.output.checkpoint_path.clone();

        let mut harvester = Harvester::new(config, HarvestOptions::default()).unwrap();
        let mut state = CrawlState::new(harvester.start_id(), harvester.end_id());
        let checkpoint = || fs::read_to_string(&checkpoint_path).ok();

        // (id, checkpoint after the step, rows in the table after the step)
        let expected = [
            (1, None, 0),
            (2, Some("2"), 2),
            (3, Some("2"), 2),
            (4, Some("4"), 4),
            (5, Some("4"), 4),
        ];

        for (id, want_checkpoint, want_rows) in expected {
            assert_eq!(state.current_id(), id);
            harvester.account(&mut state, id, harvested(id)).unwrap();

            assert_eq!(checkpoint().as_deref(), want_checkpoint, "checkpoint after id {}", id);
            assert_eq!(csv_row_count(&output_path), want_rows, "rows after id {}", id);
        }

        assert!(state.is_done());
        assert_eq!(state.stats.rows_written, 4);

        harvester.finish(&mut state, Ok(())).unwrap();

        assert_eq!(checkpoint().as_deref(), Some("5"));
        assert_eq!(csv_row_count(&output_path), 5);
        assert_eq!(state.stats.rows_written, 5);
    }

    #[tokio::test]
    async fn test_immediate_shutdown_processes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = create_test_config(&dir, None);
        let checkpoint_path = config.output.checkpoint_path.clone();
        let mut harvester = Harvester::new(config, HarvestOptions::default()).unwrap();

        let stats = harvester.run_until(async {}).await.unwrap();

        assert!(stats.interrupted);
        assert_eq!(stats.processed, 0);
        assert!(!Path::new(&checkpoint_path).exists());
    }

    #[tokio::test]
    async fn test_empty_range_after_completed_run() {
        let dir = TempDir::new().unwrap();
        let config = create_test_config(&dir, None);
        fs::write(&config.output.checkpoint_path, "100").unwrap();

        let mut harvester = Harvester::new(config, HarvestOptions::default()).unwrap();
        assert_eq!(harvester.start_id(), 101);

        let stats = harvester.run_until(std::future::pending::<()>()).await.unwrap();
        assert_eq!(stats.processed, 0);
        assert!(!stats.interrupted);
    }
}
