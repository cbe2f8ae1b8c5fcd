//! Integration tests for the crawl loop
//!
//! Each test mounts article pages on a mock server, runs a harvest into a
//! temporary directory and inspects the output table and checkpoint file.

use archive_harvest::config::{
    Config, CrawlerConfig, FieldConfig, HttpConfig, OutputConfig, OutputFormat, ProfileConfig,
    SourceConfig,
};
use archive_harvest::crawler::{HarvestOptions, Harvester};
use archive_harvest::output::RunStatistics;
use archive_harvest::{PageOutcome, SkipReason};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn field(selector: &str, required: bool) -> FieldConfig {
    FieldConfig {
        selectors: vec![selector.to_string()],
        required,
        attribute: None,
    }
}

/// Custom profile matching the pages built by [`article_page`]
fn test_profile() -> ProfileConfig {
    let mut fields = BTreeMap::new();
    fields.insert("title".to_string(), field("h1", true));
    fields.insert("time".to_string(), field("time", true));
    fields.insert("author".to_string(), field(".author", true));
    fields.insert("content".to_string(), field("article p", true));
    fields.insert("tags".to_string(), field(".tags a", false));

    ProfileConfig {
        fields: Some(fields),
        tags_placeholder: Some("None".to_string()),
        ..Default::default()
    }
}

/// Creates a test configuration harvesting `[1, end_id]` from the mock server
fn create_test_config(
    server: &MockServer,
    dir: &TempDir,
    end_id: u64,
    batch_size: usize,
    format: OutputFormat,
) -> Config {
    let file_name = match format {
        OutputFormat::Csv => "news.csv",
        OutputFormat::Sqlite => "news.db",
    };

    Config {
        crawler: CrawlerConfig {
            end_id,
            start_id: None,
            batch_size,
            checkpoint_interval: 1,
            pacing_min_ms: 0,
            pacing_max_ms: 0,
        },
        source: SourceConfig {
            name: "test-archive".to_string(),
            url_template: format!("{}/news/{{id}}", server.uri()),
            profile: test_profile(),
        },
        http: HttpConfig {
            timeout_secs: 5,
            connect_timeout_secs: 5,
            user_agents: vec!["HarvestTest/1.0".to_string()],
        },
        output: OutputConfig {
            format,
            path: dir.path().join(file_name).display().to_string(),
            checkpoint_path: dir.path().join("ids.txt").display().to_string(),
            byte_order_mark: false,
        },
    }
}

fn article_page(title: &str) -> String {
    format!(
        r#"<html><body>
        <h1>{title}</h1>
        <time>2021-03-04 09:15</time>
        <span class="author">Reporter</span>
        <article><p>Body of {title}</p><p>Related links</p></article>
        <div class="tags"><a>markets</a><a>rates</a></div>
        </body></html>"#
    )
}

async fn mount_article(server: &MockServer, id: u64, title: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/news/{}", id)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(article_page(title))
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

async fn mount_status(server: &MockServer, id: u64, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/news/{}", id)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

fn read_csv_rows(path: &str) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .expect("Failed to open output CSV");

    reader
        .records()
        .map(|row| {
            row.expect("Failed to read CSV row")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect()
}

fn read_checkpoint(path: &str) -> String {
    fs::read_to_string(path).expect("Failed to read checkpoint")
}

async fn run_to_completion(config: Config, options: HarvestOptions) -> RunStatistics {
    let mut harvester = Harvester::new(config, options).expect("Failed to create harvester");
    harvester
        .run_until(std::future::pending::<()>())
        .await
        .expect("Harvest failed")
}

#[tokio::test]
async fn test_harvest_skips_failed_ids() {
    let server = MockServer::start().await;
    mount_article(&server, 1, "A").await;
    mount_status(&server, 2, 500).await;
    mount_article(&server, 3, "C").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir, 3, 50, OutputFormat::Csv);
    let output_path = config.output.path.clone();
    let checkpoint_path = config.output.checkpoint_path.clone();

    let stats = run_to_completion(config, HarvestOptions::default()).await;

    assert_eq!(stats.processed, 3);
    assert_eq!(stats.harvested, 2);
    assert_eq!(stats.rows_written, 2);
    assert_eq!(stats.skipped["http_status"], 1);
    assert!(!stats.interrupted);

    let rows = read_csv_rows(&output_path);
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0],
        vec!["A", "2021-03-04 09:15", "Reporter", "Body of A", "markets, rates"]
    );
    assert_eq!(rows[1][0], "C");

    assert_eq!(read_checkpoint(&checkpoint_path), "3");
}

#[tokio::test]
async fn test_missing_pages_and_partial_renders_are_skipped() {
    let server = MockServer::start().await;
    mount_article(&server, 1, "A").await;
    // ID 2 is not mounted and answers 404
    Mock::given(method("GET"))
        .and(path("/news/3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><h1>Only a title</h1></body></html>"),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir, 3, 50, OutputFormat::Csv);
    let output_path = config.output.path.clone();

    let stats = run_to_completion(config, HarvestOptions::default()).await;

    assert_eq!(stats.harvested, 1);
    assert_eq!(stats.skipped["http_status"], 1);
    assert_eq!(stats.skipped["missing_field"], 1);
    assert_eq!(read_csv_rows(&output_path).len(), 1);
}

#[tokio::test]
async fn test_resume_continues_after_checkpoint() {
    let server = MockServer::start().await;
    for (id, title) in [(1, "A"), (2, "B"), (3, "C"), (4, "D")] {
        mount_article(&server, id, title).await;
    }

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir, 4, 50, OutputFormat::Csv);
    let output_path = config.output.path.clone();
    let checkpoint_path = config.output.checkpoint_path.clone();

    // First run stops at 2
    let first = HarvestOptions {
        end_id: Some(2),
        ..Default::default()
    };
    let stats = run_to_completion(config.clone(), first).await;
    assert_eq!(stats.harvested, 2);
    assert_eq!(read_checkpoint(&checkpoint_path), "2");

    // Second run picks up at 3
    let harvester = Harvester::new(config.clone(), HarvestOptions::default()).unwrap();
    assert_eq!(harvester.start_id(), 3);

    let stats = run_to_completion(config, HarvestOptions::default()).await;
    assert_eq!(stats.start_id, 3);
    assert_eq!(stats.processed, 2);

    let titles: Vec<String> = read_csv_rows(&output_path)
        .into_iter()
        .map(|row| row[0].clone())
        .collect();
    assert_eq!(titles, vec!["A", "B", "C", "D"]);
    assert_eq!(read_checkpoint(&checkpoint_path), "4");
}

#[tokio::test]
async fn test_fresh_run_ignores_checkpoint() {
    let server = MockServer::start().await;
    mount_article(&server, 1, "A").await;
    mount_article(&server, 2, "B").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir, 2, 50, OutputFormat::Csv);
    fs::write(&config.output.checkpoint_path, "2").unwrap();

    let options = HarvestOptions {
        fresh: true,
        ..Default::default()
    };
    let stats = run_to_completion(config, options).await;

    assert_eq!(stats.start_id, 1);
    assert_eq!(stats.harvested, 2);
}

#[tokio::test]
async fn test_partial_batch_flushed_at_end() {
    let server = MockServer::start().await;
    for (id, title) in [(1, "A"), (2, "B"), (3, "C")] {
        mount_article(&server, id, title).await;
    }

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir, 3, 2, OutputFormat::Csv);
    let output_path = config.output.path.clone();

    let stats = run_to_completion(config, HarvestOptions::default()).await;

    assert_eq!(stats.rows_written, 3);
    let titles: Vec<String> = read_csv_rows(&output_path)
        .into_iter()
        .map(|row| row[0].clone())
        .collect();
    assert_eq!(titles, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_batch_larger_than_yield() {
    let server = MockServer::start().await;
    mount_article(&server, 2, "B").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir, 3, 50, OutputFormat::Csv);
    let output_path = config.output.path.clone();

    let stats = run_to_completion(config, HarvestOptions::default()).await;

    assert_eq!(stats.harvested, 1);
    assert_eq!(read_csv_rows(&output_path).len(), 1);
}

#[tokio::test]
async fn test_no_records_leaves_no_output() {
    let server = MockServer::start().await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir, 2, 50, OutputFormat::Csv);
    let output_path = config.output.path.clone();
    let checkpoint_path = config.output.checkpoint_path.clone();

    let stats = run_to_completion(config, HarvestOptions::default()).await;

    assert_eq!(stats.harvested, 0);
    assert_eq!(stats.rows_written, 0);
    assert!(!Path::new(&output_path).exists());
    assert_eq!(read_checkpoint(&checkpoint_path), "2");
}

#[tokio::test]
async fn test_sqlite_output() {
    let server = MockServer::start().await;
    mount_article(&server, 1, "A").await;
    mount_article(&server, 2, "B").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir, 2, 1, OutputFormat::Sqlite);
    let output_path = config.output.path.clone();

    let stats = run_to_completion(config, HarvestOptions::default()).await;
    assert_eq!(stats.rows_written, 2);

    let conn = rusqlite::Connection::open(&output_path).unwrap();
    let mut stmt = conn
        .prepare("SELECT title, content, tags FROM articles ORDER BY id")
        .unwrap();
    let rows: Vec<(String, String, String)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(
        rows,
        vec![
            ("A".to_string(), "Body of A".to_string(), "markets, rates".to_string()),
            ("B".to_string(), "Body of B".to_string(), "markets, rates".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_interrupted_run_flushes_and_checkpoints() {
    let server = MockServer::start().await;
    mount_article(&server, 1, "A").await;
    mount_article(&server, 2, "B").await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&server, &dir, 1000, 50, OutputFormat::Csv);
    config.crawler.checkpoint_interval = 100;
    config.crawler.pacing_min_ms = 200;
    config.crawler.pacing_max_ms = 200;
    let output_path = config.output.path.clone();
    let checkpoint_path = config.output.checkpoint_path.clone();

    let mut harvester = Harvester::new(config, HarvestOptions::default()).unwrap();
    let shutdown = tokio::time::sleep(std::time::Duration::from_millis(300));
    let stats = harvester.run_until(shutdown).await.unwrap();

    assert!(stats.interrupted);
    assert!(stats.processed >= 1);
    assert!(stats.processed < 1000);

    // Everything harvested before the interrupt reached the output
    assert_eq!(stats.rows_written, stats.harvested);
    assert_eq!(read_csv_rows(&output_path).len() as u64, stats.harvested);

    let checkpoint: u64 = read_checkpoint(&checkpoint_path).parse().unwrap();
    assert_eq!(checkpoint, stats.processed);
}

#[tokio::test]
async fn test_process_id_reports_skip_reason() {
    let server = MockServer::start().await;
    mount_article(&server, 1, "A").await;
    mount_status(&server, 2, 503).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server, &dir, 2, 50, OutputFormat::Csv);
    let harvester = Harvester::new(config, HarvestOptions::default()).unwrap();

    let outcome = harvester.process_id(1).await.unwrap();
    assert_eq!(outcome.into_record().map(|r| r.title), Some("A".to_string()));

    match harvester.process_id(2).await.unwrap() {
        PageOutcome::Skipped(reason @ SkipReason::Fetch(_)) => {
            assert_eq!(reason.kind(), "http_status");
        }
        other => panic!("expected fetch skip, got {:?}", other),
    }
}
