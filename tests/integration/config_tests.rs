//! Integration tests for layered configuration

use pagewalk::config::{load_config, resolve_options, CrawlerSettings};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_cli_overrides_file() {
    let file = write_config(
        r#"
        [crawler]
        depth = 3
        retries = 4
        delay = "250ms"
        user-agent = "file-agent"
        workers = 2
        "#,
    );
    let from_file = load_config(file.path()).unwrap().crawler;

    let cli = CrawlerSettings {
        depth: Some(7),
        user_agent: Some("cli-agent".to_string()),
        ..Default::default()
    };
    let options = resolve_options("example.com", cli.or(from_file)).unwrap();

    assert_eq!(options.depth, 7);
    assert_eq!(options.retries, 4);
    assert_eq!(options.delay, Duration::from_millis(250));
    assert_eq!(options.user_agent.as_deref(), Some("cli-agent"));
    assert_eq!(options.workers, 2);
    assert_eq!(options.timeout, Duration::from_secs(15));
}

#[test]
fn test_rps_in_file_overrides_delay() {
    let file = write_config(
        r#"
        [crawler]
        delay = "5s"
        rps = 4
        "#,
    );
    let settings = load_config(file.path()).unwrap().crawler;
    let options = resolve_options("https://example.com", settings).unwrap();

    assert_eq!(options.delay, Duration::from_millis(250));
}

#[test]
fn test_unknown_key_rejected() {
    let file = write_config("[crawler]\nmax-pages = 10\n");
    assert!(load_config(file.path()).is_err());
}
