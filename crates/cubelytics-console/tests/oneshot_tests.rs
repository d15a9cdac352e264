use std::sync::Arc;

use cubelytics_client::ReplayTransport;
use cubelytics_console::oneshot::{run_search, SearchOutcome};
use cubelytics_console::output::{format_human, format_json};
use cubelytics_console::Config;

const TRANSCRIPT: &str = "\
data: {\"type\":\"player\",\"username\":\"Notch\",\"uuid\":\"069a79f444e94726a5befca90e38aaf5\",\"skin_url\":\"\",\"platform\":\"java\"}

data: {\"type\":\"source\",\"label\":\"jartexnetwork.com\",\"data\":null,\"error\":\"timeout\",\"fetched\":1,\"total\":2}

data: {\"type\":\"source\",\"label\":\"mctiers.com\",\"data\":{\"name\":\"Notch\",\"rankings\":{\"Overall\":{\"tier\":3,\"pos\":12,\"peak_tier\":1,\"peak_pos\":2,\"retired\":false}}},\"error\":null,\"fetched\":2,\"total\":2}

data: {\"type\":\"done\"}

";

async fn outcome(transcript: &str) -> SearchOutcome {
    let transport = Arc::new(ReplayTransport::from_transcript(transcript));
    run_search(transport, "Notch").await.unwrap()
}

#[tokio::test]
async fn test_plain_output_lists_cards_success_first() {
    let outcome = outcome(TRANSCRIPT).await;
    assert!(!outcome.is_failure());

    let text = format_human("Notch", &outcome);
    assert!(text.starts_with("Notch  Java\n069a79f444e94726a5befca90e38aaf5\nSkin: https://mc-heads.net/body/MHF_Steve/right\n"));
    assert!(text.contains("2 source(s) for \"Notch\""));
    let tiers = text.find("⚔️ mctiers.com [OK]").unwrap();
    let failed = text.find("🔮 jartexnetwork.com [Error]").unwrap();
    assert!(tiers < failed);
    assert!(text.contains("⚠ timeout"));
    assert!(text.contains("peak: T1 #2"));
    assert!(text.trim_end().ends_with("✔ mctiers.com  ✘ jartexnetwork.com"));
}

#[tokio::test]
async fn test_json_output_shape() {
    let outcome = outcome(TRANSCRIPT).await;
    let value: serde_json::Value = serde_json::from_str(&format_json("Notch", &outcome)).unwrap();

    assert_eq!(value["status"], "done");
    assert_eq!(value["player"]["display_name"], "Notch");
    assert_eq!(value["results"]["cards"][0]["id"], "source-0");
    assert_eq!(value["results"]["cards"][1]["status"], "failed");
    assert_eq!(value["results"]["nav"][1]["target"], "source-1");
    assert!(value.get("error").is_none());
}

#[tokio::test]
async fn test_failed_search_reports_message() {
    let outcome = outcome("{\"type\":\"error\",\"message\":\"Player 'Notch' not found\"}\n").await;
    assert!(outcome.is_failure());
    assert_eq!(
        format_human("Notch", &outcome),
        "Search for \"Notch\" failed: Player 'Notch' not found\n"
    );

    let value: serde_json::Value = serde_json::from_str(&format_json("Notch", &outcome)).unwrap();
    assert_eq!(value["status"], "error");
    assert_eq!(value["error"], "Player 'Notch' not found");
    assert!(value.get("results").is_none());
}

#[tokio::test]
async fn test_human_output_is_stable() {
    let outcome = outcome(TRANSCRIPT).await;
    let first = format_human("Notch", &outcome);
    assert_eq!(first, format_human("Notch", &outcome));

    let headers: Vec<&str> = first.lines().filter(|l| l.starts_with('▼')).collect();
    assert_eq!(headers[0], "▼ ⚔️ mctiers.com [OK]");
}

#[test]
fn test_config_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[server]\nbase_url = \"http://stats.local:9000\"\n\n[logging]\nfilter = \"debug\"\nfile = \"/tmp/cubelytics.log\"\n",
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.server.base_url, "http://stats.local:9000");
    assert_eq!(config.logging.filter, "debug");
    assert_eq!(config.display.progress_linger_ms, 800);
}

#[test]
fn test_missing_explicit_config_is_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Config::load(Some(&dir.path().join("absent.toml"))).is_err());
}
