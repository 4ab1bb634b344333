//! Ingest JSONL, then answer through the assistant against the on-disk index.

use crate::rag::test_support::StubProvider;
use crate::rag::TerminalState;
use crate::{build_assistant, learn, open_index, LearnOptions};
use fundqa_core::AppConfig;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const DOCS: &[&str] = &[
    r#"{"url":"https://example.com/flexi","scheme":"HDFC Flexi Cap Fund","description":"Scheme factsheet","text":"HDFC Flexi Cap Fund expense ratio is 1.05% for the direct plan."}"#,
    r#"{"url":"https://example.com/elss","scheme":"HDFC ELSS Tax Saver","text":"HDFC ELSS Tax Saver has a statutory lock-in period of three years."}"#,
    r#"{"url":"https://example.com/smallcap","scheme":"HDFC Small Cap Fund","text":"The riskometer level of HDFC Small Cap Fund is very high."}"#,
];

fn config_for(workspace: &Path) -> AppConfig {
    AppConfig {
        workspace: workspace.to_path_buf(),
        top_k: 2,
        ..AppConfig::default()
    }
}

fn write_docs(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("docs.jsonl");
    std::fs::write(&path, DOCS.join("\n")).unwrap();
    path
}

#[tokio::test]
async fn test_learn_then_answer() {
    let dir = TempDir::new().unwrap();
    let config = config_for(dir.path());
    let input = write_docs(dir.path());

    let index = open_index(&config).unwrap();
    assert!(!index.exists());

    let stats = learn(index.as_ref(), &LearnOptions::new(vec![input])).await.unwrap();
    assert_eq!(stats.chunks_count, 3);
    assert!(config.index_path().exists());

    let provider = Arc::new(StubProvider::replying("1.05% [Source 1]"));
    let assistant = build_assistant(&config, index, provider.clone()).unwrap();

    let r = assistant
        .ask("What is the expense ratio of HDFC Flexi Cap Fund?")
        .await;

    assert_eq!(r.state(), TerminalState::Answered);
    assert_eq!(r.answer(), "1.05% [Source 1]");
    assert_eq!(r.retrieved_docs(), 2);
    assert_eq!(r.sources()[0].url, "https://example.com/flexi");
    assert_eq!(r.sources()[0].description, "Scheme factsheet");
    assert_eq!(r.sources()[1].description, "");

    let prompt = provider.last_request().unwrap().prompt;
    assert!(prompt.contains("[Source 1]\nHDFC Flexi Cap Fund expense ratio is 1.05%"));
    assert!(prompt.contains("\n---\n[Source 2]\n"));
}

#[tokio::test]
async fn test_reopened_index_serves_answers() {
    let dir = TempDir::new().unwrap();
    let config = config_for(dir.path());
    let input = write_docs(dir.path());

    {
        let index = open_index(&config).unwrap();
        learn(index.as_ref(), &LearnOptions::new(vec![input])).await.unwrap();
    }

    let index = open_index(&config).unwrap();
    let stats = index.stats().await.unwrap();
    assert_eq!(stats.chunks_count, 3);
    assert_eq!(stats.sources_count, 3);

    let provider = Arc::new(StubProvider::replying("Three years [Source 1]"));
    let assistant = build_assistant(&config, index, provider).unwrap();
    let r = assistant.ask("What is the lock-in period for HDFC ELSS Tax Saver?").await;

    assert_eq!(r.sources()[0].scheme, "HDFC ELSS Tax Saver");
}

#[tokio::test]
async fn test_empty_workspace_gives_no_info() {
    let dir = TempDir::new().unwrap();
    let config = config_for(dir.path());
    let index = open_index(&config).unwrap();

    let provider = Arc::new(StubProvider::replying("unused"));
    let assistant = build_assistant(&config, index, provider.clone()).unwrap();

    let r = assistant.ask("What is the exit load for HDFC Large Cap Fund?").await;

    assert_eq!(r.state(), TerminalState::NoInfo);
    assert_eq!(provider.calls(), 0);
    assert!(!config.index_path().exists());
}

#[tokio::test]
async fn test_custom_prompt_file() {
    let dir = TempDir::new().unwrap();
    let prompt_path = dir.path().join("answer.yml");
    std::fs::write(
        &prompt_path,
        "id: fundqa.answer.terse\ntitle: Terse\napiVersion: v1.0\ntemplate: |\n  CTX {{context}}\n  Q {{question}}\n",
    )
    .unwrap();

    let config = AppConfig {
        prompt_file: Some(prompt_path),
        ..config_for(dir.path())
    };
    let index = open_index(&config).unwrap();
    learn(index.as_ref(), &LearnOptions::new(vec![write_docs(dir.path())]))
        .await
        .unwrap();

    let provider = Arc::new(StubProvider::replying("ok"));
    let assistant = build_assistant(&config, index, provider.clone()).unwrap();
    assistant.ask("What is the riskometer level?").await;

    let prompt = provider.last_request().unwrap().prompt;
    assert!(prompt.starts_with("CTX [Source 1]"));
    assert!(prompt.contains("Q What is the riskometer level?"));
}

#[test]
fn test_invalid_prompt_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let prompt_path = dir.path().join("bad.yml");
    std::fs::write(&prompt_path, "id: x\ntitle: y\napiVersion: v1.0\ntemplate: no placeholders\n").unwrap();

    let config = AppConfig {
        prompt_file: Some(prompt_path),
        ..config_for(dir.path())
    };
    assert!(crate::load_prompt_builder(&config).is_err());
}
