//! Integration tests for the tagwright CLI
//!
//! These tests drive the command layer against on-disk libraries and config
//! files, with a scripted provider standing in for the model.

use tagwright_cli::commands::{run_batch, show::describe_document};
use tagwright_cli::{Config, Formatter};
use tagwright_domain::traits::DocumentStore;
use tagwright_domain::DocumentId;
use tagwright_llm::MockProvider;
use tagwright_store::{NewDocument, SqliteLibrary};

#[test]
fn test_config_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.provider.model = "deepseek-reasoner".to_string();
    config.extractor.max_extended_fields = 5;
    config.settings.color = false;
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.provider.model, "deepseek-reasoner");
    assert_eq!(loaded.extractor.max_extended_fields, 5);
    assert!(!loaded.settings.color);
}

#[test]
fn test_missing_config_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
    assert!(config.settings.color);
}

#[test]
fn test_invalid_config_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[extractor]\nper_field_cap = 0\n").unwrap();
    assert!(Config::load_from(&path).is_err());

    std::fs::write(&path, "[extractor\n").unwrap();
    assert!(Config::load_from(&path).is_err());
}

#[tokio::test]
async fn test_run_then_show() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("library.sqlite");

    {
        let mut library = SqliteLibrary::new(&db).unwrap();
        library
            .insert_document(
                &NewDocument::regular("AAAA", "Humanoid Parkour").with_abstract("Atlas jumps."),
            )
            .unwrap();
    }

    let mut provider = MockProvider::default();
    provider.add_response("Summarize now", "- Atlas does parkour");
    provider.add_response(
        "Summary:",
        r#"{"robot_name": ["Atlas"], "task": ["parkour"], "institution": "Stanford University"}"#,
    );

    let mut config = Config::default();
    config.extractor.retry_delay_ms = 0;
    let report = run_batch(
        provider,
        SqliteLibrary::new(&db).unwrap(),
        config.extractor.clone(),
        &[DocumentId::from("AAAA")],
    )
    .await
    .unwrap();
    assert_eq!(report.succeeded, 1);

    let library = SqliteLibrary::new(&db).unwrap();
    assert_eq!(
        library.tags(&DocumentId::from("AAAA")).unwrap(),
        vec!["institution:Stanford", "robot_name:Atlas", "task:parkour"]
    );

    let output = describe_document("AAAA", &library, &Formatter::new(false)).unwrap();
    assert!(output.contains("  institution: Stanford\n"));
    assert!(output.contains("  robot_name: Atlas\n"));
}

#[tokio::test]
async fn test_run_with_empty_key_list_fails() {
    let result = run_batch(
        MockProvider::default(),
        SqliteLibrary::new(":memory:").unwrap(),
        Config::default().extractor,
        &[],
    )
    .await;
    assert!(result.is_err());
}
