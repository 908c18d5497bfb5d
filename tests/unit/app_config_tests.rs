/*!
 * Tests for application configuration
 */

use anyhow::Result;
use log::LevelFilter;
use subsense::app_config::{Config, LogLevel};
use subsense::errors::AnalysisError;
use crate::common;

#[test]
fn test_default_config_shouldHaveDocumentedDefaults() {
    let config = Config::default();

    assert_eq!(config.normalizer.max_words_without_punct, 40);
    assert!(config.normalizer.merge_ellipsis);
    assert!(config.normalizer.merge_leading_dash_dialogs);
    assert!(config.normalizer.abbreviations.contains(&"Dr.".to_string()));
    assert_eq!(config.analysis.temperature, 0.4);
    assert_eq!(config.analysis.max_tokens, 2000);
    assert_eq!(config.analysis.explanation_language, "Russian");
    assert_eq!(config.slang.limit, 2);
    assert_eq!(config.slang.cache_ttl_secs, 3600);
    assert_eq!(config.upload.max_file_size_bytes, 10 * 1024 * 1024);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_withPartialJson_shouldFillDefaults() -> Result<()> {
    let json = r#"{
        "normalizer": { "max_words_without_punct": 12 },
        "analysis": { "model": "some/model" },
        "log_level": "debug"
    }"#;
    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.normalizer.max_words_without_punct, 12);
    assert!(config.normalizer.merge_ellipsis);
    assert_eq!(config.normalizer.abbreviations.len(), 17);
    assert_eq!(config.analysis.model, "some/model");
    assert_eq!(config.analysis.concurrent_requests, 4);
    assert!(config.slang.enabled);
    assert_eq!(config.log_level.to_level_filter(), LevelFilter::Debug);
    Ok(())
}

#[test]
fn test_validate_withInvalidValues_shouldFail() {
    let mut config = Config::default();
    config.normalizer.max_words_without_punct = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.analysis.temperature = 3.5;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.analysis.concurrent_requests = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.upload.max_file_size_bytes = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.slang.enabled = false;
    config.slang.limit = 0;
    assert!(config.validate().is_ok());
}

#[test]
fn test_validateForAnalysis_withConfiguredKey_shouldPass() {
    let mut config = Config::default();
    config.analysis.api_key = "sk-test".to_string();
    assert!(config.validate_for_analysis().is_ok());
    assert_eq!(config.analysis.resolved_api_key(), "sk-test");

    config.analysis.model = "  ".to_string();
    assert!(config.validate_for_analysis().is_err());
}

#[test]
fn test_validateForAnalysis_withoutKey_shouldReturnMissingApiKey() {
    if std::env::var(subsense::app_config::API_KEY_ENV_VAR).is_ok_and(|key| !key.trim().is_empty()) {
        return;
    }

    let config = Config::default();
    let error = config.validate_for_analysis().unwrap_err();

    assert!(matches!(error.downcast_ref::<AnalysisError>(), Some(AnalysisError::MissingApiKey)));
    assert!(config.validate().is_ok());
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());

    let reloaded = Config::from_file(&path)?;
    assert_eq!(reloaded.normalizer, created.normalizer);
    assert_eq!(reloaded.analysis.model, created.analysis.model);
    Ok(())
}

#[test]
fn test_saveAndLoad_withChangedValues_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("custom.json");

    let mut config = Config::default();
    config.normalizer.merge_ellipsis = false;
    config.slang.enabled = false;
    config.log_level = LogLevel::Warn;
    config.save(&path)?;

    let loaded = Config::load_or_create(&path)?;
    assert!(!loaded.normalizer.merge_ellipsis);
    assert!(!loaded.slang.enabled);
    assert_eq!(loaded.log_level, LogLevel::Warn);
    Ok(())
}

#[test]
fn test_fromFile_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "bad.json", "{ not json")?;

    assert!(Config::from_file(&path).is_err());
    Ok(())
}
