/*!
 * Controller construction and configuration lifecycle
 */

use std::sync::Arc;
use anyhow::Result;

use yadt::app_config::Config;
use yadt::errors::AppError;
use yadt::providers::mock::MockTranslator;
use yadt::{Controller, RunOutcome};
use crate::common;

#[test]
fn test_withConfig_withoutApiKey_shouldBeConfigurationError() {
    let result = Controller::with_config(Config::default());

    match result {
        Err(AppError::Configuration(message)) => assert!(message.contains("DEEPL_API_KEY")),
        Err(other) => panic!("expected a configuration error, got {}", other),
        Ok(_) => panic!("a controller without an API key must not be built"),
    }
}

#[test]
fn test_withConfig_withApiKey_shouldKeepConfig() {
    let controller = Controller::with_config(common::test_config()).unwrap();

    assert_eq!(controller.config().translation.deepl.api_key, "test-key:fx");
    assert_eq!(controller.config().source_language, "fr");
}

#[test]
fn test_withTranslator_shouldNotRequireApiKey() {
    let controller = Controller::with_translator(Config::default(), Arc::new(MockTranslator::working()));

    assert!(controller.is_ok());
}

#[test]
fn test_withTranslator_withInvalidBatchSize_shouldFail() {
    let mut config = Config::default();
    config.translation.batch_size = 51;

    let result = Controller::with_translator(config, Arc::new(MockTranslator::working()));

    assert!(matches!(result, Err(AppError::Configuration(_))));
}

#[test]
fn test_withConfig_withInvalidEndpoint_shouldFail() {
    let mut config = common::test_config();
    config.translation.deepl.endpoint = "not a url".to_string();

    assert!(matches!(Controller::with_config(config), Err(AppError::Configuration(_))));
}

#[tokio::test]
async fn test_configFile_shouldDriveControllerSettings() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        br#"{"target_variant": "en-gb", "include_notes": false, "translation": {"batch_size": 2}}"#,
    )?;
    let config: Config = serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;

    let input = common::PptxBuilder::new()
        .slide_with_notes(
            vec![common::text_shape(&[&["un", "deux", "trois"]])],
            vec![common::text_shape(&[&["note"]])],
        )
        .write_to(temp_dir.path(), "cours.pptx")?;
    let mock = Arc::new(MockTranslator::working());
    let controller = Controller::with_translator(config, mock.clone())?;

    let outcome = controller.run(input, temp_dir.path().to_path_buf(), false).await?;

    assert!(matches!(outcome, RunOutcome::Translated { segments: 3, .. }));
    assert_eq!(mock.batch_sizes(), vec![2, 1]);

    let bytes = std::fs::read(temp_dir.path().join("cours_EN.pptx"))?;
    let slide = common::read_entry(&bytes, "ppt/slides/slide1.xml").unwrap();
    assert!(slide.contains("<a:t>[EN-GB] trois</a:t>"));
    Ok(())
}

#[tokio::test]
async fn test_run_withMissingInput_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let controller = Controller::with_translator(Config::default(), Arc::new(MockTranslator::working())).unwrap();

    let result = controller
        .run(temp_dir.path().join("absent.pptx"), temp_dir.path().to_path_buf(), false)
        .await;

    let error = result.unwrap_err();
    assert!(matches!(error.downcast_ref::<AppError>(), Some(AppError::File(_))));
}

#[test]
fn test_withTranslator_withBatchAboveRequestLimit_shouldFail() {
    let mut config = Config::default();
    config.translation.batch_size = 46;
    assert!(matches!(
        Controller::with_translator(config.clone(), Arc::new(MockTranslator::working())),
        Err(AppError::Configuration(_))
    ));

    config.translation.batch_size = 45;
    assert!(Controller::with_translator(config, Arc::new(MockTranslator::working())).is_ok());
}

#[test]
fn test_configFile_withOversizedBatch_shouldBeRejected() -> Result<()> {
    let mut config: Config = serde_json::from_str(r#"{"translation": {"batch_size": 50}}"#)?;
    assert!(Controller::with_translator(config.clone(), Arc::new(MockTranslator::working())).is_err());

    config.translation.deepl.api_key = "test-key:fx".to_string();
    assert!(matches!(Controller::with_config(config), Err(AppError::Configuration(_))));
    Ok(())
}

#[tokio::test]
async fn test_run_withFiftyRuns_shouldNeverExceedRequestLimit() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let words: Vec<String> = (0..50).map(|i| format!("ligne {}", i)).collect();
    let runs: Vec<&str> = words.iter().map(String::as_str).collect();
    let input = common::PptxBuilder::new()
        .slide(vec![common::text_shape(&[runs.as_slice()])])
        .write_to(temp_dir.path(), "long.pptx")?;
    let mock = Arc::new(MockTranslator::working());
    let controller = Controller::with_translator(common::test_config(), mock.clone())?;

    controller.run(input, temp_dir.path().to_path_buf(), false).await?;

    assert_eq!(mock.batch_sizes(), vec![45, 5]);
    Ok(())
}
