/*!
 * Tests for application configuration functionality
 */

use yadt::app_config::{Config, DeepLConfig, DeepLTier, LogLevel, TargetVariant, MAX_BATCH_SIZE};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "fr");
    assert_eq!(config.target_variant, TargetVariant::EnUs);
    assert!(config.include_notes);
    assert_eq!(config.translation.batch_size, 45);
    assert_eq!(config.translation.timeout_secs, 60);
    assert_eq!(config.conversion.command, "soffice");
    assert_eq!(config.conversion.timeout_secs, 120);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = common::test_config();
    assert!(config.validate().is_ok());

    config.source_language = "xyz".to_string();
    assert!(config.validate().is_err());

    config = common::test_config();
    config.translation.batch_size = 0;
    assert!(config.validate().is_err());

    config.translation.batch_size = MAX_BATCH_SIZE + 1;
    assert!(config.validate().is_err());

    config.translation.batch_size = MAX_BATCH_SIZE;
    assert!(config.validate().is_ok());

    config.translation.deepl.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withoutApiKey_shouldMentionEnvironmentVariable() {
    let config = Config::default();
    let error = config.validate().unwrap_err();

    assert!(error.to_string().contains("DEEPL_API_KEY"));
    assert!(config.validate_settings().is_ok());
}

#[test]
fn test_deeplConfig_tier_shouldFollowKeySuffix() {
    let free = DeepLConfig { api_key: "abc:fx".to_string(), endpoint: String::new() };
    let pro = DeepLConfig { api_key: "abc".to_string(), endpoint: String::new() };

    assert_eq!(free.tier(), DeepLTier::Free);
    assert_eq!(pro.tier(), DeepLTier::Pro);
    assert_eq!(free.resolve_endpoint(), "https://api-free.deepl.com/v2/translate");
    assert_eq!(pro.resolve_endpoint(), "https://api.deepl.com/v2/translate");
}

#[test]
fn test_deeplConfig_override_shouldWinOverTier() {
    let config = DeepLConfig {
        api_key: "abc:fx".to_string(),
        endpoint: " http://localhost:8080/v2/translate ".to_string(),
    };

    assert_eq!(config.resolve_endpoint(), "http://localhost:8080/v2/translate");
}

#[test]
fn test_targetVariant_parsing_shouldAcceptShortForms() {
    assert_eq!("us".parse::<TargetVariant>().unwrap(), TargetVariant::EnUs);
    assert_eq!("EN-GB".parse::<TargetVariant>().unwrap(), TargetVariant::EnGb);
    assert_eq!("uk".parse::<TargetVariant>().unwrap(), TargetVariant::EnGb);
    assert!("en-au".parse::<TargetVariant>().is_err());
    assert_eq!(TargetVariant::EnGb.deepl_code(), "EN-GB");
}

#[test]
fn test_config_fromPartialJson_shouldFillDefaults() {
    let json = r#"{"target_variant": "en-gb", "translation": {"deepl": {"api_key": "k"}}}"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.target_variant, TargetVariant::EnGb);
    assert_eq!(config.source_language, "fr");
    assert_eq!(config.translation.batch_size, 45);
    assert_eq!(config.translation.deepl.api_key, "k");
    assert!(config.include_notes);
}

#[test]
fn test_config_serialization_shouldRoundTrip() {
    let mut config = common::test_config();
    config.include_notes = false;
    config.target_variant = TargetVariant::EnGb;

    let json = serde_json::to_string_pretty(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();

    assert!(!parsed.include_notes);
    assert_eq!(parsed.target_variant, TargetVariant::EnGb);
    assert!(json.contains("\"en-gb\""));
}
