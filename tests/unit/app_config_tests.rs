/*!
 * Tests for application configuration functionality
 */

use tabtrans::app_config::{BackendKind, Config, LogLevel, TranslationCommonConfig, TranslationConfig};

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    // Test default values
    assert_eq!(config.target_language, "French");
    assert_eq!(config.translation.model, "gemini-2.5-flash");
    assert_eq!(config.translation.api_key, "");
    assert_eq!(config.translation.endpoint, "");
    assert_eq!(config.log_level, LogLevel::Info);

    // Test common config values
    assert_eq!(config.translation.common.batch_size, 50);
    assert_eq!(config.translation.common.inter_chunk_delay_secs, 1.0);
    assert_eq!(config.translation.common.timeout_secs, 60);
}

/// Test that common configuration provides reasonable default values
#[test]
fn test_commonConfigDefaults_shouldProvideReasonableValues() {
    let common_config = TranslationCommonConfig::default();

    assert!(common_config.batch_size > 0);
    assert!(common_config.inter_chunk_delay_secs >= 0.0);
    assert!(common_config.temperature >= 0.0 && common_config.temperature <= 1.0);
    assert!(common_config.system_prompt.contains("{target_language}"));
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    // Default config has no API key, so validation fails
    let mut config = Config::default();
    assert!(config.validate().is_err());

    // With an API key set the default is valid
    config.translation.api_key = "test-api-key".to_string();
    assert!(config.validate().is_ok());

    // Empty target language
    config.target_language = "".to_string();
    assert!(config.validate().is_err());
    config.target_language = "French".to_string();

    // Unknown model selection
    config.translation.model = "gpt-4".to_string();
    assert!(config.validate().is_err());
    config.translation.model = "deepseek-chat".to_string();
    assert!(config.validate().is_ok());

    // Zero batch size
    config.translation.common.batch_size = 0;
    assert!(config.validate().is_err());
    config.translation.common.batch_size = 50;

    // Negative or non-finite delay
    config.translation.common.inter_chunk_delay_secs = -1.0;
    assert!(config.validate().is_err());
    config.translation.common.inter_chunk_delay_secs = f64::NAN;
    assert!(config.validate().is_err());
    config.translation.common.inter_chunk_delay_secs = 0.0;
    assert!(config.validate().is_ok());
}

/// Test backend family detection from display model names
#[test]
fn test_backendKind_detect_withKnownFamilies_shouldMatchSubstrings() {
    // Exact wire names
    assert_eq!(BackendKind::detect("deepseek-chat"), Some(BackendKind::DeepSeek));
    assert_eq!(BackendKind::detect("gemini-2.5-flash"), Some(BackendKind::Gemini));
    assert_eq!(BackendKind::detect("glm-4.6"), Some(BackendKind::Glm));
    assert_eq!(BackendKind::detect("moonshot-v1-8k"), Some(BackendKind::Kimi));

    // Versioned display names resolve by substring
    assert_eq!(BackendKind::detect("deepseek v3.2"), Some(BackendKind::DeepSeek));
    assert_eq!(BackendKind::detect("gemini 2.0 pro"), Some(BackendKind::Gemini));
    assert_eq!(BackendKind::detect("kimi-k2"), Some(BackendKind::Kimi));
    assert_eq!(BackendKind::detect("zhipu glm-4"), Some(BackendKind::Glm));

    // Case insensitive, whitespace tolerated
    assert_eq!(BackendKind::detect("  DeepSeek-Chat  "), Some(BackendKind::DeepSeek));
    assert_eq!(BackendKind::detect("GEMINI-2.5-FLASH"), Some(BackendKind::Gemini));

    // Unknown names
    assert_eq!(BackendKind::detect("gpt-4"), None);
    assert_eq!(BackendKind::detect("claude-3-haiku"), None);
    assert_eq!(BackendKind::detect(""), None);
}

/// Test wire models and default endpoints per family
#[test]
fn test_backendKind_wireModelAndEndpoint_shouldMatchFamily() {
    assert_eq!(BackendKind::DeepSeek.wire_model(), "deepseek-chat");
    assert_eq!(BackendKind::Gemini.wire_model(), "gemini-2.5-flash");
    assert_eq!(BackendKind::Glm.wire_model(), "glm-4.6");
    assert_eq!(BackendKind::Kimi.wire_model(), "moonshot-v1-8k");

    assert_eq!(BackendKind::DeepSeek.default_endpoint(), "https://api.deepseek.com");
    assert_eq!(
        BackendKind::Gemini.default_endpoint(),
        "https://generativelanguage.googleapis.com/v1beta"
    );
    assert_eq!(BackendKind::Glm.default_endpoint(), "https://open.bigmodel.cn/api/paas/v4");
    assert_eq!(BackendKind::Kimi.default_endpoint(), "https://api.moonshot.cn/v1");

    assert_eq!(BackendKind::DeepSeek.to_string(), "DeepSeek");
    assert_eq!(BackendKind::Glm.to_string(), "GLM");
}

/// Test FromStr parsing of backend families
#[test]
fn test_backendKind_fromStr_shouldParseKnownAndRejectUnknown() {
    let parsed: BackendKind = "Kimi K2".parse().unwrap();
    assert_eq!(parsed, BackendKind::Kimi);

    let unknown = "gpt-4".parse::<BackendKind>();
    assert!(unknown.is_err());
}

/// Test endpoint resolution with and without an override
#[test]
fn test_getEndpoint_withOverride_shouldPreferOverride() {
    let mut config = TranslationConfig::default();
    assert_eq!(config.get_endpoint(), "https://generativelanguage.googleapis.com/v1beta");

    config.endpoint = "https://proxy.example.com/v1beta".to_string();
    assert_eq!(config.get_endpoint(), "https://proxy.example.com/v1beta");

    // Unknown model with no override resolves to nothing
    config.model = "mystery-model".to_string();
    config.endpoint = String::new();
    assert_eq!(config.get_endpoint(), "");
}

/// Test that partial JSON configs are filled with defaults
#[test]
fn test_config_deserialization_withPartialJson_shouldFillDefaults() {
    let json = r#"{
        "translation": {
            "model": "deepseek-chat",
            "api_key": "test-key"
        }
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.target_language, "French");
    assert_eq!(config.translation.model, "deepseek-chat");
    assert_eq!(config.translation.api_key, "test-key");
    assert_eq!(config.translation.common.batch_size, 50);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test config serialization round trip
#[test]
fn test_config_serialization_withDefaultConfig_shouldRoundTrip() {
    let config = Config::default();

    let json = serde_json::to_string_pretty(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.target_language, config.target_language);
    assert_eq!(parsed.translation.model, config.translation.model);
    assert_eq!(parsed.translation.common.batch_size, config.translation.common.batch_size);
    assert_eq!(parsed.log_level, config.log_level);
}

/// Test that log levels serialize as lowercase strings
#[test]
fn test_logLevel_serialization_shouldUseLowercaseNames() {
    assert_eq!(serde_json::to_string(&LogLevel::Warn).unwrap(), "\"warn\"");
    assert_eq!(serde_json::to_string(&LogLevel::Info).unwrap(), "\"info\"");

    let parsed: LogLevel = serde_json::from_str("\"debug\"").unwrap();
    assert_eq!(parsed, LogLevel::Debug);
}
