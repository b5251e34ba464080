use nordplug::config::{Config, SecretStore, Settings, YamlSecretStore};
use nordplug::pricing::{CurrencyUnit, EnergyUnit};
use std::collections::HashMap;
use std::fs;

#[test]
fn full_settings_file_is_loaded() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("settings.yaml");
    let log_dir = tmp_dir.path().to_string_lossy().to_string();
    fs::write(
        &path,
        format!(
            "timezone: Europe/Tallinn\n\
             pricing:\n  api_url: http://prices.local/api\n  energy_unit: mega\n  currency_unit: base\n  timeout_secs: 4\n\
             cloud:\n  base_url: http://bridge.local\n  timeout_secs: 6\n\
             logging:\n  level: DEBUG\n  json_format: true\n  console_output: false\n  file: {}\n  backup_count: 2\n",
            log_dir
        ),
    )
    .unwrap();

    let loaded = Settings::from_file(&path).unwrap();

    let mut expected = Settings::default();
    expected.timezone = Some("Europe/Tallinn".to_string());
    expected.pricing.api_url = "http://prices.local/api".to_string();
    expected.pricing.energy_unit = EnergyUnit::Mega;
    expected.pricing.currency_unit = CurrencyUnit::Base;
    expected.pricing.timeout_secs = 4;
    expected.cloud.base_url = "http://bridge.local".to_string();
    expected.cloud.timeout_secs = 6;
    expected.logging.level = "DEBUG".to_string();
    expected.logging.json_format = true;
    expected.logging.console_output = false;
    expected.logging.file = Some(log_dir);
    expected.logging.backup_count = 2;
    assert_eq!(loaded, expected);
    assert!(loaded.validate().is_ok());
}

#[test]
fn partial_settings_file_uses_defaults() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    fs::write(tmp.path(), "pricing:\n  energy_unit: mega\n").unwrap();

    let loaded = Settings::from_file(tmp.path()).unwrap();
    assert_eq!(loaded.pricing.energy_unit, EnergyUnit::Mega);
    assert_eq!(loaded.pricing.currency_unit, CurrencyUnit::Cents);
    assert_eq!(loaded.logging.level, "INFO");
}

#[test]
fn settings_file_is_picked_up_from_env() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    fs::write(
        tmp.path(),
        "timezone: Europe/Helsinki\ncloud:\n  base_url: http://bridge.local:9000\n",
    )
    .unwrap();

    let env: HashMap<String, String> = HashMap::from([
        (
            "NORDPLUG_SETTINGS".to_string(),
            tmp.path().to_string_lossy().to_string(),
        ),
        ("PRICE_API_URL".to_string(), "http://prices.local/api".to_string()),
    ]);
    let settings = Settings::load(&env).unwrap();
    assert_eq!(settings.timezone.as_deref(), Some("Europe/Helsinki"));
    assert_eq!(settings.cloud.base_url, "http://bridge.local:9000");
    assert_eq!(settings.pricing.api_url, "http://prices.local/api");
}

#[test]
fn from_file_with_invalid_yaml_fails() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    fs::write(tmp.path(), b"pricing: [unclosed").unwrap();
    let err = Settings::from_file(tmp.path()).unwrap_err();
    assert!(format!("{}", err).contains("Serialization error"));
}

#[test]
fn settings_validation_errors() {
    let mut settings = Settings::default();
    settings.pricing.api_url.clear();
    assert!(settings.validate().is_err());

    settings = Settings::default();
    settings.cloud.base_url = "  ".into();
    assert!(settings.validate().is_err());

    settings = Settings::default();
    settings.cloud.timeout_secs = 0;
    assert!(settings.validate().is_err());

    settings = Settings::default();
    settings.parameters.password.clear();
    assert!(settings.validate().is_err());
}

#[test]
fn yaml_secret_store_feeds_config() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    fs::write(
        tmp.path(),
        "NordPoolLightsMiAccountUsername: user@example.com\nNordPoolLightsMiAccountPassword: \"-\"\n",
    )
    .unwrap();
    let store = YamlSecretStore::from_file(tmp.path()).unwrap();
    assert!(store.describe().contains("secrets file"));

    let env: HashMap<String, String> = [
        ("MI_DEVICE_ID", "1"),
        ("VAT_PERCENTAGE", "22"),
        ("COUNTRY", "fi"),
        ("PRICE_THRESHOLD", "8"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    // Password holds the placeholder, so it reads as unset
    let err = Config::from_sources(&env, &store, Settings::default()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Password not set"), "{msg}");
    assert!(msg.contains("NordPoolLightsMiAccountPassword"), "{msg}");
}
