use dhub_config::{Config, ConfigError, ConfigManager};
use dhub_domain::{DonationCategory, Region};
use tempfile::tempdir;

#[test]
fn default_config_matches_dashboard_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.currency_label, "Rs");
    assert_eq!(cfg.default_category, DonationCategory::Zakat);
    assert_eq!(cfg.default_region, Region::Area5No);
    assert!(cfg.insight_timeout_ms > 0);
}

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().join("hub")).expect("manager");

    assert_eq!(manager.load().expect("load config"), Config::default());
    assert_eq!(
        manager.data_dir(&Config::default()),
        dir.path().join("hub").join("data")
    );
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut cfg = Config::default();
    cfg.set("currency_label", "PKR").unwrap();
    cfg.set("default_region", "J Area").unwrap();
    cfg.set("ui_color_enabled", "off").unwrap();

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded.currency_label, "PKR");
    assert_eq!(loaded.default_region, Region::JArea);
    assert!(!loaded.ui_color_enabled);
}

#[test]
fn partial_files_fill_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    std::fs::write(manager.config_path(), r#"{ "currency_label": "USD" }"#).unwrap();

    let loaded = manager.load().expect("load config");
    assert_eq!(loaded.currency_label, "USD");
    assert_eq!(loaded.insight_timeout_ms, Config::default_insight_timeout_ms());
    assert!(loaded.bilingual_labels);
}

#[test]
fn set_rejects_bad_values() {
    let mut cfg = Config::default();

    assert!(matches!(
        cfg.set("default_category", "Sadaqah"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        cfg.set("insight_timeout_ms", "0"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(matches!(
        cfg.set("colour", "on"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert_eq!(cfg, Config::default());
}
