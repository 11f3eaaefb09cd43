use std::fs;
use std::path::PathBuf;

use crm_cli::config::Settings;
use crm_import::BatchSize;

#[test]
fn empty_file_gives_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "").expect("write config");

    let settings = Settings::load(Some(&path)).expect("load");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.api.timeout_secs, 30);
    let options = settings.import_options().expect("options");
    assert_eq!(options.batch_size, BatchSize::FINE_GRAINED);
    assert!(options.register_custom_fields);
}

#[test]
fn reads_api_and_import_sections() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[api]
base_url = "https://crm.example.com/api"
timeout_secs = 5

[import]
batch_size = 2500
register_custom_fields = false
profile_dir = "/srv/crm/profiles"
"#,
    )
    .expect("write config");

    let settings = Settings::load(Some(&path)).expect("load");
    assert_eq!(
        settings.api.base_url.as_deref(),
        Some("https://crm.example.com/api")
    );
    assert_eq!(settings.timeout().as_secs(), 5);
    assert_eq!(settings.profile_dir(), PathBuf::from("/srv/crm/profiles"));
    let options = settings.import_options().expect("options");
    assert_eq!(options.batch_size, BatchSize::BULK);
    assert!(!options.register_custom_fields);
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let error = Settings::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
    assert!(error.to_string().contains("Config file not found"));
}

#[test]
fn malformed_file_names_the_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "[import]\nbatch_size = \"many\"\n").expect("write config");
    let error = Settings::load(Some(&path)).unwrap_err();
    assert!(error.to_string().contains("config.toml"));
}

#[test]
fn zero_batch_size_is_rejected() {
    let mut settings = Settings::default();
    settings.import.batch_size = 0;
    assert!(settings.import_options().is_err());
}
