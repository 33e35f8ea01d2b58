//! Startup configuration: config file plus command-line overrides.

use std::sync::Arc;

use neogrid::app::App;
use neogrid::cli::RuntimeOptions;
use neogrid_config::Config;
use tempfile::tempdir;

fn runtime() -> Arc<tokio::runtime::Runtime> {
    Arc::new(tokio::runtime::Runtime::new().unwrap())
}

#[test]
fn test_cli_overrides_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    let file = Config {
        font_size: 20.0,
        initial_rows: 40,
        initial_cols: 120,
        ..Config::default()
    };
    file.save_to(&path).unwrap();

    let options = RuntimeOptions {
        config_path: Some(path),
        cols: Some(100),
        no_box_drawing: true,
        ..Default::default()
    };
    let app = App::new(runtime(), options).unwrap();
    let config = app.config();
    assert_eq!(config.font_size, 20.0);
    assert_eq!(config.initial_rows, 40);
    assert_eq!(config.initial_cols, 100);
    assert!(!config.box_drawing);
}

#[test]
fn test_invalid_override_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    Config::default().save_to(&path).unwrap();

    let options = RuntimeOptions {
        config_path: Some(path),
        rows: Some(0),
        ..Default::default()
    };
    assert!(App::new(runtime(), options).is_err());
}

#[test]
fn test_missing_config_file_is_an_error() {
    let dir = tempdir().unwrap();
    let options = RuntimeOptions {
        config_path: Some(dir.path().join("absent.yaml")),
        ..Default::default()
    };
    let err = App::new(runtime(), options).err().unwrap();
    assert!(err.to_string().contains("absent.yaml"));
}
