use serial_test::serial;
use temp_env::with_vars;

use super::*;

fn cleanup_all_monitor_env_vars() {
    for (key, _) in std::env::vars() {
        if key.starts_with("MONITOR__") || key == CONFIG_PATH_ENV {
            std::env::remove_var(&key);
        }
    }
}

#[test]
#[serial]
fn default_config_should_initialize_with_hardcoded_values() {
    let config = MonitorConfig::default();

    assert_eq!(config.callback_buffer_len, 8192);
    assert_eq!(config.channel_buffer_len, 16);
    assert_eq!(config.initial_client_handle, 100);
    assert_eq!(config.timestamps_to_return, TimestampsToReturn::Both);
    assert_eq!(config.subscription.publishing_interval_ms, 100);
    assert_eq!(config.subscription.lifetime_count, 10_000);
    assert_eq!(config.subscription.max_keep_alive_count, 3_000);
    assert_eq!(config.monitored_item.queue_size, 10);
    assert!(config.monitored_item.discard_oldest);
    assert!(config.clone().validate().is_ok());
}

#[test]
#[serial]
fn new_should_merge_environment_overrides() {
    cleanup_all_monitor_env_vars();
    with_vars(
        vec![
            ("MONITOR__CALLBACK_BUFFER_LEN", Some("1024")),
            ("MONITOR__SUBSCRIPTION__PRIORITY", Some("7")),
        ],
        || {
            let config = MonitorConfig::new().unwrap();

            assert_eq!(config.callback_buffer_len, 1024);
            assert_eq!(config.subscription.priority, 7);
            assert_eq!(config.channel_buffer_len, 16);
        },
    );
}

#[test]
#[serial]
fn new_should_load_file_named_by_config_path() {
    cleanup_all_monitor_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("monitor.toml");
    std::fs::write(
        &config_path,
        r#"
        channel_buffer_len = 64
        timestamps_to_return = "source"

        [monitored_item]
        queue_size = 1
        "#,
    )
    .unwrap();

    with_vars(
        vec![(CONFIG_PATH_ENV, Some(config_path.to_str().unwrap()))],
        || {
            let config = MonitorConfig::new().unwrap();

            assert_eq!(config.channel_buffer_len, 64);
            assert_eq!(config.timestamps_to_return, TimestampsToReturn::Source);
            assert_eq!(config.monitored_item.queue_size, 1);
            assert!(config.monitored_item.discard_oldest);
        },
    );
}

#[test]
#[serial]
fn with_override_config_should_merge_file_settings() {
    cleanup_all_monitor_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("override.toml");
    std::fs::write(
        &config_path,
        r#"
        initial_client_handle = 1000 # Override default value

        [subscription]
        publishing_interval_ms = 500
        "#,
    )
    .unwrap();

    let empty_vars: Vec<(&str, Option<&str>)> = vec![];
    with_vars(empty_vars, || {
        let base_config = MonitorConfig::new().expect("success");
        let config = base_config
            .with_override_config(config_path.to_str().unwrap())
            .expect("override should load");

        assert_eq!(config.initial_client_handle, 1000);
        assert_eq!(config.subscription.publishing_interval_ms, 500);
        assert_eq!(config.subscription.lifetime_count, 10_000);
    });
}

#[test]
fn validation_should_reject_zero_buffers() {
    let mut config = MonitorConfig::default();
    config.callback_buffer_len = 0;
    assert!(config.validate().is_err());

    let mut config = MonitorConfig::default();
    config.channel_buffer_len = 0;
    assert!(config.validate().is_err());

    let mut config = MonitorConfig::default();
    config.request_timeout_ms = 0;
    assert!(config.validate().is_err());
}

#[test]
fn validation_should_enforce_keep_alive_lifetime_ratio() {
    let mut config = MonitorConfig::default();
    config.subscription.max_keep_alive_count = 10;
    config.subscription.lifetime_count = 29;
    assert!(matches!(config.clone().validate(), Err(Error::Config(_))));

    config.subscription.lifetime_count = 30;
    assert!(config.validate().is_ok());
}

#[test]
fn validation_should_reject_negative_sampling_interval() {
    let mut config = MonitorConfig::default();
    config.monitored_item.sampling_interval_ms = -1.0;
    assert!(config.validate().is_err());
}

#[test]
fn monitored_item_defaults_map_to_parameters() {
    let params = MonitoredItemDefaults::default().parameters();

    assert_eq!(params.sampling_interval, 0.0);
    assert_eq!(params.queue_size, 10);
    assert!(params.discard_oldest);
}
