use std::io::Write;
use std::time::Duration;

use rawget::config::{CONFIG_ENV, Config, TIMEOUT_ENV, USER_AGENT_ENV};

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert!(cfg.user_agent.starts_with("rawget/"));
    assert_eq!(cfg.receive_timeout(), Duration::from_secs(5));
    assert_eq!(cfg.connect_timeout(), Duration::from_secs(30));
    assert_eq!(cfg.max_header_bytes, 64 * 1024);
}

#[test]
fn test_config_partial_yaml_keeps_defaults() {
    let cfg = Config::from_yaml_str("user_agent: custom/1.0\nreceive_timeout_secs: 9\n").unwrap();

    assert_eq!(cfg.user_agent, "custom/1.0");
    assert_eq!(cfg.receive_timeout_secs, 9);
    assert_eq!(cfg.connect_timeout_secs, Config::default().connect_timeout_secs);
    assert_eq!(cfg.max_header_bytes, Config::default().max_header_bytes);
}

#[test]
fn test_config_invalid_yaml() {
    assert!(Config::from_yaml_str("receive_timeout_secs: soon\n").is_err());
    assert!(Config::from_yaml_str("[1, 2").is_err());
}

// Environment variables are process-wide, so every case that touches them
// runs inside this one test.
#[test]
fn test_config_load_from_file_and_env() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "user_agent: from-file\nconnect_timeout_secs: 3").unwrap();

    unsafe {
        std::env::remove_var(USER_AGENT_ENV);
        std::env::remove_var(TIMEOUT_ENV);
        std::env::remove_var(CONFIG_ENV);
    }
    assert_eq!(Config::load().unwrap(), Config::default());

    unsafe {
        std::env::set_var(CONFIG_ENV, file.path());
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.user_agent, "from-file");
    assert_eq!(cfg.connect_timeout_secs, 3);

    unsafe {
        std::env::set_var(USER_AGENT_ENV, "from-env");
        std::env::set_var(TIMEOUT_ENV, "12");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.user_agent, "from-env");
    assert_eq!(cfg.receive_timeout_secs, 12);
    assert_eq!(cfg.connect_timeout_secs, 3);

    unsafe {
        std::env::set_var(TIMEOUT_ENV, "later");
    }
    let err = Config::load().unwrap_err();
    assert!(format!("{err:#}").contains(TIMEOUT_ENV));

    unsafe {
        std::env::remove_var(TIMEOUT_ENV);
        std::env::set_var(CONFIG_ENV, "/nonexistent/rawget.yaml");
    }
    assert!(Config::load().is_err());

    unsafe {
        std::env::remove_var(USER_AGENT_ENV);
        std::env::remove_var(CONFIG_ENV);
    }
}
