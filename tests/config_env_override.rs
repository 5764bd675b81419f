use serial_test::serial;
use std::fs;
use tempfile::tempdir;

use holographer::config::CONFIG_ENV;
use holographer::{default_config_path, load_config, ChecksumAlgorithm, LogLevel};

fn write_config(path: &std::path::Path, storage: &std::path::Path) {
    let xml = format!(
        r#"<config>
  <storage_root>{}</storage_root>
  <checksum>blake3</checksum>
  <include_root>true</include_root>
  <log_level>info</log_level>
</config>"#,
        storage.display()
    );
    fs::write(path, xml).unwrap();
}

#[test]
#[serial]
fn env_var_selects_config_file() {
    let td = tempdir().unwrap();
    let cfg_path = td.path().join("custom.xml");
    let storage = td.path().join("store");
    write_config(&cfg_path, &storage);

    unsafe { std::env::set_var(CONFIG_ENV, &cfg_path) };
    let resolved = default_config_path();
    let loaded = load_config(None);
    unsafe { std::env::remove_var(CONFIG_ENV) };

    assert_eq!(resolved.unwrap(), cfg_path);
    let (cfg, source) = loaded.unwrap();
    assert_eq!(source.as_deref(), Some(cfg_path.as_path()));
    assert_eq!(cfg.storage_root, storage);
    assert_eq!(cfg.checksum, ChecksumAlgorithm::Blake3);
    assert!(cfg.include_root);
    assert_eq!(cfg.log_level, LogLevel::Info);
    assert!(!cfg.clobber);
}

#[test]
#[serial]
fn explicit_path_beats_env_var() {
    let td = tempdir().unwrap();
    let env_cfg = td.path().join("env.xml");
    fs::write(&env_cfg, "<config><clobber>true</clobber></config>").unwrap();
    let flag_cfg = td.path().join("flag.xml");
    write_config(&flag_cfg, &td.path().join("store"));

    unsafe { std::env::set_var(CONFIG_ENV, &env_cfg) };
    let loaded = load_config(Some(&flag_cfg));
    unsafe { std::env::remove_var(CONFIG_ENV) };

    let (cfg, source) = loaded.unwrap();
    assert_eq!(source.unwrap(), flag_cfg);
    assert!(!cfg.clobber);
}

#[test]
#[serial]
fn env_var_naming_missing_file_is_an_error() {
    let td = tempdir().unwrap();
    unsafe { std::env::set_var(CONFIG_ENV, td.path().join("missing.xml")) };
    let loaded = load_config(None);
    unsafe { std::env::remove_var(CONFIG_ENV) };
    assert!(loaded.is_err());
}
