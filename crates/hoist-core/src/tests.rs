use super::*;

#[test]
fn infer_tar_gz_before_plain_gz() {
    assert_eq!(
        ArtifactKind::infer_from_filename("build.tar.gz"),
        ArtifactKind::TarGz
    );
    assert_eq!(
        ArtifactKind::infer_from_filename("app.gz"),
        ArtifactKind::Gzip
    );
}

#[test]
fn infer_is_case_insensitive() {
    assert_eq!(
        ArtifactKind::infer_from_filename("Build.TAR.GZ"),
        ArtifactKind::TarGz
    );
    assert_eq!(
        ArtifactKind::infer_from_filename("Bundle.ZIP"),
        ArtifactKind::Zip
    );
    assert_eq!(ArtifactKind::infer_from_filename("APP.GZ"), ArtifactKind::Gzip);
}

#[test]
fn infer_falls_back_to_raw() {
    assert_eq!(ArtifactKind::infer_from_filename("app"), ArtifactKind::Raw);
    assert_eq!(
        ArtifactKind::infer_from_filename("app.bin"),
        ArtifactKind::Raw
    );
    assert_eq!(
        ArtifactKind::infer_from_filename("release.tgz"),
        ArtifactKind::Raw
    );
    assert_eq!(
        ArtifactKind::infer_from_filename("notes.txt"),
        ArtifactKind::Raw
    );
}

#[test]
fn gzip_output_name_strips_suffix() {
    assert_eq!(gzip_output_name("app.gz"), "app");
    assert_eq!(gzip_output_name("tool.GZ"), "tool");
    assert_eq!(gzip_output_name("plain"), "plain");
}

#[test]
fn parse_mode_valid_octal() {
    assert_eq!(parse_mode("0755"), 0o755);
    assert_eq!(parse_mode("644"), 0o644);
    assert_eq!(parse_mode(" 0700 "), 0o700);
}

#[test]
fn parse_mode_malformed_falls_back() {
    assert_eq!(parse_mode("bad"), FALLBACK_MODE);
    assert_eq!(parse_mode(""), FALLBACK_MODE);
    assert_eq!(parse_mode("0999"), FALLBACK_MODE);
}

#[test]
fn parse_mode_out_of_range_falls_back() {
    assert_eq!(parse_mode("17777"), FALLBACK_MODE);
}

#[test]
fn mode_set_resolves_all_three_classes() {
    let mut config = UpgradeConfig::default();
    config.dir_permission = "0750".to_string();
    config.file_permission = "0640".to_string();
    config.exec_permission = "junk".to_string();

    let modes = config.mode_set();
    assert_eq!(modes.dir, 0o750);
    assert_eq!(modes.file, 0o640);
    assert_eq!(modes.exec, FALLBACK_MODE);
}

#[test]
fn config_json_round_trip() {
    let config = UpgradeConfig::default();
    let rendered = config.to_json_string().expect("must serialize");
    let parsed = UpgradeConfig::from_json_str(&rendered).expect("must parse");
    assert_eq!(parsed, config);
}

#[test]
fn config_partial_json_fills_defaults() {
    let parsed =
        UpgradeConfig::from_json_str(r#"{"target_dir": "/srv/app", "enable_service": false}"#)
            .expect("must parse");
    assert_eq!(parsed.target_dir, "/srv/app");
    assert!(!parsed.enable_service);
    assert_eq!(parsed.port, 8080);
    assert_eq!(parsed.service_name, "myapp");
}

#[test]
fn config_rejects_invalid_json() {
    assert!(UpgradeConfig::from_json_str("{not json").is_err());
}

#[test]
fn max_file_size_converts_to_bytes() {
    let mut config = UpgradeConfig::default();
    config.max_file_size_mb = 2;
    assert_eq!(config.max_file_size_bytes(), 2 * 1024 * 1024);
}

#[test]
fn load_or_init_writes_defaults_for_missing_file() {
    let dir = std::env::temp_dir().join(format!(
        "hoist-core-tests-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("system time")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("must create test dir");
    let path = dir.join("config.json");

    let config = UpgradeConfig::load_or_init(&path).expect("must load defaults");
    assert_eq!(config, UpgradeConfig::default());
    assert!(path.exists(), "default config file must be written");

    let reloaded = UpgradeConfig::load_or_init(&path).expect("must reload");
    assert_eq!(reloaded, config);

    let _ = std::fs::remove_dir_all(&dir);
}
