use std::fs;

use slingshot::core::config::config::GameConfig;

#[test]
fn shipped_config_parses_and_validates() {
    let cfg = GameConfig::load_from_file("assets/config/game.ron").expect("shipped config parses");
    let warnings = cfg.validate();
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    assert!(cfg.launch.launch_duration > 0.0);
    assert!(cfg.launch.respawn_time > 0.0);
    assert_eq!(cfg.launch.ball_destruction_delay, 2.0);
}

#[test]
fn local_layer_overrides_launch_timings_only() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let local = dir.path().join("game.local.ron");
    fs::write(&local, "(launch: (respawn_time: 5.0))").expect("write local layer");
    let (cfg, used, errors) =
        GameConfig::load_layered([std::path::Path::new("assets/config/game.ron"), local.as_path()]);
    assert!(errors.is_empty(), "{errors:?}");
    assert_eq!(used.len(), 2);
    let base = GameConfig::load_from_file("assets/config/game.ron").unwrap();
    assert_eq!(cfg.launch.respawn_time, 5.0);
    assert_eq!(cfg.launch.launch_duration, base.launch.launch_duration);
    assert_eq!(cfg.pivot, base.pivot);
    assert_eq!(cfg.tether, base.tether);
}

#[test]
fn mistyped_value_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("odd.ron");
    fs::write(&path, "(launch: (launch_duration: \"soon\"))").expect("write");
    let (cfg, used, errors) = GameConfig::load_layered([&path]);
    assert_eq!(used.len(), 1);
    assert!(
        errors.iter().any(|e| e.contains("using defaults")),
        "expected deserialize failure, got {errors:?}"
    );
    assert_eq!(cfg, GameConfig::default());
}
