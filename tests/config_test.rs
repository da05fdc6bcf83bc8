// Engine configuration loaded from YAML files

use score_store::models::{Clef, TimeSignature};
use score_store::store::{actions, Engine};
use score_store::{ConfigError, EngineConfig};
use std::fs;

#[test]
fn test_engine_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("score-store.yaml");
    fs::write(
        &path,
        "initial_bar_count: 4\ndefault_signature:\n  ts: [3, 4]\n  ks: -3\n  clef: f\nundo_limit: 2\n",
    )
    .unwrap();

    let engine = Engine::new(EngineConfig::load(&path).unwrap());
    let state = engine.initial_state();
    assert_eq!(state.song.bar_count(), 4);
    let first = state.song.global.signatures.first();
    assert_eq!(first.ts, TimeSignature::new(3, 4));
    assert_eq!(first.ks, -3);
    assert_eq!(first.clef, Clef::Bass);

    // RESET goes back to the configured document, not the built-in default
    let grow = actions::set_bar_count(&state, 7).unwrap();
    let state = engine.apply(state, grow);
    let state = engine.apply(state, actions::reset());
    assert_eq!(state.song.bar_count(), 4);
}

#[test]
fn test_invalid_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    fs::write(&path, "default_signature:\n  ts: [0, 4]\n  ks: 0\n  clef: g\n").unwrap();
    assert!(matches!(EngineConfig::load(&path), Err(ConfigError::Invalid(_))));

    fs::write(&path, "initial_bar_count: [oops").unwrap();
    assert!(matches!(EngineConfig::load(&path), Err(ConfigError::Parse(_))));
}
