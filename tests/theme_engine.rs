//! Theme Engine Integration Tests
//!
//! End-to-end tests for the adaptive appearance engine: persisted preference,
//! system appearance tracking, foreground re-polling, and mode changes, wired
//! together the way the app shell wires them.

use std::sync::Arc;
use std::time::Duration;

use app_platform::{
    AppLifecycleState, ManualAppearanceSource, ManualLifecycleSource, SystemAppearance,
};
use app_state::{Lifecycle, ThemeStore, ThemeStoreConfig, TransitionOutcome};
use app_ui::{with_opacity, ModePresentation, DARK_TOKENS, LIGHT_TOKENS};
use storage::{DurableStorage, KvConfig, KvStore, ThemeMode, THEME_MODE_KEY};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct Shell {
    store: ThemeStore,
    appearance: Arc<ManualAppearanceSource>,
    lifecycle: Arc<ManualLifecycleSource>,
}

fn open_kv(dir: &TempDir) -> Arc<KvStore> {
    let path = dir.path().join("prefs.db");
    Arc::new(KvStore::new(KvConfig::new(path.to_string_lossy())).unwrap())
}

async fn launch(storage: Arc<dyn DurableStorage>, system: SystemAppearance) -> Shell {
    let appearance = Arc::new(ManualAppearanceSource::new(system));
    let lifecycle = Arc::new(ManualLifecycleSource::new(AppLifecycleState::Active));
    let store = ThemeStore::new(
        ThemeStoreConfig::default(),
        storage,
        appearance.clone(),
        lifecycle.clone(),
    );
    store.init().await;
    assert_eq!(store.lifecycle(), Lifecycle::Ready);
    Shell { store, appearance, lifecycle }
}

/// Preference survives an app restart on a disk-backed store
#[tokio::test]
async fn test_preference_survives_restart() {
    init_tracing();
    let dir = TempDir::new().unwrap();

    // Phase 1: first launch follows the system, user picks Light
    {
        let shell = launch(open_kv(&dir), SystemAppearance::Dark).await;
        let snapshot = shell.store.snapshot().unwrap();
        assert_eq!(snapshot.mode, ThemeMode::FollowSystem);
        assert!(snapshot.is_dark);

        let outcome = shell.store.set_mode(ThemeMode::Light).await;
        assert_eq!(outcome, TransitionOutcome::Applied(ThemeMode::Light));
        shell.store.dispose();
    }

    // Phase 2: relaunch with the system still dark
    {
        let kv = open_kv(&dir);
        let raw = DurableStorage::get(kv.as_ref(), THEME_MODE_KEY).await.unwrap();
        assert_eq!(raw.as_deref(), Some("light"));

        let shell = launch(kv, SystemAppearance::Dark).await;
        let snapshot = shell.store.snapshot().unwrap();
        assert_eq!(snapshot.mode, ThemeMode::Light);
        assert!(!snapshot.is_dark);
        assert_eq!(snapshot.tokens, &LIGHT_TOKENS);
    }
}

/// A full session: system changes, background, resume, and user toggles
#[tokio::test(start_paused = true)]
async fn test_follow_system_session() {
    init_tracing();
    let kv = Arc::new(KvStore::in_memory().unwrap());
    let shell = launch(kv.clone(), SystemAppearance::Light).await;
    let mut rx = shell.store.subscribe();
    assert!(!rx.borrow_and_update().unwrap().is_dark);

    // Live change while in the foreground
    shell.appearance.set(SystemAppearance::Dark);
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().unwrap().tokens, &DARK_TOKENS);

    // Change delivered nowhere while suspended, picked up on resume
    shell.lifecycle.background();
    shell.appearance.set_silently(SystemAppearance::Light);
    assert!(shell.store.snapshot().unwrap().is_dark);
    shell.lifecycle.foreground();
    assert!(!shell.store.snapshot().unwrap().is_dark);

    // Explicit Dark pins the appearance regardless of the system
    assert_eq!(shell.store.toggle_previous().await, TransitionOutcome::Applied(ThemeMode::Dark));
    shell.appearance.set(SystemAppearance::Light);
    assert!(shell.store.snapshot().unwrap().is_dark);

    let raw = DurableStorage::get(kv.as_ref(), THEME_MODE_KEY).await.unwrap();
    assert_eq!(raw.as_deref(), Some("dark"));
}

/// Rapid taps on the toggle only change the mode once per debounce window
#[tokio::test(start_paused = true)]
async fn test_rapid_toggle_taps() {
    init_tracing();
    let kv = Arc::new(KvStore::in_memory().unwrap());
    let shell = launch(kv, SystemAppearance::Light).await;

    let mut applied = 0;
    for _ in 0..5 {
        if shell.store.toggle_next().await.is_applied() {
            applied += 1;
        }
    }
    assert_eq!(applied, 1);
    assert_eq!(shell.store.snapshot().unwrap().mode, ThemeMode::Light);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(shell.store.can_switch());
    assert_eq!(shell.store.toggle_next().await, TransitionOutcome::Applied(ThemeMode::Dark));
}

/// Settings screen data reflects the live appearance
#[tokio::test]
async fn test_settings_screen_status() {
    init_tracing();
    let kv = Arc::new(KvStore::in_memory().unwrap());
    let shell = launch(kv, SystemAppearance::Light).await;

    let status = shell.store.status().unwrap();
    assert_eq!(status.status_description, "Follow system (currently light)");

    shell.appearance.set(SystemAppearance::Dark);
    let status = shell.store.status().unwrap();
    assert_eq!(status.status_description, "Follow system (currently dark)");
    assert_eq!(status.icon, ThemeMode::FollowSystem.icon());

    let modes = shell.store.available_modes();
    let names: Vec<_> = modes.iter().map(|m| m.display_name).collect();
    assert_eq!(names, vec!["Light", "Dark", "Follow system"]);

    let tokens = shell.store.snapshot().unwrap().tokens;
    assert_eq!(with_opacity(tokens.colors.primary, 0.5), "rgba(138, 122, 107, 0.5)");
}

/// Disposed stores stop reacting and release their platform listeners
#[tokio::test]
async fn test_dispose_on_shutdown() {
    init_tracing();
    let kv = Arc::new(KvStore::in_memory().unwrap());
    let shell = launch(kv, SystemAppearance::Light).await;
    assert_eq!(shell.appearance.listener_count(), 1);
    assert_eq!(shell.lifecycle.listener_count(), 1);

    shell.store.dispose();
    assert_eq!(shell.appearance.listener_count(), 0);
    assert_eq!(shell.lifecycle.listener_count(), 0);
    assert_eq!(shell.store.set_mode(ThemeMode::Dark).await, TransitionOutcome::NotReady);
}
