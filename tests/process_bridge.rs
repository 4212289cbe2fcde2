//! Talk to a real `the-circle serve` child through `ProcessBridge`.

use std::path::Path;

use the_circle_lib::bridge::{Bridge, ProcessBridge, Request};
use the_circle_lib::config::store::STORAGE_PATH_ENV;
use the_circle_lib::config::{ConfigPatch, StorageData, Theme};

#[tokio::test]
async fn serve_host_answers_over_pipes() {
    let dir = tempfile::tempdir().unwrap();
    let storage = dir.path().join("storage.json");
    let storage = storage.to_str().unwrap();

    let bridge = ProcessBridge::spawn(
        Path::new(env!("CARGO_BIN_EXE_the-circle")),
        &["serve"],
        &[(STORAGE_PATH_ENV, storage), ("RUST_LOG", "off")],
    )
    .unwrap();

    let defaults = bridge.send(Request::GetStorage).await.unwrap();
    assert_eq!(defaults.data, Some(StorageData::default()));

    let saved = bridge
        .send(Request::SaveConfig(ConfigPatch::theme(Theme::Dark)))
        .await
        .unwrap();
    assert!(saved.success);
    assert_eq!(saved.data.unwrap().config.theme, Theme::Dark);

    // No tab manager on a desktop host.
    let tabs = bridge.send(Request::GetTabs).await.unwrap();
    assert!(!tabs.success);

    bridge.shutdown().await;
    assert!(Path::new(storage).exists());
}
