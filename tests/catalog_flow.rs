use chronoreel_core::pipeline::catalog::load_catalog;
use chronoreel_core::pipeline::run::plan_decisions;
use chronoreel_core::pipeline::{DecisionKind, Theme};
use chronoreel_core::studio::scanner::{scan_inventory, write_inventory};
use std::fs;
use std::path::PathBuf;

#[test]
fn test_scan_then_plan_decisions() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("archive");
    fs::create_dir_all(archive.join("1926-12-09_founding")).unwrap();
    fs::create_dir_all(archive.join("2001-01-01_millennium")).unwrap();
    fs::write(archive.join("1926-12-09_founding/gate.jpg"), b"x").unwrap();
    fs::write(archive.join("2001-01-01_millennium/lab.jpg"), b"x").unwrap();

    let inventory = dir.path().join("available_assets.json");
    write_inventory(&scan_inventory(&archive).unwrap(), &inventory).unwrap();

    let plan = dir.path().join("video_plan.json");
    fs::write(
        &plan,
        r#"{"segments": [
            {"id": 1, "narration": "In 1926, in the land of black gold...", "image_prompt": "colonial gate"},
            {"id": 2, "narration": "In 2016 it became an IIT.", "image_prompt": "campus aerial"},
            {"id": 3, "narration": "The centenary in 2026 glows red.", "image_prompt": "fireworks"}
        ]}"#,
    )
    .unwrap();

    let (segments, pool) = load_catalog(&plan, &inventory).unwrap();
    assert_eq!(segments.len(), 3);
    assert_eq!(pool.len(), 2);

    let decisions = plan_decisions(&segments, &pool);

    assert_eq!(decisions[0].kind(), DecisionKind::ReuseReal);
    assert_eq!(
        decisions[0].source_path().map(|p| p.to_path_buf()),
        Some(archive.join("1926-12-09_founding/gate.jpg"))
    );
    // 2001 is exactly 15 years from 2016: outside the window.
    assert_eq!(decisions[1].kind(), DecisionKind::SynthesizeAi);
    assert_eq!(decisions[1].style(), Some(Theme::Photorealistic));
    assert_eq!(decisions[2].style(), Some(Theme::GlowingRedCelebration));
}

#[test]
fn test_missing_inventory_yields_all_synthetic() {
    let dir = tempfile::tempdir().unwrap();
    let plan = dir.path().join("video_plan.json");
    fs::write(
        &plan,
        r#"{"segments": [{"id": 9, "narration": "1957", "image_prompt": "hall"}]}"#,
    )
    .unwrap();

    let (segments, pool) = load_catalog(&plan, &PathBuf::from("__no_such_inventory.json")).unwrap();
    assert!(pool.is_empty());

    let decisions = plan_decisions(&segments, &pool);
    assert_eq!(decisions[0].style(), Some(Theme::VintageMonochrome));
}
