use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const MANIFEST: &str = r#"{"assets": [
    {"path": "Assets/Prefabs/Hero.prefab", "dependencies": [
        "Assets/Tex/skin.png",
        "Assets/Anim/run.controller",
        "Assets/Mat/hero.mat.unknownext"
    ]},
    {"path": "Assets/Prefabs/Villain.prefab", "dependencies": ["Assets/Tex/other.png"]},
    {"path": "Assets/Levels/Main.unity", "dependencies": ["Assets/Prefabs/Hero.prefab"]},
    {"path": "Packages/Pkg/Thing.prefab", "dependencies": ["Assets/Tex/skin.png"]}
]}"#;

fn write_manifest(dir: &Path) -> PathBuf {
    let path = dir.join("assets.json");
    fs::write(&path, MANIFEST).unwrap();
    path
}

#[allow(deprecated)]
fn autobind() -> Command {
    let mut cmd = Command::cargo_bin("autobind").expect("binary");
    cmd.env_remove("AUTOBIND_SCOPE");
    cmd
}

#[test]
fn deps_buckets_by_kind() {
    let temp = tempdir().unwrap();
    let manifest = write_manifest(temp.path());

    autobind()
        .arg("deps")
        .arg(&manifest)
        .arg("Assets/Prefabs/Hero.prefab")
        .assert()
        .success()
        .stdout(
            "[texture]\n  Assets/Tex/skin.png\n\
             [animator-controller]\n  Assets/Anim/run.controller\n\
             total: 2 assets\n",
        );
}

#[test]
fn deps_json() {
    let temp = tempdir().unwrap();
    let manifest = write_manifest(temp.path());

    let output = autobind()
        .args(["deps", "--json"])
        .arg(&manifest)
        .arg("Assets/Levels/Main.unity")
        .output()
        .expect("command run");
    assert!(output.status.success());

    let body: Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(body["query"], "dependencies_of");
    assert_eq!(body["buckets"]["prefab"][0], "Assets/Prefabs/Hero.prefab");
    assert_eq!(body["buckets"]["texture"][0], "Assets/Tex/skin.png");
}

#[test]
fn deps_of_missing_asset_is_empty() {
    let temp = tempdir().unwrap();
    let manifest = write_manifest(temp.path());

    autobind()
        .arg("deps")
        .arg(&manifest)
        .arg("Assets/Nope.prefab")
        .assert()
        .success()
        .stdout("total: 0 assets\n");
}

#[test]
fn refs_respects_scope() {
    let temp = tempdir().unwrap();
    let manifest = write_manifest(temp.path());

    autobind()
        .arg("refs")
        .arg(&manifest)
        .arg("Assets/Tex/skin.png")
        .assert()
        .success()
        .stdout(
            "[prefab]\n  Assets/Prefabs/Hero.prefab\n\
             [scene]\n  Assets/Levels/Main.unity\n\
             total: 2 assets\n",
        );

    autobind()
        .arg("refs")
        .arg(&manifest)
        .arg("Assets/Tex/skin.png")
        .args(["--scope", "Packages"])
        .assert()
        .success()
        .stdout("[prefab]\n  Packages/Pkg/Thing.prefab\ntotal: 1 assets\n");
}

#[test]
fn refs_scope_from_environment() {
    let temp = tempdir().unwrap();
    let manifest = write_manifest(temp.path());

    autobind()
        .env("AUTOBIND_SCOPE", "Packages")
        .arg("refs")
        .arg(&manifest)
        .arg("Assets/Tex/skin.png")
        .assert()
        .success()
        .stdout(predicate::str::contains("Packages/Pkg/Thing.prefab"))
        .stdout(predicate::str::contains("Hero.prefab").not());
}

#[test]
fn list_prefabs_in_folder() {
    let temp = tempdir().unwrap();
    let manifest = write_manifest(temp.path());

    autobind()
        .arg("list")
        .arg(&manifest)
        .args(["--kind", "prefab", "--folder", "Assets/Prefabs"])
        .assert()
        .success()
        .stdout("Assets/Prefabs/Hero.prefab\nAssets/Prefabs/Villain.prefab\n");
}

#[test]
fn list_rejects_unknown_kind() {
    let temp = tempdir().unwrap();
    let manifest = write_manifest(temp.path());

    autobind()
        .arg("list")
        .arg(&manifest)
        .args(["--kind", "audio"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown asset kind"));
}

#[test]
fn scans_project_folder() {
    let temp = tempdir().unwrap();
    let root = temp.path();
    let tex_guid = "0123456789abcdef0123456789abcdef";
    fs::create_dir_all(root.join("Assets/Tex")).unwrap();
    fs::create_dir_all(root.join("Assets/Prefabs")).unwrap();
    fs::write(root.join("Assets/Tex/skin.png"), "png").unwrap();
    fs::write(
        root.join("Assets/Tex/skin.png.meta"),
        format!("fileFormatVersion: 2\nguid: {tex_guid}\n"),
    )
    .unwrap();
    fs::write(
        root.join("Assets/Prefabs/Hero.prefab"),
        format!("m_Texture: {{fileID: 2800000, guid: {tex_guid}, type: 3}}\n"),
    )
    .unwrap();

    autobind()
        .arg("deps")
        .arg(root)
        .arg("Assets/Prefabs/Hero.prefab")
        .assert()
        .success()
        .stdout("[texture]\n  Assets/Tex/skin.png\ntotal: 1 assets\n");
}
