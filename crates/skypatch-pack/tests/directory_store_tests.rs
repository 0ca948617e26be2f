//! Integration tests for [`DirectoryStore`] against a real temporary
//! directory laid out like an unpacked resource pack.

use std::fs;
use std::path::Path;

use skypatch_pack::prelude::*;

fn write_file(root: &Path, relative: &str, bytes: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

#[test]
fn lists_namespaces_of_each_kind() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "assets/minecraft/optifine/sky/world0/sky1.properties", b"a=1");
    write_file(dir.path(), "assets/custom/textures/x.png", b"");
    write_file(dir.path(), "data/server/tags/y.json", b"{}");
    write_file(dir.path(), "assets/stray.txt", b"");

    let store = DirectoryStore::new(dir.path());
    let assets: Vec<String> = store.namespaces(ResourceKind::Assets).into_iter().collect();
    assert_eq!(assets, ["custom", "minecraft"]);
    let data: Vec<String> = store.namespaces(ResourceKind::Data).into_iter().collect();
    assert_eq!(data, ["server"]);
}

#[test]
fn search_returns_sorted_ids_below_parent() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "assets/ns/optifine/sky/world0/sky2.properties", b"");
    write_file(dir.path(), "assets/ns/optifine/sky/world0/sky1.properties", b"");
    write_file(dir.path(), "assets/ns/optifine/sky/world1/sky1.png", b"");
    write_file(dir.path(), "assets/ns/optifine/other/z.properties", b"");

    let store = DirectoryStore::new(dir.path());
    let found: Vec<String> = store
        .search(ResourceKind::Assets, &ResourceId::new("ns", "optifine/sky"))
        .map(|id| id.to_string())
        .collect();
    assert_eq!(
        found,
        [
            "ns:optifine/sky/world0/sky1.properties",
            "ns:optifine/sky/world0/sky2.properties",
            "ns:optifine/sky/world1/sky1.png",
        ]
    );
}

#[test]
fn search_missing_parent_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirectoryStore::new(dir.path());
    assert_eq!(
        store
            .search(ResourceKind::Assets, &ResourceId::new("ns", "optifine/sky"))
            .count(),
        0
    );
    assert!(store.namespaces(ResourceKind::Assets).is_empty());
}

#[test]
fn write_then_read_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = DirectoryStore::new(dir.path().join("out"));
    let id = ResourceId::new("fabricskyboxes", "sky/sky1.json");

    assert_eq!(store.read(ResourceKind::Assets, &id), None);
    store.write(ResourceKind::Assets, &id, b"{}").unwrap();

    assert_eq!(store.read(ResourceKind::Assets, &id), Some(b"{}".to_vec()));
    assert!(dir
        .path()
        .join("out/assets/fabricskyboxes/sky/sky1.json")
        .is_file());
}

#[cfg(unix)]
#[test]
fn search_does_not_follow_directory_symlinks() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "assets/ns/optifine/sky/world0/sky1.properties", b"");
    let world = dir.path().join("assets/ns/optifine/sky/world0");
    std::os::unix::fs::symlink(&world, world.join("loop")).unwrap();
    std::os::unix::fs::symlink(
        world.join("sky1.properties"),
        world.join("alias.properties"),
    )
    .unwrap();

    let store = DirectoryStore::new(dir.path());
    let found: Vec<String> = store
        .search(ResourceKind::Assets, &ResourceId::new("ns", "optifine/sky"))
        .map(|id| id.to_string())
        .collect();
    assert_eq!(
        found,
        [
            "ns:optifine/sky/world0/alias.properties",
            "ns:optifine/sky/world0/sky1.properties",
        ]
    );
}
