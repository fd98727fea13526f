//! Concurrency and isolation tests for the virtual file store.

use fob_memfs::{StoreError, VirtualFileStore};
use std::io::Read;
use std::sync::Arc;
use std::thread;

fn read_all(store: &VirtualFileStore, path: &str) -> Vec<u8> {
    let mut file = store.open(path).expect("file should exist");
    let mut content = Vec::new();
    file.read_to_end(&mut content).expect("read should succeed");
    content
}

#[test]
fn single_file_scenario() {
    let store = VirtualFileStore::new();
    store.write("app.js", &b"hello world"[..]).unwrap();

    let mut file = store.open("app.js").unwrap();
    let info = file.metadata().unwrap().clone();
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();

    assert_eq!(content, "hello world");
    assert_eq!(info.name(), "app.js");
    assert_eq!(info.size(), 11);
    assert!(!info.is_dir());
    assert!(info.mode().is_temporary());
}

#[test]
fn multiple_files() {
    let store = VirtualFileStore::new();
    store.write("app.js", &b"hello app.js"[..]).unwrap();
    store.write("extension.js", &b"hello extension.js"[..]).unwrap();

    assert_eq!(read_all(&store, "app.js"), b"hello app.js");
    assert_eq!(store.stat("app.js").unwrap().size(), 12);
    assert_eq!(read_all(&store, "extension.js"), b"hello extension.js");
    assert_eq!(store.stat("extension.js").unwrap().size(), 18);
}

#[test]
fn concurrent_writes_to_distinct_paths() {
    const WRITERS: usize = 32;
    let store = Arc::new(VirtualFileStore::new());

    thread::scope(|scope| {
        for i in 0..WRITERS {
            let store = Arc::clone(&store);
            scope.spawn(move || {
                let content = format!("content of file {i}").repeat(64);
                store
                    .write(&format!("chunk-{i}.js"), content.as_bytes())
                    .unwrap();
            });
        }
    });

    assert_eq!(store.len(), WRITERS);
    for i in 0..WRITERS {
        let expected = format!("content of file {i}").repeat(64);
        assert_eq!(read_all(&store, &format!("chunk-{i}.js")), expected.as_bytes());
    }
}

#[test]
fn concurrent_readers_and_writer_never_see_torn_content() {
    let store = Arc::new(VirtualFileStore::new());
    let versions: Vec<Vec<u8>> = (0..50u8).map(|v| vec![v; 4096]).collect();
    store.write_bytes("app.js", versions[0].clone());

    thread::scope(|scope| {
        let writer_store = Arc::clone(&store);
        let writer_versions = versions.clone();
        scope.spawn(move || {
            for version in writer_versions {
                writer_store.write_bytes("app.js", version);
            }
        });

        for _ in 0..4 {
            let store = Arc::clone(&store);
            scope.spawn(move || {
                for _ in 0..200 {
                    let content = read_all(&store, "app.js");
                    assert_eq!(content.len(), 4096);
                    let first = content[0];
                    assert!(content.iter().all(|b| *b == first), "torn read");
                }
            });
        }
    });
}

#[test]
fn open_handle_is_isolated_from_later_writes() {
    let store = VirtualFileStore::new();
    store.write("app.js", &b"first"[..]).unwrap();

    let mut before = store.open("app.js").unwrap();
    store.write("app.js", &b"second version"[..]).unwrap();

    let mut content = Vec::new();
    before.read_to_end(&mut content).unwrap();
    assert_eq!(content, b"first");
    assert_eq!(before.metadata().unwrap().size(), 5);

    assert_eq!(read_all(&store, "app.js"), b"second version");
}

#[test]
fn open_after_reset_is_not_found() {
    let store = VirtualFileStore::new();
    store.write("app.js", &b"x"[..]).unwrap();
    store.reset();

    assert!(matches!(store.open("app.js"), Err(StoreError::NotFound(p)) if p == "app.js"));
    assert!(matches!(store.open("never.js"), Err(StoreError::NotFound(_))));
}

#[test]
fn handle_double_close_is_rejected() {
    let store = VirtualFileStore::new();
    store.write("app.js", &b"x"[..]).unwrap();

    let mut file = store.open("app.js").unwrap();
    file.close().unwrap();
    assert!(matches!(file.close(), Err(StoreError::Closed)));
}
