//! Property-based tests for the virtual file store.

use fob_memfs::VirtualFileStore;
use proptest::prelude::*;
use std::collections::HashMap;
use std::io::Read;

fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,8}", 1..=3).prop_map(|parts| format!("{}.js", parts.join("/")))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: write(p, c) then open(p) yields c and size == len(c)
    #[test]
    fn prop_write_then_open_returns_content(
        path in path_strategy(),
        content in prop::collection::vec(any::<u8>(), 0..2048),
    ) {
        let store = VirtualFileStore::new();
        store.write(&path, content.as_slice()).unwrap();

        let mut file = store.open(&path).unwrap();
        let mut read = Vec::new();
        file.read_to_end(&mut read).unwrap();

        prop_assert_eq!(&read, &content);
        prop_assert_eq!(file.metadata().unwrap().size(), content.len() as u64);
    }

    /// Property: the store always holds the last write per path
    #[test]
    fn prop_last_write_wins(
        writes in prop::collection::vec((path_strategy(), "[a-z0-9]{0,32}"), 1..=20),
    ) {
        let store = VirtualFileStore::new();
        let mut expected = HashMap::new();

        for (path, content) in &writes {
            store.write_bytes(path, content.clone());
            expected.insert(path.clone(), content.clone());
        }

        prop_assert_eq!(store.len(), expected.len());
        for (path, content) in expected {
            let bytes = store.open(&path).unwrap().into_bytes().unwrap();
            prop_assert_eq!(bytes.as_ref(), content.as_bytes());
        }
    }
}
