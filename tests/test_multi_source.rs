mod common;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use common::{LinesFormat, fixture, names};
use parking_lot::Mutex;
use phyloio::model::TaxonNamespace;
use phyloio::stream::multi_tree_source_iter;
use phyloio::{DataIoError, ReaderConfig, SchemaRegistry, StreamConfig, TreeSource};

fn lines_registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();
    registry.register_format("lines", LinesFormat).unwrap();
    registry
}

fn reader_sources<'a>(inputs: &[&'a str]) -> Vec<TreeSource<'a>> {
    inputs
        .iter()
        .map(|input| TreeSource::reader(input.as_bytes()))
        .collect()
}

#[test]
fn test_order_and_namespace_isolation() {
    let registry = lines_registry();
    let sources = reader_sources(&["a0: X Y\na1: Y Z\n", "b0: X Z\n"]);
    let trees: Vec<_> = registry
        .multi_tree_source_iter(sources, "lines", StreamConfig::new())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    let names: Vec<_> = trees.iter().map(|t| t.name().unwrap()).collect();
    assert_eq!(names, vec!["a0", "a1", "b0"]);
    assert!(trees[0].taxon_namespace().same_as(trees[1].taxon_namespace()));
    assert!(!trees[0].taxon_namespace().same_as(trees[2].taxon_namespace()));
    assert_eq!(trees[0].taxon_namespace().labels(), vec!["X", "Y", "Z"]);
    assert_eq!(trees[2].taxon_namespace().labels(), vec!["X", "Z"]);
}

#[test]
fn test_shared_namespace() {
    let registry = lines_registry();
    let shared = TaxonNamespace::new();
    let config = StreamConfig::new()
        .with_reader_config(ReaderConfig::new().with_taxon_namespace(shared.clone()));
    let sources = reader_sources(&["a0: X Y\na1: Y Z\n", "b0: W X\n"]);

    let trees: Vec<_> = registry
        .multi_tree_source_iter(sources, "lines", config)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(trees.len(), 3);
    assert!(trees.iter().all(|t| t.taxon_namespace().same_as(&shared)));
    assert_eq!(shared.labels(), vec!["X", "Y", "Z", "W"]);
}

#[test]
fn test_progress_prefix() {
    let registry = lines_registry();
    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&messages);
    let config = StreamConfig::new()
        .with_tree_offset(1)
        .with_progress(move |message: &str| sink.lock().push(message.to_string()));
    let sources = reader_sources(&["a0: X\na1: X\n", "b0: X\nb1: X\n"]);

    let iter = registry
        .multi_tree_source_iter(sources, "lines", config)
        .unwrap();
    assert_eq!(names(iter), vec!["a1", "b1"]);
    assert_eq!(
        *messages.lock(),
        vec![
            "Tree source 1 of 2: Skipping tree at index 0",
            "Tree source 1 of 2: Processing tree at index 1",
            "Tree source 2 of 2: Skipping tree at index 0",
            "Tree source 2 of 2: Processing tree at index 1",
        ]
    );
    assert!(messages.lock()[2].contains("source 2 of 2"));
}

#[test]
fn test_offset_error_ends_all_sources() {
    let registry = lines_registry();
    let sources = reader_sources(&["a0: X\na1: X\na2: X\n", "b0: X\n", "c0: X\nc1: X\nc2: X\n"]);
    let mut iter = registry
        .multi_tree_source_iter(sources, "lines", StreamConfig::new().with_tree_offset(2))
        .unwrap();

    assert_eq!(iter.next().unwrap().unwrap().name(), Some("a2"));
    assert!(matches!(
        iter.next(),
        Some(Err(DataIoError::OffsetOutOfRange { offset: 2, found: 1 }))
    ));
    assert_eq!(iter.source_index(), 2);
    assert!(iter.next().is_none());
}

#[test]
fn test_path_sources() {
    let registry = SchemaRegistry::with_builtin_formats();
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.nwk");
    let second = dir.path().join("second.nwk");
    std::fs::File::create(&first)
        .unwrap()
        .write_all(b"(A,B);\n(A,(B,C));\n")
        .unwrap();
    std::fs::File::create(&second)
        .unwrap()
        .write_all(b"[&R] ((C,D),E);\n")
        .unwrap();

    let sources = vec![TreeSource::path(&first), TreeSource::from(second.as_path())];
    let trees: Vec<_> = multi_tree_source_iter(&registry, sources, "newick", StreamConfig::new())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(trees.len(), 3);
    assert_eq!(trees[2].is_rooted(), Some(true));
    assert_eq!(trees[2].leaf_labels(), vec!["C", "D", "E"]);
}

#[test]
fn test_missing_path_opened_lazily() {
    let registry = SchemaRegistry::with_builtin_formats();
    let missing = PathBuf::from("does/not/exist.nwk");
    let sources = vec![
        TreeSource::reader("(A,B);\n".as_bytes()),
        TreeSource::path(&missing),
        TreeSource::reader("(C,D);\n".as_bytes()),
    ];

    let mut iter = registry
        .multi_tree_source_iter(sources, "newick", StreamConfig::new())
        .unwrap();
    assert_eq!(iter.num_sources(), 3);
    assert_eq!(iter.source_index(), 0);

    assert!(iter.next().unwrap().is_ok());
    match iter.next() {
        Some(Err(DataIoError::OpenSource { path, source })) => {
            assert_eq!(path, missing);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected open error, got {:?}", other.map(|r| r.is_ok())),
    }
    assert!(iter.next().is_none());
}

#[test]
fn test_unsupported_schema_checked_upfront() {
    let registry = lines_registry();
    let sources = vec![TreeSource::path("never/opened.nwk")];
    let err = registry
        .multi_tree_source_iter(sources, "newick", StreamConfig::new())
        .err()
        .unwrap();
    assert!(matches!(err, DataIoError::UnsupportedFormat { .. }));
}

#[test]
fn test_borrowed_reader_stays_with_caller() {
    let registry = SchemaRegistry::with_builtin_formats();
    let mut stream = std::io::BufReader::new(std::fs::File::open(fixture("kiwis.nwk")).unwrap());
    {
        let mut iter = registry
            .multi_tree_source_iter(
                vec![TreeSource::reader(&mut stream)],
                "newick",
                StreamConfig::new(),
            )
            .unwrap();
        assert!(iter.next().unwrap().is_ok());
    }
    // The owner gets the stream back right after the first tree
    let mut rest = String::new();
    std::io::Read::read_to_string(&mut stream, &mut rest).unwrap();
    assert!(rest.starts_with("\n[&R] ((Apteryx_australis:0.4,"));

    let unread = registry
        .get_reader("newick", ReaderConfig::new())
        .unwrap()
        .read(&mut rest.as_bytes())
        .unwrap();
    assert_eq!(unread.num_trees(), 3);
}

#[test]
fn test_borrowed_reader_keeps_unread_trees() {
    let registry = SchemaRegistry::with_builtin_formats();
    let mut stream = std::io::BufReader::new("(A,B);\n(C,D);\n(E,F);\n".as_bytes());
    {
        let mut iter = registry
            .multi_tree_source_iter(
                vec![TreeSource::reader(&mut stream)],
                "newick",
                StreamConfig::new(),
            )
            .unwrap();
        let first = iter.next().unwrap().unwrap();
        assert_eq!(first.leaf_labels(), vec!["A", "B"]);
    }
    let mut rest = String::new();
    std::io::Read::read_to_string(&mut stream, &mut rest).unwrap();
    assert_eq!(rest, "\n(C,D);\n(E,F);\n");
}

#[test]
fn test_nexus_sources() {
    let sources = vec![
        TreeSource::path(fixture("rails.nex")),
        TreeSource::reader("#NEXUS\nBEGIN TREES; TREE extra = (Kea,Kaka); END;\n".as_bytes()),
    ];
    let items: Vec<_> = phyloio::default_registry()
        .multi_tree_source_iter(sources, "nexus", StreamConfig::new().with_tree_offset(1))
        .unwrap()
        .collect();

    // Three trees of rails.nex from index 1 on; the second source has no
    // tree at index 1
    assert_eq!(items.len(), 4);
    let tree_names: Vec<_> = items[..3]
        .iter()
        .map(|item| item.as_ref().unwrap().name().unwrap().to_string())
        .collect();
    assert_eq!(tree_names, vec!["STATE 1000", "STATE 2000", "consensus"]);
    assert!(matches!(
        items[3],
        Err(DataIoError::OffsetOutOfRange { offset: 1, found: 1 })
    ));
}
