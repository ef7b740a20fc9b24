mod common;

use std::sync::Arc;

use common::{CountingFormat, LinesFormat, fixture, names};
use parking_lot::Mutex;
use phyloio::registry::{ProgressFn, TreeStreamFactory};
use phyloio::stream::tree_source_iter;
use phyloio::{DataIoError, ReaderConfig, SchemaRegistry, StreamConfig};

fn lines_registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::with_builtin_formats();
    registry.register_format("lines", LinesFormat).unwrap();
    registry
}

fn recording_progress() -> (ProgressFn, Arc<Mutex<Vec<String>>>) {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&messages);
    let progress: ProgressFn = Arc::new(move |message: &str| sink.lock().push(message.to_string()));
    (progress, messages)
}

#[test]
fn test_offset_skips_leading_trees() {
    let registry = lines_registry();
    let input = "t0: A\nt1: A\nt2: A\nt3: A\n";
    let iter = registry
        .tree_source_iter(input.as_bytes(), "lines", StreamConfig::new().with_tree_offset(2))
        .unwrap();
    assert_eq!(names(iter), vec!["t2", "t3"]);
}

#[test]
fn test_offset_out_of_range() {
    let registry = lines_registry();
    let input = "t0: A\nt1: A\nt2: A\n";
    let mut iter = registry
        .tree_source_iter(input.as_bytes(), "lines", StreamConfig::new().with_tree_offset(5))
        .unwrap();

    match iter.next() {
        Some(Err(DataIoError::OffsetOutOfRange { offset, found })) => {
            assert_eq!(offset, 5);
            assert_eq!(found, 3);
        }
        other => panic!("expected offset error, got {:?}", other.map(|r| r.is_ok())),
    }
    assert!(iter.next().is_none());
}

#[test]
fn test_offset_at_last_position_is_out_of_range() {
    let registry = lines_registry();
    let mut iter = registry
        .tree_source_iter("t0: A\nt1: A\n".as_bytes(), "lines", StreamConfig::new().with_tree_offset(2))
        .unwrap();
    assert!(matches!(
        iter.next(),
        Some(Err(DataIoError::OffsetOutOfRange { offset: 2, found: 2 }))
    ));
}

#[test]
fn test_empty_source_without_offset() {
    let registry = lines_registry();
    let mut iter = registry
        .tree_source_iter("".as_bytes(), "lines", StreamConfig::new())
        .unwrap();
    assert!(iter.next().is_none());
    assert_eq!(iter.positions_seen(), 0);
}

#[test]
fn test_placeholders_never_emitted() {
    let registry = lines_registry();
    let input = "-\nt1: A\n-\nt3: A\n-\n";
    let (progress, messages) = recording_progress();
    let iter = registry
        .tree_source_iter(
            input.as_bytes(),
            "lines",
            StreamConfig::new().with_progress(move |m: &str| progress(m)),
        )
        .unwrap();
    assert_eq!(names(iter), vec!["t1", "t3"]);
    assert_eq!(
        *messages.lock(),
        vec![
            "Skipping tree at index 0",
            "Processing tree at index 1",
            "Skipping tree at index 2",
            "Processing tree at index 3",
            "Skipping tree at index 4",
        ]
    );
}

#[test]
fn test_placeholder_counts_towards_offset() {
    let registry = lines_registry();
    let iter = registry
        .tree_source_iter("-\nt1: A\nt2: A\n".as_bytes(), "lines", StreamConfig::new().with_tree_offset(1))
        .unwrap();
    assert_eq!(names(iter), vec!["t1", "t2"]);
}

#[test]
fn test_error_ends_sequence() {
    let registry = lines_registry();
    let mut iter = registry
        .tree_source_iter("t0: A\n!\nt2: A\n".as_bytes(), "lines", StreamConfig::new())
        .unwrap();
    assert!(iter.next().unwrap().is_ok());
    assert!(matches!(iter.next(), Some(Err(DataIoError::Io(_)))));
    assert!(iter.next().is_none());
}

#[test]
fn test_lazy_pull() {
    let format = CountingFormat::default();
    let mut registry = SchemaRegistry::new();
    let stream: Arc<dyn TreeStreamFactory> = Arc::new(format.clone());
    registry.register("counting", None, None, Some(stream)).unwrap();

    let mut iter = registry
        .tree_source_iter("".as_bytes(), "counting", StreamConfig::new())
        .unwrap();
    assert_eq!(format.pulled(), 0);
    let first = iter.next().unwrap().unwrap();
    assert_eq!(first.name(), Some("t0"));
    assert_eq!(format.pulled(), 1);

    // Skipped positions are pulled one by one too
    let mut iter = registry
        .tree_source_iter("".as_bytes(), "counting", StreamConfig::new().with_tree_offset(3))
        .unwrap();
    assert_eq!(iter.next().unwrap().unwrap().name(), Some("t3"));
    assert_eq!(format.pulled(), 5);

    // Dropping early never reports an offset error
    drop(iter);
}

#[test]
fn test_newick_fixture_with_offset() {
    let registry = SchemaRegistry::with_builtin_formats();
    let file = std::fs::File::open(fixture("kiwis.nwk")).unwrap();
    let iter = tree_source_iter(
        &registry,
        std::io::BufReader::new(file),
        "newick",
        StreamConfig::new().with_tree_offset(1),
    )
    .unwrap();
    let trees: Vec<_> = iter.collect::<Result<_, _>>().unwrap();
    assert_eq!(trees.len(), 3);
    assert!(trees.iter().all(|t| t.num_leaves() == 5));
    assert!(trees[0].taxon_namespace().same_as(trees[2].taxon_namespace()));
}

#[test]
fn test_nexus_stream_with_placeholder_and_splits() {
    let registry = SchemaRegistry::with_builtin_formats();
    let input = "#NEXUS
BEGIN TREES;
    TRANSLATE 1 A, 2 B, 3 C;
    TREE burnin = ((1,2),3);
    TREE empty = ;
    TREE sample = ((1,3),2);
END;
";
    let config = StreamConfig::new()
        .with_tree_offset(1)
        .with_reader_config(ReaderConfig::new().with_encode_splits(true));
    let trees: Vec<_> = registry
        .tree_source_iter(input.as_bytes(), "nexus", config)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(trees.len(), 1);
    assert_eq!(trees[0].name(), Some("sample"));
    assert!(trees[0].has_splits());
    assert_eq!(trees[0].taxon_namespace().labels(), vec!["A", "B", "C"]);
}

#[test]
fn test_parse_error_surfaces_at_iteration() {
    let registry = SchemaRegistry::with_builtin_formats();
    let mut iter = registry
        .tree_source_iter("(A,B);\n(A,B\n".as_bytes(), "newick", StreamConfig::new())
        .unwrap();
    assert!(iter.next().unwrap().is_ok());
    let err = iter.next().unwrap().unwrap_err();
    assert!(matches!(err, DataIoError::Parsing(_)));
    assert!(iter.next().is_none());
}
