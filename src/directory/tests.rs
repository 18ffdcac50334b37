use super::dataset::{Dataset, Entry};
use super::natures::NATURES;
use super::{TopicDirectory, TopicId};
use crate::utils::error::{DatasetError, DirectoryError};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Write;

fn entry(num: u32, name: &str) -> Entry {
    Entry {
        num,
        name: name.to_string(),
        types: Vec::new(),
    }
}

fn sparse_directory() -> TopicDirectory {
    // numbers 2 and 4 are gaps
    let dataset =
        Dataset::from_entries(vec![entry(1, "Bulbasaur"), entry(3, "Venusaur"), entry(5, "Charmeleon")])
            .unwrap();
    TopicDirectory::new(dataset).unwrap()
}

#[test]
fn test_bundled_dataset_has_151_entries() {
    let dataset = Dataset::bundled().unwrap();
    assert_eq!(dataset.count(), 151);
    assert_eq!(dataset.max_id(), 151);
    assert_eq!(dataset.lookup(25).unwrap().name, "Pikachu");
    assert_eq!(dataset.lookup(151).unwrap().name, "Mew");
}

#[test]
fn test_dataset_rejects_zero_number() {
    let err = Dataset::from_json(r#"[{"num": 0, "name": "MissingNo"}]"#).unwrap_err();
    assert!(matches!(err, DatasetError::ZeroNumber { .. }));
}

#[test]
fn test_dataset_rejects_malformed_json() {
    let err = Dataset::from_json("{not json").unwrap_err();
    assert!(matches!(err, DatasetError::Parse(_)));
}

#[test]
fn test_dataset_later_duplicate_wins() {
    let dataset = Dataset::from_entries(vec![entry(1, "First"), entry(1, "Second")]).unwrap();
    assert_eq!(dataset.count(), 1);
    assert_eq!(dataset.lookup(1).unwrap().name, "Second");
}

#[test]
fn test_dataset_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"[{{"num": 7, "name": "Squirtle", "types": ["Water"]}}]"#).unwrap();

    let dataset = Dataset::load(file.path()).unwrap();
    assert_eq!(dataset.max_id(), 7);
    assert_eq!(dataset.lookup(7).unwrap().types, vec!["Water".to_string()]);
}

#[test]
fn test_dataset_load_missing_file() {
    let err = Dataset::load("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }));
}

#[test]
fn test_random_entry_reports_gaps() {
    let directory = sparse_directory();
    let mut rng = StdRng::seed_from_u64(7);
    let mut gaps = 0;
    for _ in 0..200 {
        match directory.dataset().random_entry(&mut rng) {
            Some(e) => assert!([1, 3, 5].contains(&e.num)),
            None => gaps += 1,
        }
    }
    assert!(gaps > 0);
}

#[test]
fn test_empty_dataset_is_fatal() {
    let err = TopicDirectory::new(Dataset::default()).unwrap_err();
    assert!(matches!(err, DirectoryError::EmptyDataset));
}

#[test]
fn test_validate_range_and_gaps() {
    let directory = sparse_directory();
    assert!(directory.validate(1));
    assert!(directory.validate(5));
    assert!(!directory.validate(2));
    assert!(!directory.validate(0));
    assert!(!directory.validate(-1));
    assert!(!directory.validate(6));
    assert!(!directory.validate(i64::MAX));
}

#[test]
fn test_resolve_and_label() {
    let directory = sparse_directory();
    let topic = directory.resolve(3).unwrap();
    assert_eq!(topic.get(), 3);
    assert_eq!(topic.index(), 2);
    assert_eq!(directory.label(topic), Some("Venusaur"));
    assert_eq!(directory.resolve(4), None);
}

#[test]
fn test_topic_id_rejects_zero() {
    assert!(TopicId::new(0).is_none());
    assert_eq!(TopicId::new(9).unwrap().to_string(), "9");
}

#[test]
fn test_random_identity_combines_name_and_nature() {
    let directory = sparse_directory();
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..50 {
        let identity = directory.random_identity_with(&mut rng);
        let (name, nature) = identity.rsplit_once(' ').unwrap();
        assert!(["Bulbasaur", "Venusaur", "Charmeleon"].contains(&name));
        assert!(NATURES.contains(&nature));
    }
}

#[test]
fn test_random_identity_terminates_on_mostly_gaps() {
    // a single entry at the far end of a huge range: almost every sample is a gap
    let dataset = Dataset::from_entries(vec![entry(1_000_000, "Lonely Entry")]).unwrap();
    let directory = TopicDirectory::new(dataset).unwrap();
    let identity = directory.random_identity();
    assert!(identity.starts_with("Lonely Entry "));
}

#[test]
fn test_search_by_name() {
    let dataset = Dataset::bundled().unwrap();
    let results = dataset.search("saur");
    let nums: Vec<u32> = results.by_name.iter().map(|e| e.num).collect();
    assert_eq!(nums, vec![1, 2, 3]);
    assert!(results.by_type.is_empty());
}

#[test]
fn test_search_by_type_reports_matching_type() {
    let dataset = Dataset::bundled().unwrap();
    let results = dataset.search("flying");
    assert!(results.by_name.is_empty());
    let charizard = results.by_type.iter().find(|m| m.num == 6).unwrap();
    assert_eq!(charizard.name, "Charizard");
    assert_eq!(charizard.matched, "Flying");
    // single-typed fire entries never match
    assert!(results.by_type.iter().all(|m| m.num != 4));
}

#[test]
fn test_search_ignores_case() {
    let dataset = Dataset::bundled().unwrap();
    assert_eq!(dataset.search("PIKA"), dataset.search("pika"));
    let results = dataset.search("PiKaChU");
    assert_eq!(results.by_name.len(), 1);
    assert_eq!(results.by_name[0].num, 25);
}

#[test]
fn test_search_miss_and_blank_query() {
    let dataset = Dataset::bundled().unwrap();
    assert!(dataset.search("missingno").is_empty());
    assert!(dataset.search("   ").is_empty());
}

#[test]
fn test_search_results_serialize_with_type_key() {
    let dataset = Dataset::from_entries(vec![Entry {
        num: 7,
        name: "Squirtle".to_string(),
        types: vec!["Water".to_string()],
    }])
    .unwrap();
    let json = serde_json::to_value(dataset.search("water")).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "by_name": [],
            "by_type": [{"type": "Water", "num": 7, "name": "Squirtle"}]
        })
    );
}

#[test]
fn test_load_or_bundled() {
    assert_eq!(Dataset::load_or_bundled(None).unwrap().count(), 151);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"[{{"num": 3, "name": "Gamma", "types": ["Ice"]}}]"#).unwrap();
    let path = file.path().to_string_lossy().into_owned();
    let dataset = Dataset::load_or_bundled(Some(&path)).unwrap();
    assert_eq!(dataset.count(), 1);
    assert_eq!(dataset.search("ice").by_type[0].name, "Gamma");
}
