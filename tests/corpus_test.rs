use ricettario::corpus::{self, document};
use ricettario::Error;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_fixture_dataset() {
    let docs = corpus::load_file("tests/fixtures/ricette_dataset.json").expect("fixture loads");

    assert_eq!(docs.len(), 6, "one document per entry");

    let parmigiana = &docs[0];
    assert_eq!(parmigiana.metadata.id, 1);
    assert_eq!(parmigiana.metadata.title, "Parmigiana di melanzane");
    assert_eq!(parmigiana.metadata.category, "Secondi piatti");
    assert!(parmigiana.content.starts_with("Tagliare le melanzane"));
    assert!(parmigiana.metadata.source.ends_with("ricette_dataset.json"));

    // Entry without description
    assert_eq!(docs[2].metadata.description, document::DEFAULT_DESCRIPTION);

    // Entry without id or category
    assert_eq!(docs[4].metadata.id, document::DEFAULT_ID);
    assert_eq!(docs[4].metadata.category, document::DEFAULT_CATEGORY);
    assert_eq!(docs[4].metadata.title, "Risotto alla zucca");

    // Entry with nothing but an id and a procedure
    let bare = &docs[5];
    assert_eq!(bare.metadata.id, 6);
    assert_eq!(bare.metadata.title, document::DEFAULT_TITLE);
    assert_eq!(bare.metadata.category, document::DEFAULT_CATEGORY);
    assert_eq!(bare.metadata.description, document::DEFAULT_DESCRIPTION);
}

#[test]
fn test_load_file_with_canonical_field_names() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"id": 10, "title": "Caprese", "category": "Antipasti", "description": "Fresca", "procedure": "Affettare pomodoro e mozzarella."}}]"#
    )
    .unwrap();

    let docs = corpus::load_file(file.path()).unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].metadata.title, "Caprese");
    assert_eq!(docs[0].metadata.description, "Fresca");
}

#[test]
fn test_load_file_not_a_list() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"ricette": []}}"#).unwrap();

    let result = corpus::load_file(file.path());
    assert!(matches!(result, Err(Error::CorpusFormat(_))));
}

#[test]
fn test_load_file_missing() {
    let result = corpus::load_file("tests/fixtures/does_not_exist.json");
    assert!(matches!(result, Err(Error::CorpusFormat(_))));
}

#[test]
fn test_load_str_empty_list() {
    let docs = corpus::load_str("[]").unwrap();
    assert!(docs.is_empty());
}
