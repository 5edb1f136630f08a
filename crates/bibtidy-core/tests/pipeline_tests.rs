//! End-to-end normalization tests

mod common;

use bibtidy_bibtex::parse;
use bibtidy_core::{
    author_initials, normalize_entries, protect_title_capitals, reformat_bibtex,
    reformat_bibtex_file, BibtidyConfig, NormalizeContext, NormalizeError, SkipReason,
    DEFAULT_FIELD_ORDER,
};
use common::fixtures::{bibtex_fixture_path, load_bibtex_fixture};
use rstest::rstest;

fn field_keys(entry: &bibtidy_core::BibTeXEntry) -> Vec<&str> {
    entry.fields.iter().map(|f| f.key.as_str()).collect()
}

// === Key Generation ===

#[rstest]
#[case("Smith, John and Doe, Jane", "SD")]
#[case("John Smith and Jane Doe", "SD")]
#[case("Jean-Paul Sartre", "S")]
#[case("Sartre-Beauvoir, Jean", "SB")]
#[case("{von Neumann}, John", "VN")]
#[case("Alice Ng and  Bob Wu   and Carol Xu", "NWX")]
fn test_initials(#[case] authors: &str, #[case] expected: &str) {
    assert_eq!(author_initials(authors), expected);
}

#[test]
fn test_key_collisions_across_run() {
    let input = r#"
@article{one, author = {Smith, John and Doe, Jane}, year = {2023}}
@article{two, author = {Sun, Jo and Diaz, Juan}, year = {1923}}
@book{three, author = {Sand, Jo and Dale, Jim}, year = {2023}}
@misc{four, author = {Other, Ann}, year = {2023}}
"#;
    let (_, report) = reformat_bibtex(input, &BibtidyConfig::default()).unwrap();
    let keys: Vec<&str> = report.entries.iter().map(|e| e.cite_key.as_str()).collect();
    assert_eq!(keys, vec!["SD23", "SD23a", "SD23b", "O23"]);
}

#[test]
fn test_missing_author_and_year_placeholders() {
    let input = "@misc{anon, title = {Untitled}}\n@misc{anon2, title = {Also Untitled}}";
    let (_, report) = reformat_bibtex(input, &BibtidyConfig::default()).unwrap();
    assert_eq!(report.entries[0].cite_key, "XXX");
    assert_eq!(report.entries[1].cite_key, "XXXa");
}

// === Field Normalization ===

#[test]
fn test_article_never_keeps_publisher() {
    let input = r#"
@ARTICLE{a, author = {A, B}, publisher = {Elsevier}, year = {2000}}
@article{b, author = {C, D}, publisher = {  APS , }, year = {2001}}
"#;
    let (output, report) = reformat_bibtex(input, &BibtidyConfig::default()).unwrap();
    for entry in &report.entries {
        assert_eq!(entry.entry_type.as_deref(), Some("article"));
        assert!(entry.publisher().is_none());
    }
    assert!(!output.contains("publisher"));
}

#[test]
fn test_journaltitle_overwrites_journal() {
    let input = r#"@article{a,
  journal = {Stale},
  journaltitle = {J. Stat. Phys.},
  shortjournal = {JSP},
  year = {2010}
}"#;
    let (_, report) = reformat_bibtex(input, &BibtidyConfig::default()).unwrap();
    let entry = &report.entries[0];
    assert_eq!(entry.journal(), Some("Journal of Statistical Physics"));
    assert!(!entry.has_field("shortjournal"));
}

#[test]
fn test_unlisted_journal_is_byte_identical() {
    let journal = "Annalen der Physik (Leipzig)";
    let input = format!("@article{{a, journal = {{{journal}}}, year = {{1905}}}}");
    let (_, report) = reformat_bibtex(&input, &BibtidyConfig::default()).unwrap();
    assert_eq!(report.entries[0].journal(), Some(journal));
}

#[test]
fn test_title_protection_applied() {
    let (_, report) = reformat_bibtex(
        "@book{a, title = {the Quick BROWN Fox}, year = {2000}}",
        &BibtidyConfig::default(),
    )
    .unwrap();
    assert_eq!(
        report.entries[0].title(),
        Some("the {Q}uick {B}{R}{O}{W}{N} {F}ox")
    );
}

#[test]
fn test_normalizing_twice_keeps_titles() {
    let config = BibtidyConfig::default();
    let (first, _) = reformat_bibtex(&load_bibtex_fixture("refs.bib"), &config).unwrap();
    let (second, _) = reformat_bibtex(&first, &config).unwrap();

    let titles = |text: &str| -> Vec<String> {
        parse(text)
            .entries
            .iter()
            .filter_map(|e| e.title().map(str::to_string))
            .collect()
    };
    assert_eq!(titles(&first), titles(&second));
    assert_eq!(
        protect_title_capitals("the {Q}uick {B}{R}{O}{W}{N} {F}ox"),
        "the {Q}uick {B}{R}{O}{W}{N} {F}ox"
    );
}

// === Skipping ===

#[test]
fn test_entries_without_type_are_skipped() {
    let (_, report) =
        reformat_bibtex(&load_bibtex_fixture("refs.bib"), &BibtidyConfig::default()).unwrap();

    assert_eq!(report.entries.len(), 4);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].cite_key, "mystery");
    assert_eq!(report.skipped[0].index, 2);
    assert_eq!(report.skipped[0].reason, SkipReason::MissingEntryType);
}

#[test]
fn test_type_field_fallback() {
    let (_, report) =
        reformat_bibtex(&load_bibtex_fixture("refs.bib"), &BibtidyConfig::default()).unwrap();
    let typed = report
        .entries
        .iter()
        .find(|e| e.get_field("booktitle").is_some())
        .unwrap();
    assert_eq!(typed.entry_type.as_deref(), Some("inproceedings"));
    assert!(!typed.has_field("type"));
}

// === Filtering and Ordering ===

#[test]
fn test_field_order_follows_priority() {
    let (_, report) =
        reformat_bibtex(&load_bibtex_fixture("refs.bib"), &BibtidyConfig::default()).unwrap();

    for entry in &report.entries {
        let positions: Vec<usize> = field_keys(entry)
            .iter()
            .map(|k| DEFAULT_FIELD_ORDER.iter().position(|o| o == k).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted, "fields out of order in {}", entry.cite_key);
    }
}

#[test]
fn test_extra_fields_from_config() {
    let config = BibtidyConfig::from_toml(r#"extra_fields = ["doi", "address"]"#).unwrap();
    let input = "@book{a, address = {Paris}, doi = {10.1/x}, author = {Ann Lee}, year = {1999}}";
    let context = NormalizeContext::from_config(&config);
    let report = normalize_entries(parse(input).entries, &context);
    assert_eq!(
        field_keys(&report.entries[0]),
        vec!["author", "year", "address", "doi"]
    );
}

// === Errors ===

#[test]
fn test_malformed_file_aborts() {
    let err = reformat_bibtex(&load_bibtex_fixture("malformed.bib"), &BibtidyConfig::default())
        .unwrap_err();
    match err {
        NormalizeError::Parse(e) => assert!(e.to_string().contains("line 6")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_free_text_with_at_sign_is_not_an_error() {
    let input = "Contact me@example.org for updates\n@article{a, author = {Xu, Yan}, year = {2000}}\n";
    let (output, report) = reformat_bibtex(input, &BibtidyConfig::default()).unwrap();
    assert_eq!(report.entries.len(), 1);
    assert!(output.starts_with("@article{X00,"));
}

#[test]
fn test_bare_comment_marker_does_not_swallow_entry() {
    let input = "@comment\n@article{a, author = {Xu, Yan}, year = {2000}}\n";
    let (_, report) = reformat_bibtex(input, &BibtidyConfig::default()).unwrap();
    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].cite_key, "X00");
}

// === Files ===

#[test]
fn test_reformat_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.bib");

    let report = reformat_bibtex_file(
        &bibtex_fixture_path("refs.bib"),
        &output,
        &BibtidyConfig::default(),
    )
    .unwrap();
    assert_eq!(report.entries.len(), 4);

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("@article{SD23,\n  author = "));
    assert_eq!(parse(&written).entries.len(), 4);
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = reformat_bibtex_file(
        &dir.path().join("absent.bib"),
        &dir.path().join("out.bib"),
        &BibtidyConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, NormalizeError::Io { .. }));
}

#[test]
fn test_unwritable_output_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = reformat_bibtex_file(
        &bibtex_fixture_path("refs.bib"),
        &dir.path().join("missing-dir").join("out.bib"),
        &BibtidyConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, NormalizeError::Io { .. }));
}

#[test]
fn test_config_file_loading() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bibtidy.toml");
    std::fs::write(
        &path,
        r#"
indent = "    "

[publishers]
"Acme" = "Acme Scientific Publishing"
"#,
    )
    .unwrap();

    let config = BibtidyConfig::load_or_default(Some(&path)).unwrap();
    let (output, _) = reformat_bibtex(
        "@book{a, author = {Ann Lee}, publisher = {Acme}, year = {1999}}",
        &config,
    )
    .unwrap();
    assert!(output.contains("\n    publisher = {Acme Scientific Publishing}"));
}
