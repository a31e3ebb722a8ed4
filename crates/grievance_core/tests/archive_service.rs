use grievance_core::model::file::NewFile;
use grievance_core::repo::{AssociationRepository, FileRepository};
use grievance_core::{
    ArchiveService, AttachOutcome, DocumentStore, Entity, FormField, PayPeriod, SearchOutcome,
    ServiceError, SqliteRepository, UploadForm,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    source: PathBuf,
    documents: PathBuf,
    service: ArchiveService<SqliteRepository>,
}

fn fixture_with(repo: SqliteRepository) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("report.pdf");
    fs::write(&source, b"%PDF-1.4 grievance").unwrap();
    let documents = dir.path().join("report_files");
    let store = DocumentStore::open(&documents).unwrap();

    Fixture {
        _dir: dir,
        source,
        documents,
        service: ArchiveService::new(repo, store),
    }
}

fn fixture() -> Fixture {
    fixture_with(SqliteRepository::open_in_memory().unwrap())
}

fn form(source: &Path, year: &str) -> UploadForm {
    UploadForm {
        source: source.display().to_string(),
        location: "Plant 3".to_string(),
        year: year.to_string(),
        pay_period: "7".to_string(),
    }
}

fn seed_file(repo: &mut SqliteRepository, filename: &str) {
    repo.add_file(&NewFile {
        filename: filename.to_string(),
        location: "Archive".to_string(),
        year: 2020,
        pay_period: PayPeriod::new(1).unwrap(),
    })
    .unwrap();
}

fn stored_documents(documents: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(documents)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn upload_names_document_after_year_and_next_serial() {
    let mut repo = SqliteRepository::open_in_memory().unwrap();
    for index in 1..=41 {
        seed_file(&mut repo, &format!("seed {index}.pdf"));
    }
    let mut fx = fixture_with(repo);

    let receipt = fx.service.upload(&form(&fx.source, "2021")).unwrap();

    assert_eq!(receipt.filename, "20210042 report.pdf");
    assert_eq!(receipt.id, 42);
    let stored = fx.documents.join("20210042 report.pdf");
    assert_eq!(fs::read(stored).unwrap(), b"%PDF-1.4 grievance");
    let file = fx
        .service
        .repository()
        .get_file("20210042 report.pdf")
        .unwrap()
        .unwrap();
    assert_eq!(file.location, "Plant 3");
    assert_eq!(file.pay_period.get(), 7);
}

#[test]
fn consecutive_uploads_get_distinct_serials() {
    let mut fx = fixture();

    let first = fx.service.upload(&form(&fx.source, "2021")).unwrap();
    let second = fx.service.upload(&form(&fx.source, "2021")).unwrap();

    assert_eq!(first.filename, "20210001 report.pdf");
    assert_eq!(second.filename, "20210002 report.pdf");
    assert_eq!(
        stored_documents(&fx.documents),
        vec!["20210001 report.pdf", "20210002 report.pdf"]
    );
}

#[test]
fn incomplete_upload_writes_nothing() {
    let mut fx = fixture();
    let mut incomplete = form(&fx.source, "2021");
    incomplete.location = "  ".to_string();
    incomplete.pay_period = String::new();

    let err = fx.service.upload(&incomplete).unwrap_err();

    match err {
        ServiceError::ValidationIncomplete(fields) => {
            assert_eq!(fields, vec![FormField::Location, FormField::PayPeriod]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!fx.service.repository().has_files().unwrap());
    assert!(stored_documents(&fx.documents).is_empty());
}

#[test]
fn pay_period_out_of_range_is_rejected() {
    let mut fx = fixture();
    let mut invalid = form(&fx.source, "2021");
    invalid.pay_period = "27".to_string();

    let err = fx.service.upload(&invalid).unwrap_err();

    assert!(matches!(
        err,
        ServiceError::InvalidField {
            field: FormField::PayPeriod,
            ..
        }
    ));
    assert!(stored_documents(&fx.documents).is_empty());
}

#[test]
fn failed_insert_removes_copied_document() {
    let mut repo = SqliteRepository::open_in_memory().unwrap();
    // The next generated name collides with this row.
    seed_file(&mut repo, "20210002 report.pdf");
    let mut fx = fixture_with(repo);

    let err = fx.service.upload(&form(&fx.source, "2021")).unwrap_err();

    assert!(matches!(err, ServiceError::DuplicateFilename(name) if name == "20210002 report.pdf"));
    assert!(stored_documents(&fx.documents).is_empty());
}

#[test]
fn missing_source_is_a_storage_failure_without_row() {
    let mut fx = fixture();
    let missing = fx.source.with_file_name("missing.pdf");

    let err = fx.service.upload(&form(&missing, "2021")).unwrap_err();

    assert!(matches!(err, ServiceError::StorageIoFailure(_)));
    assert!(!fx.service.repository().has_files().unwrap());
}

#[test]
fn search_distinguishes_empty_archive_from_no_match() {
    let mut fx = fixture();
    assert_eq!(fx.service.search("report").unwrap(), SearchOutcome::EmptyArchive);

    fx.service.upload(&form(&fx.source, "2021")).unwrap();

    assert_eq!(fx.service.search("nothing").unwrap(), SearchOutcome::NoMatches);
    let found = fx.service.search("Plant").unwrap();
    assert_eq!(found.filenames(), vec!["20210001 report.pdf"]);
}

#[test]
fn delete_removes_document_rows_and_associations() {
    let mut fx = fixture();
    let receipt = fx.service.upload(&form(&fx.source, "2021")).unwrap();
    fx.service.add_keyword("overtime").unwrap();
    fx.service
        .attach_keyword(&receipt.filename, "overtime")
        .unwrap();
    fx.service.attach_person(&receipt.filename, "J. Doe").unwrap();

    fx.service.delete_file(&receipt.filename).unwrap();

    assert!(stored_documents(&fx.documents).is_empty());
    assert!(fx
        .service
        .repository()
        .get_file(&receipt.filename)
        .unwrap()
        .is_none());
    // Nothing references the keyword any more.
    fx.service.delete_keyword("overtime").unwrap();

    let err = fx.service.delete_file(&receipt.filename).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotFound {
            entity: Entity::File,
            ..
        }
    ));
}

#[test]
fn delete_tolerates_missing_document() {
    let mut fx = fixture();
    let receipt = fx.service.upload(&form(&fx.source, "2021")).unwrap();
    fs::remove_file(fx.documents.join(&receipt.filename)).unwrap();

    fx.service.delete_file(&receipt.filename).unwrap();

    assert!(!fx.service.repository().has_files().unwrap());
}

#[test]
fn attach_reports_existing_association_without_duplicating() {
    let mut fx = fixture();
    let receipt = fx.service.upload(&form(&fx.source, "2021")).unwrap();
    fx.service.add_keyword("overtime").unwrap();

    let first = fx
        .service
        .attach_keyword(&receipt.filename, "overtime")
        .unwrap();
    let second = fx
        .service
        .attach_keyword(&receipt.filename, " overtime ")
        .unwrap();
    let person_first = fx.service.attach_person(&receipt.filename, "J. Doe").unwrap();
    let person_second = fx.service.attach_person(&receipt.filename, "J. Doe").unwrap();

    assert_eq!(first, AttachOutcome::Attached);
    assert_eq!(second, AttachOutcome::AlreadyPresent);
    assert_eq!(person_first, AttachOutcome::Attached);
    assert_eq!(person_second, AttachOutcome::AlreadyPresent);
    let repo = fx.service.repository();
    assert_eq!(repo.keywords_for_file(&receipt.filename).unwrap().len(), 1);
    assert_eq!(repo.persons_for_file(&receipt.filename).unwrap().len(), 1);
}

#[test]
fn details_reflect_attach_and_detach() {
    let mut fx = fixture();
    let receipt = fx.service.upload(&form(&fx.source, "2021")).unwrap();
    fx.service.add_keyword("overtime").unwrap();
    fx.service.add_keyword("safety").unwrap();
    fx.service
        .attach_keyword(&receipt.filename, "safety")
        .unwrap();
    fx.service.attach_person(&receipt.filename, "J. Doe").unwrap();

    let details = fx.service.file_details(&receipt.filename).unwrap();
    assert_eq!(details.keywords, vec!["safety".to_string()]);
    assert_eq!(details.persons, vec!["J. Doe".to_string()]);
    assert_eq!(details.available_keywords.len(), 2);

    fx.service
        .detach_keyword(&receipt.filename, "safety")
        .unwrap();
    fx.service.detach_person(&receipt.filename, "J. Doe").unwrap();
    let details = fx.service.file_details(&receipt.filename).unwrap();
    assert!(details.keywords.is_empty());
    assert!(details.persons.is_empty());
}

#[test]
fn blank_tag_input_is_rejected() {
    let mut fx = fixture();
    let receipt = fx.service.upload(&form(&fx.source, "2021")).unwrap();

    let err = fx.service.attach_person(&receipt.filename, "   ").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::ValidationIncomplete(fields) if fields == vec![FormField::Person]
    ));

    let err = fx.service.add_keyword("").unwrap_err();
    assert!(matches!(err, ServiceError::ValidationIncomplete(_)));
}

#[test]
fn update_location_rejects_blank_and_unknown_file() {
    let mut fx = fixture();
    let receipt = fx.service.upload(&form(&fx.source, "2021")).unwrap();

    fx.service
        .update_location(&receipt.filename, "Depot")
        .unwrap();
    let details = fx.service.file_details(&receipt.filename).unwrap();
    assert_eq!(details.file.location, "Depot");

    assert!(matches!(
        fx.service.update_location(&receipt.filename, " ").unwrap_err(),
        ServiceError::ValidationIncomplete(_)
    ));
    assert!(matches!(
        fx.service.update_location("missing.pdf", "Depot").unwrap_err(),
        ServiceError::NotFound { .. }
    ));
}

#[test]
fn padded_tag_names_round_trip_through_attach_and_detach() {
    let mut fx = fixture();
    let receipt = fx.service.upload(&form(&fx.source, "2021")).unwrap();

    let keyword = fx.service.add_keyword(" safety ").unwrap();
    assert_eq!(keyword.keyword, "safety");
    fx.service
        .attach_keyword(&receipt.filename, " safety ")
        .unwrap();
    fx.service
        .detach_keyword(&receipt.filename, " safety ")
        .unwrap();

    fx.service
        .attach_person(&receipt.filename, " J. Doe")
        .unwrap();
    fx.service
        .detach_person(&receipt.filename, " J. Doe")
        .unwrap();

    let details = fx.service.file_details(&receipt.filename).unwrap();
    assert!(details.keywords.is_empty());
    assert!(details.persons.is_empty());

    fx.service.delete_keyword(" safety ").unwrap();
    assert!(fx.service.list_keywords().unwrap().is_empty());
}

#[test]
fn blank_detach_and_delete_input_is_rejected() {
    let mut fx = fixture();
    let receipt = fx.service.upload(&form(&fx.source, "2021")).unwrap();

    assert!(matches!(
        fx.service.detach_keyword(&receipt.filename, " ").unwrap_err(),
        ServiceError::ValidationIncomplete(fields) if fields == vec![FormField::Keyword]
    ));
    assert!(matches!(
        fx.service.detach_person(&receipt.filename, "").unwrap_err(),
        ServiceError::ValidationIncomplete(fields) if fields == vec![FormField::Person]
    ));
    assert!(matches!(
        fx.service.delete_keyword("  ").unwrap_err(),
        ServiceError::ValidationIncomplete(_)
    ));
}
