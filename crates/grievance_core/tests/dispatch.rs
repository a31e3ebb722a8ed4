use grievance_core::{
    ArchiveService, AttachOutcome, ChartMode, Command, DocumentStore, Notice, NoticeLevel,
    Response, SqliteRepository, TagKind, UploadForm,
};
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn service() -> (TempDir, ArchiveService<SqliteRepository>, String) {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("report.pdf");
    fs::write(&source, b"scan").unwrap();
    let store = DocumentStore::open(dir.path().join("report_files")).unwrap();
    let repo = SqliteRepository::open_in_memory().unwrap();
    (
        dir,
        ArchiveService::new(repo, store),
        source.display().to_string(),
    )
}

fn upload(source: &str, year: &str) -> Command {
    Command::Upload(UploadForm {
        source: source.to_string(),
        location: "Plant 3".to_string(),
        year: year.to_string(),
        pay_period: "3".to_string(),
    })
}

fn attach(filename: &str, kind: TagKind, name: &str) -> Command {
    Command::Attach {
        filename: filename.to_string(),
        kind,
        name: name.to_string(),
    }
}

#[test]
fn upload_response_carries_success_notice() {
    let (_dir, mut service, source) = service();

    let response = service.dispatch(upload(&source, "2021")).unwrap();

    let Response::Uploaded(receipt) = &response else {
        panic!("unexpected response: {response:?}");
    };
    assert_eq!(receipt.filename, "20210001 report.pdf");
    let notice = Notice::for_response(&response).unwrap();
    assert_eq!(notice.level, NoticeLevel::Info);
    assert_eq!(notice.title, "Success");
    assert!(notice.message.contains("'20210001 report.pdf'"));
}

#[test]
fn search_notices_follow_outcome() {
    let (_dir, mut service, source) = service();

    let empty = service
        .dispatch(Command::Search {
            term: "x".to_string(),
        })
        .unwrap();
    assert_eq!(Notice::for_response(&empty).unwrap().message, "No data found.");

    service.dispatch(upload(&source, "2021")).unwrap();
    let missed = service
        .dispatch(Command::Search {
            term: "zzz".to_string(),
        })
        .unwrap();
    assert_eq!(
        Notice::for_response(&missed).unwrap().message,
        "No results found for searchterm 'zzz'."
    );

    let hit = service
        .dispatch(Command::Search {
            term: "Plant".to_string(),
        })
        .unwrap();
    assert!(Notice::for_response(&hit).is_none());
}

#[test]
fn duplicate_attach_yields_warning_notice() {
    let (_dir, mut service, source) = service();
    service.dispatch(upload(&source, "2021")).unwrap();
    let filename = "20210001 report.pdf";

    service
        .dispatch(attach(filename, TagKind::Person, "J. Doe"))
        .unwrap();
    let response = service
        .dispatch(attach(filename, TagKind::Person, "J. Doe"))
        .unwrap();

    assert!(matches!(
        response,
        Response::Attached {
            outcome: AttachOutcome::AlreadyPresent,
            ..
        }
    ));
    let notice = Notice::for_response(&response).unwrap();
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert_eq!(notice.title, "Person already there");
}

#[test]
fn keyword_in_use_error_maps_to_notice() {
    let (_dir, mut service, source) = service();
    service.dispatch(upload(&source, "2021")).unwrap();
    service
        .dispatch(Command::AddKeyword {
            keyword: "overtime".to_string(),
        })
        .unwrap();
    service
        .dispatch(attach("20210001 report.pdf", TagKind::Keyword, "overtime"))
        .unwrap();

    let err = service
        .dispatch(Command::DeleteKeyword {
            keyword: "overtime".to_string(),
        })
        .unwrap_err();

    assert_eq!(Notice::for_error(&err).title, "Keyword cannot be deleted");
}

#[test]
fn chart_response_serializes_for_rendering() {
    let (_dir, mut service, source) = service();
    service.dispatch(upload(&source, "2021")).unwrap();
    service.dispatch(upload(&source, "2021")).unwrap();
    for keyword in ["overtime", "safety"] {
        service
            .dispatch(Command::AddKeyword {
                keyword: keyword.to_string(),
            })
            .unwrap();
    }
    service
        .dispatch(attach("20210001 report.pdf", TagKind::Keyword, "overtime"))
        .unwrap();
    service
        .dispatch(attach("20210002 report.pdf", TagKind::Keyword, "overtime"))
        .unwrap();
    service
        .dispatch(attach("20210002 report.pdf", TagKind::Keyword, "safety"))
        .unwrap();

    let response = service
        .dispatch(Command::Chart {
            year: 2021,
            mode: ChartMode::KeywordDensity,
        })
        .unwrap();
    let json: Value = serde_json::to_value(&response).unwrap();

    assert_eq!(json["response"], "chart");
    assert_eq!(json["title"], "Keyword Density 2021");
    assert_eq!(json["style"], "pie");
    assert_eq!(json["total"], 3);
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["label"], "overtime");
    assert_eq!(entries[0]["count"], 2);
}

#[test]
fn years_and_delete_round_trip() {
    let (_dir, mut service, source) = service();
    service.dispatch(upload(&source, "2020")).unwrap();
    service.dispatch(upload(&source, "2021")).unwrap();

    let Response::Years { years } = service.dispatch(Command::ListYears).unwrap() else {
        panic!("expected years");
    };
    assert_eq!(years.into_iter().collect::<Vec<_>>(), vec![2020, 2021]);

    let response = service
        .dispatch(Command::DeleteFile {
            filename: "20200001 report.pdf".to_string(),
        })
        .unwrap();
    assert_eq!(
        Notice::for_response(&response).unwrap().message,
        "File '20200001 report.pdf' has been deleted."
    );
    let Response::Years { years } = service.dispatch(Command::ListYears).unwrap() else {
        panic!("expected years");
    };
    assert_eq!(years.into_iter().collect::<Vec<_>>(), vec![2021]);
}

#[test]
fn detach_and_delete_responses_echo_trimmed_names() {
    let (_dir, mut service, source) = service();
    service.dispatch(upload(&source, "2021")).unwrap();
    let filename = "20210001 report.pdf";
    service
        .dispatch(Command::AddKeyword {
            keyword: "overtime".to_string(),
        })
        .unwrap();
    service
        .dispatch(attach(filename, TagKind::Keyword, " overtime "))
        .unwrap();

    let detached = service
        .dispatch(Command::Detach {
            filename: filename.to_string(),
            kind: TagKind::Keyword,
            name: " overtime ".to_string(),
        })
        .unwrap();
    assert_eq!(
        detached,
        Response::Detached {
            filename: filename.to_string(),
            kind: TagKind::Keyword,
            name: "overtime".to_string(),
        }
    );

    let deleted = service
        .dispatch(Command::DeleteKeyword {
            keyword: " overtime".to_string(),
        })
        .unwrap();
    assert_eq!(
        deleted,
        Response::KeywordDeleted {
            keyword: "overtime".to_string(),
        }
    );
}
