//! Integration tests for tagwright-store
//!
//! These tests verify document loading, tag enumeration and staged writes.

use tagwright_domain::traits::{DocumentStore, TagSource};
use tagwright_domain::{DocumentId, DocumentKind};
use tagwright_store::{NewDocument, SqliteLibrary, StoreError, PDF_CONTENT_TYPE};

fn seeded_library() -> (SqliteLibrary, DocumentId, DocumentId) {
    let mut library = SqliteLibrary::new(":memory:").unwrap();
    let first = library
        .insert_document(
            &NewDocument::regular("AAAA0001", "Learning Agile Locomotion")
                .with_abstract("We train a humanoid to walk.")
                .with_extra("tex.ids: foo"),
        )
        .unwrap();
    let second = library
        .insert_document(&NewDocument::regular("BBBB0002", "Parkour for Quadrupeds"))
        .unwrap();
    library
        .insert_tags(&first, &["task:locomotion", "robot_type:humanoid", "to-read"])
        .unwrap();
    library
        .insert_tags(&second, &["task:locomotion", "task:parkour"])
        .unwrap();
    (library, first, second)
}

#[test]
fn test_library_initialization() {
    let library = SqliteLibrary::new(":memory:");
    assert!(library.is_ok(), "Library should initialize successfully");
}

#[test]
fn test_file_backed_library_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.sqlite");

    {
        let mut library = SqliteLibrary::new(&path).unwrap();
        let id = library
            .insert_document(&NewDocument::regular("K1", "Persisted"))
            .unwrap();
        library.add_tag(&id, "task:grasping").unwrap();
        library.commit(&id).unwrap();
    }

    let reopened = SqliteLibrary::new(&path).unwrap();
    assert_eq!(
        reopened.tags(&DocumentId::from("K1")).unwrap(),
        vec!["task:grasping"]
    );
}

#[test]
fn test_all_tags_counts_every_attachment() {
    let (library, _, _) = seeded_library();
    let tags = library.all_tags().unwrap();
    assert_eq!(tags.len(), 5);
    assert_eq!(
        tags.iter().filter(|t| t.as_str() == "task:locomotion").count(),
        2
    );
}

#[test]
fn test_fallback_enumeration_matches_all_tags() {
    let (library, _, _) = seeded_library();

    let mut via_documents = Vec::new();
    for id in library.document_ids().unwrap() {
        via_documents.extend(library.document_tags(&id).unwrap());
    }
    let mut direct = library.all_tags().unwrap();

    via_documents.sort();
    direct.sort();
    assert_eq!(via_documents, direct);
}

#[test]
fn test_context_collects_pdf_text_and_notes() {
    let (mut library, first, _) = seeded_library();
    library
        .add_attachment(&first, PDF_CONTENT_TYPE, "Full paper text")
        .unwrap();
    library
        .add_attachment(&first, "text/html", "Snapshot page")
        .unwrap();
    library.add_note(&first, "<p>Read section 3</p>").unwrap();

    let ctx = library.context(&first).unwrap().unwrap();
    assert_eq!(ctx.kind, DocumentKind::Regular);
    assert_eq!(ctx.title, "Learning Agile Locomotion");
    assert_eq!(ctx.abstract_note, "We train a humanoid to walk.");
    assert_eq!(ctx.full_texts, vec!["Full paper text"]);
    assert_eq!(ctx.notes, vec!["<p>Read section 3</p>"]);
    assert_eq!(ctx.extra, "tex.ids: foo");
}

#[test]
fn test_commit_ignores_existing_tags() {
    let (mut library, first, _) = seeded_library();

    library.add_tag(&first, "task:locomotion").unwrap();
    library.add_tag(&first, "task:walking").unwrap();
    library.commit(&first).unwrap();

    let tags = library.tags(&first).unwrap();
    assert_eq!(
        tags,
        vec![
            "task:locomotion",
            "robot_type:humanoid",
            "to-read",
            "task:walking"
        ]
    );
}

#[test]
fn test_discard_drops_staged_changes() {
    let (mut library, first, _) = seeded_library();

    library.add_tag(&first, "task:walking").unwrap();
    library.set_extra(&first, "replaced").unwrap();
    library.discard(&first);
    library.commit(&first).unwrap();

    assert!(!library.tags(&first).unwrap().contains(&"task:walking".to_string()));
    assert_eq!(library.extra(&first).unwrap(), "tex.ids: foo");
}

#[test]
fn test_invalid_tag_rejected_without_affecting_others() {
    let (mut library, first, _) = seeded_library();

    let bad = library.add_tag(&first, "task:bad\nline");
    assert!(matches!(bad, Err(StoreError::InvalidTag { .. })));
    library.add_tag(&first, "task:good").unwrap();
    library.commit(&first).unwrap();

    assert!(library.tags(&first).unwrap().contains(&"task:good".to_string()));
}

#[test]
fn test_writes_to_missing_document_fail() {
    let mut library = SqliteLibrary::new(":memory:").unwrap();
    let missing = DocumentId::from("nope");

    assert!(matches!(
        library.add_tag(&missing, "task:x"),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        library.set_extra(&missing, "x"),
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(library.extra(&missing), Err(StoreError::NotFound(_))));
}

#[test]
fn test_regular_document_ids_skip_attachments() {
    let (mut library, _, _) = seeded_library();
    library
        .insert_document(
            &NewDocument::regular("CCCC0003", "scan.pdf").with_kind(DocumentKind::Attachment),
        )
        .unwrap();

    let ids = library.regular_document_ids().unwrap();
    assert_eq!(
        ids,
        vec![DocumentId::from("AAAA0001"), DocumentId::from("BBBB0002")]
    );
    assert_eq!(library.document_ids().unwrap().len(), 3);
}
