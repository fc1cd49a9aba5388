//! Integration test: notes writer and reader sharing one store
//!
//! Covers the in-process case (a shared `MemoryStore`) and the cross-process
//! case (two `FileStore` handles on the same file), including the periodic
//! flush and refresh cadence.

use recall::core::NOTES_SYNC_INTERVAL_MS;
use recall::notes::{load_notes, FileStore, KeyValueStore, MemoryStore, NotesReader, NotesWriter};
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

fn temp_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("recall-notes-sync-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::remove_file(&path).ok();
    path
}

fn type_text<S: KeyValueStore>(writer: &mut NotesWriter<S>, text: &str) {
    for c in text.chars() {
        writer.insert_char(c);
    }
}

#[test]
fn test_reader_sees_edits_after_next_flush_and_refresh() {
    let store = Rc::new(MemoryStore::new());
    let mut writer = NotesWriter::new(Rc::clone(&store), NOTES_SYNC_INTERVAL_MS);
    let mut reader = NotesReader::new(Rc::clone(&store), NOTES_SYNC_INTERVAL_MS);
    assert!(reader.notes().is_empty());

    writer.add_note().unwrap();
    type_text(&mut writer, "buy milk");

    // Edits are local until the writer flushes
    reader.refresh().unwrap();
    assert_eq!(reader.notes(), [String::new()]);

    assert!(!writer.tick(NOTES_SYNC_INTERVAL_MS - 1));
    assert!(writer.tick(1));
    assert!(writer.last_saved().is_some());

    assert!(!reader.tick(NOTES_SYNC_INTERVAL_MS - 1));
    assert!(reader.tick(1));
    assert_eq!(reader.notes(), ["buy milk".to_string()]);
}

#[test]
fn test_add_and_remove_save_immediately() {
    let store = Rc::new(MemoryStore::new());
    let mut writer = NotesWriter::new(Rc::clone(&store), NOTES_SYNC_INTERVAL_MS);

    writer.add_note().unwrap();
    writer.add_note().unwrap();
    assert_eq!(load_notes(&store).unwrap().len(), 2);

    assert!(writer.remove(0).unwrap());
    assert_eq!(load_notes(&store).unwrap().len(), 1);
    assert!(!writer.remove(5).unwrap());
}

#[test]
fn test_writer_resumes_saved_notes() {
    let store = Rc::new(MemoryStore::new());
    {
        let mut writer = NotesWriter::new(Rc::clone(&store), NOTES_SYNC_INTERVAL_MS);
        writer.add_note().unwrap();
        type_text(&mut writer, "first");
        writer.add_note().unwrap();
        type_text(&mut writer, "second");
        writer.flush().unwrap();
    }

    let writer = NotesWriter::new(Rc::clone(&store), NOTES_SYNC_INTERVAL_MS);
    assert_eq!(
        writer.notes(),
        ["first".to_string(), "second".to_string()]
    );
}

#[test]
fn test_file_stores_share_notes_across_handles() {
    let path = temp_path("shared.json");
    let mut writer = NotesWriter::new(FileStore::at(&path), NOTES_SYNC_INTERVAL_MS);
    let mut reader = NotesReader::new(FileStore::at(&path), NOTES_SYNC_INTERVAL_MS);
    assert!(reader.notes().is_empty());

    writer.add_note().unwrap();
    type_text(&mut writer, "line one");
    writer.insert_newline();
    type_text(&mut writer, "line two");
    writer.flush().unwrap();

    reader.refresh().unwrap();
    assert_eq!(reader.notes(), ["line one\nline two".to_string()]);
    assert!(reader.last_retrieved_text().starts_with("Last retrieved: "));
    assert!(!reader.last_retrieved_text().ends_with("never"));

    // Other keys in the same file are left alone
    let store = FileStore::at(&path);
    store.set("theme", "dark".to_string()).unwrap();
    writer.flush().unwrap();
    assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
}

#[test]
fn test_corrupt_file_is_reported_not_replaced() {
    let path = temp_path("corrupt.json");
    let mut writer = NotesWriter::new(FileStore::at(&path), NOTES_SYNC_INTERVAL_MS);
    writer.add_note().unwrap();
    type_text(&mut writer, "kept");
    writer.flush().unwrap();
    let mut reader = NotesReader::new(FileStore::at(&path), NOTES_SYNC_INTERVAL_MS);
    assert_eq!(reader.notes(), ["kept".to_string()]);

    fs::write(&path, "{ not json").unwrap();

    // The reader keeps what it last saw and says why it stopped updating
    assert!(reader.refresh().is_err());
    assert_eq!(reader.notes(), ["kept".to_string()]);
    assert!(reader.last_error().unwrap().starts_with("Read failed"));

    // A fresh reader has nothing to show but still reports the problem
    let fresh = NotesReader::new(FileStore::at(&path), NOTES_SYNC_INTERVAL_MS);
    assert!(fresh.notes().is_empty());
    assert!(fresh.last_error().is_some());

    // The writer refuses to save over a file it could not read
    assert!(writer.flush().is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
}
