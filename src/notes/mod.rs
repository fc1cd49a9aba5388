//! Notes: a writer that persists an ordered list of text notes and a reader
//! that polls the same list.

pub mod reader;
pub mod store;
pub mod writer;

pub use reader::NotesReader;
pub use store::{load_notes, save_notes, FileStore, KeyValueStore, MemoryStore};
pub use writer::NotesWriter;
