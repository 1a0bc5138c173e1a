//! # File Staging
//!
//! Files the user picked in the upload panel but has not submitted anywhere.
//!
//! Each picker slot gets an id from a counter that only ever grows, so a slot
//! opened after a removal never reuses an old id. A staged file carries the id
//! of the slot it was chosen in.
//!
//! ```text
//! add_picker_slot() ──► slot 1 ──on_file_chosen(1, Some(f))──► staged [1]
//! add_picker_slot() ──► slot 2 ──on_file_chosen(2, None)─────► (no change)
//! remove(1)         ─────────────────────────────────────────► staged []
//! add_picker_slot() ──► slot 3   (never 1 or 2 again)
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

/// Extensions the upload panel accepts when nothing is configured.
pub const DEFAULT_ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

pub type SlotId = u32;

/// Opaque handle to a user-selected file. The staging list never reads the contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl FileHandle {
    /// Builds a handle from a path on disk. Fails if the path is missing or not a regular file.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let metadata = fs::metadata(&path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            path,
            name,
            size: metadata.len(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub id: SlotId,
    pub file: FileHandle,
}

#[derive(Debug, Default)]
pub struct FileStagingList {
    /// Insertion order; displayed reversed.
    staged: Vec<StagedFile>,
    /// Picker slots still waiting for a choice.
    open_slots: Vec<SlotId>,
    last_slot_id: SlotId,
}

impl FileStagingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a fresh picker slot and returns its id. Does not stage anything.
    pub fn add_picker_slot(&mut self) -> SlotId {
        self.last_slot_id += 1;
        self.open_slots.push(self.last_slot_id);
        debug!("Opened picker slot {}", self.last_slot_id);
        self.last_slot_id
    }

    /// Records the outcome of a picker slot. `None` means the picker was cancelled.
    ///
    /// Choosing again in a slot that already holds a file replaces that file.
    pub fn on_file_chosen(&mut self, slot: SlotId, file: Option<FileHandle>) {
        let Some(file) = file else {
            return;
        };
        debug!("Staging {} in slot {}", file.name, slot);
        self.open_slots.retain(|&s| s != slot);
        self.staged.retain(|s| s.id != slot);
        self.staged.push(StagedFile { id: slot, file });
    }

    /// Drops the staged file (or the empty picker slot) with this id. Unknown ids are ignored.
    pub fn remove(&mut self, id: SlotId) {
        self.staged.retain(|s| s.id != id);
        self.open_slots.retain(|&s| s != id);
    }

    /// Clears staged files and open slots. The id counter keeps counting.
    pub fn reset(&mut self) {
        self.staged.clear();
        self.open_slots.clear();
    }

    /// Staged files, most recently added first.
    pub fn staged(&self) -> impl Iterator<Item = &StagedFile> {
        self.staged.iter().rev()
    }

    pub fn open_slots(&self) -> &[SlotId] {
        &self.open_slots
    }

    pub fn len(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }
}

/// Whether `path` has one of `extensions` (case-insensitive, without the dot).
pub fn is_accepted(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
}

/// Human-readable file size ("912 B", "1.4 KB", "3.0 MB").
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn handle(name: &str) -> FileHandle {
        FileHandle {
            path: PathBuf::from(format!("/tmp/{name}")),
            name: name.to_string(),
            size: 10,
        }
    }

    fn staged_ids(list: &FileStagingList) -> Vec<SlotId> {
        list.staged().map(|s| s.id).collect()
    }

    #[test]
    fn picker_slots_get_distinct_increasing_ids() {
        let mut list = FileStagingList::new();
        let a = list.add_picker_slot();
        let b = list.add_picker_slot();
        assert_ne!(a, b);
        assert_eq!(b, a + 1);
        assert!(list.is_empty(), "opening a slot must not stage anything");
        assert_eq!(list.open_slots(), &[a, b]);
    }

    #[test]
    fn cancelled_picker_is_noop() {
        let mut list = FileStagingList::new();
        let slot = list.add_picker_slot();
        list.on_file_chosen(slot, None);
        assert!(list.is_empty());
        assert_eq!(list.open_slots(), &[slot]);
    }

    #[test]
    fn removing_one_keeps_the_other_and_its_id() {
        let mut list = FileStagingList::new();
        let a = list.add_picker_slot();
        let b = list.add_picker_slot();
        list.on_file_chosen(a, Some(handle("a.pdf")));
        list.on_file_chosen(b, Some(handle("b.pdf")));

        list.remove(a);

        let remaining: Vec<_> = list.staged().collect();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, b);
        assert_eq!(remaining[0].file.name, "b.pdf");
    }

    #[test]
    fn remove_is_idempotent() {
        let mut list = FileStagingList::new();
        let a = list.add_picker_slot();
        let b = list.add_picker_slot();
        list.on_file_chosen(a, Some(handle("a.pdf")));
        list.on_file_chosen(b, Some(handle("b.pdf")));

        list.remove(a);
        let after_first = staged_ids(&list);
        list.remove(a);
        assert_eq!(staged_ids(&list), after_first);
    }

    #[test]
    fn staged_files_listed_most_recent_first() {
        let mut list = FileStagingList::new();
        for name in ["one.pdf", "two.doc", "three.docx"] {
            let slot = list.add_picker_slot();
            list.on_file_chosen(slot, Some(handle(name)));
        }
        let names: Vec<_> = list.staged().map(|s| s.file.name.as_str()).collect();
        assert_eq!(names, vec!["three.docx", "two.doc", "one.pdf"]);
    }

    #[test]
    fn ids_never_reused_after_remove_or_reset() {
        let mut list = FileStagingList::new();
        let a = list.add_picker_slot();
        list.on_file_chosen(a, Some(handle("a.pdf")));
        list.remove(a);
        let b = list.add_picker_slot();
        assert!(b > a);

        list.reset();
        assert!(list.is_empty());
        assert!(list.open_slots().is_empty());
        assert!(list.add_picker_slot() > b);
    }

    #[test]
    fn remove_closes_an_empty_slot() {
        let mut list = FileStagingList::new();
        let a = list.add_picker_slot();
        let b = list.add_picker_slot();
        list.remove(a);
        assert_eq!(list.open_slots(), &[b]);
    }

    #[test]
    fn choosing_again_in_same_slot_replaces_file() {
        let mut list = FileStagingList::new();
        let slot = list.add_picker_slot();
        list.on_file_chosen(slot, Some(handle("old.pdf")));
        list.on_file_chosen(slot, Some(handle("new.pdf")));
        assert_eq!(list.len(), 1);
        assert_eq!(list.staged().next().unwrap().file.name, "new.pdf");
    }

    #[test]
    fn accepted_extensions_are_case_insensitive() {
        let allowed: Vec<String> = DEFAULT_ACCEPTED_EXTENSIONS.iter().map(|s| s.to_string()).collect();
        assert!(is_accepted(Path::new("report.PDF"), &allowed));
        assert!(is_accepted(Path::new("notes.docx"), &allowed));
        assert!(!is_accepted(Path::new("image.png"), &allowed));
        assert!(!is_accepted(Path::new("README"), &allowed));
    }

    #[test]
    fn file_handle_reads_name_and_size() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.7").unwrap();

        let handle = FileHandle::open(file.path()).unwrap();
        assert_eq!(handle.size, 8);
        assert!(handle.name.ends_with(".pdf"));
    }

    #[test]
    fn file_handle_rejects_directories_and_missing_paths() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileHandle::open(dir.path()).is_err());
        assert!(FileHandle::open(dir.path().join("missing.pdf")).is_err());
    }

    #[test]
    fn format_size_units() {
        assert_eq!(format_size(912), "912 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
