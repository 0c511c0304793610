// Packs client database files into an MPQ patch archive

use crate::constants;
use crate::ui;
use anyhow::Context;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// An archive opened for writing.
pub trait ArchiveWriter {
    /// Add the file at `local` under `archive_path` inside the archive.
    fn add_file(&mut self, local: &Path, archive_path: &str) -> anyhow::Result<()>;

    /// Write out and close the archive.
    fn finish(self: Box<Self>) -> anyhow::Result<()>;
}

/// Something that can create archives.
pub trait ArchiveBackend {
    fn create(&self, dest: &Path) -> anyhow::Result<Box<dyn ArchiveWriter>>;
}

/// MPQ archives through the `wow-mpq` crate.
pub struct MpqBackend;

#[cfg(feature = "mpq")]
mod mpq {
    use super::{ArchiveBackend, ArchiveWriter};
    use std::path::{Path, PathBuf};
    use wow_mpq::{ArchiveBuilder, FormatVersion};

    pub struct MpqWriter {
        dest: PathBuf,
        builder: Option<ArchiveBuilder>,
    }

    impl ArchiveBackend for super::MpqBackend {
        fn create(&self, dest: &Path) -> anyhow::Result<Box<dyn ArchiveWriter>> {
            // The 3.3.5 client reads version 1 archives
            Ok(Box::new(MpqWriter {
                dest: dest.to_path_buf(),
                builder: Some(ArchiveBuilder::new().version(FormatVersion::V1)),
            }))
        }
    }

    impl ArchiveWriter for MpqWriter {
        fn add_file(&mut self, local: &Path, archive_path: &str) -> anyhow::Result<()> {
            let data = std::fs::read(local)?;
            let builder = self
                .builder
                .take()
                .ok_or_else(|| anyhow::anyhow!("Archive already closed"))?;
            self.builder = Some(builder.add_file_data(data, archive_path));
            Ok(())
        }

        fn finish(mut self: Box<Self>) -> anyhow::Result<()> {
            let builder = self
                .builder
                .take()
                .ok_or_else(|| anyhow::anyhow!("Archive already closed"))?;
            builder.build(&self.dest)?;
            Ok(())
        }
    }
}

#[cfg(not(feature = "mpq"))]
impl ArchiveBackend for MpqBackend {
    fn create(&self, _dest: &Path) -> anyhow::Result<Box<dyn ArchiveWriter>> {
        anyhow::bail!(
            "MPQ support unavailable: this build of pslauncher was compiled without the `mpq` feature"
        )
    }
}

#[derive(Debug, Default)]
pub struct PackSummary {
    /// Archive paths that were added, in order
    pub added: Vec<String>,
    /// Files that matched but could not be added, with the reason
    pub skipped: Vec<(PathBuf, String)>,
}

/// Files in `source` (not recursive) with the `.dbc` extension, sorted by name.
pub fn collect_dbc_files(source: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(source)? {
        let path = entry?.path();
        let is_dbc = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(constants::DBC_EXTENSION));
        if path.is_file() && is_dbc {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Pack every `.dbc` file in `source` into a new archive at `dest`, each
/// under `DBFilesClient\`.
///
/// Files that fail to add are reported and skipped. Adding nothing at all is
/// an error, and in that case the archive is not written.
pub fn pack_directory(
    backend: &dyn ArchiveBackend,
    source: &Path,
    dest: &Path,
) -> anyhow::Result<PackSummary> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    if !source.is_dir() {
        anyhow::bail!("DBC directory not found: {}", source.display());
    }

    let files = collect_dbc_files(source)?;
    debug!("Found {} DBC file(s) in {}", files.len(), source.display());

    let mut writer = backend
        .create(dest)
        .with_context(|| format!("Failed to create archive {}", dest.display()))?;

    let mut summary = PackSummary::default();
    for file in files {
        let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
            warn!("Skipping non UTF-8 file name: {}", file.display());
            continue;
        };
        let archive_path = format!("{}{}", constants::DBC_ARCHIVE_PREFIX, name);

        match writer.add_file(&file, &archive_path) {
            Ok(()) => {
                ui::success(&format!("Added: {} -> {}", name, archive_path));
                summary.added.push(archive_path);
            }
            Err(e) => {
                ui::warning(&format!("Failed to add {}: {:#}", name, e));
                summary.skipped.push((file.clone(), format!("{:#}", e)));
            }
        }
    }

    if summary.added.is_empty() {
        ui::warning("No DBC files found to add");
        anyhow::bail!("No DBC files were added from {}", source.display());
    }

    writer
        .finish()
        .with_context(|| format!("Failed to write archive {}", dest.display()))?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorded {
        entries: Vec<(PathBuf, String)>,
        finished: bool,
    }

    /// Records what would be written; fails to add any file whose name
    /// contains "broken".
    #[derive(Default, Clone)]
    struct RecordingBackend {
        state: Rc<RefCell<Recorded>>,
    }

    struct RecordingWriter {
        state: Rc<RefCell<Recorded>>,
    }

    impl ArchiveBackend for RecordingBackend {
        fn create(&self, _dest: &Path) -> anyhow::Result<Box<dyn ArchiveWriter>> {
            Ok(Box::new(RecordingWriter {
                state: Rc::clone(&self.state),
            }))
        }
    }

    impl ArchiveWriter for RecordingWriter {
        fn add_file(&mut self, local: &Path, archive_path: &str) -> anyhow::Result<()> {
            if archive_path.contains("broken") {
                anyhow::bail!("simulated write failure");
            }
            self.state
                .borrow_mut()
                .entries
                .push((local.to_path_buf(), archive_path.to_string()));
            Ok(())
        }

        fn finish(self: Box<Self>) -> anyhow::Result<()> {
            self.state.borrow_mut().finished = true;
            Ok(())
        }
    }

    struct UnavailableBackend;

    impl ArchiveBackend for UnavailableBackend {
        fn create(&self, _dest: &Path) -> anyhow::Result<Box<dyn ArchiveWriter>> {
            anyhow::bail!("archive library missing")
        }
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), name.as_bytes()).unwrap();
    }

    #[test]
    fn test_adds_only_matching_files() {
        let src = TempDir::new().unwrap();
        for name in ["Spell.dbc", "Item.dbc", "ItemDisplayInfo.DBC"] {
            touch(src.path(), name);
        }
        for name in ["readme.txt", "Spell.dbc.csv", "notes"] {
            touch(src.path(), name);
        }
        fs::create_dir(src.path().join("nested.dbc")).unwrap();

        let out = TempDir::new().unwrap();
        let backend = RecordingBackend::default();
        let summary =
            pack_directory(&backend, src.path(), &out.path().join("patch-Z.MPQ")).unwrap();

        assert_eq!(
            summary.added,
            vec![
                "DBFilesClient\\Item.dbc",
                "DBFilesClient\\ItemDisplayInfo.DBC",
                "DBFilesClient\\Spell.dbc",
            ]
        );
        let state = backend.state.borrow();
        assert_eq!(state.entries.len(), 3);
        assert!(state.finished);
    }

    #[test]
    fn test_empty_directory_fails() {
        let src = TempDir::new().unwrap();
        touch(src.path(), "readme.txt");
        let out = TempDir::new().unwrap();
        let backend = RecordingBackend::default();

        let result = pack_directory(&backend, src.path(), &out.path().join("patch-Z.MPQ"));

        assert!(result.is_err());
        let state = backend.state.borrow();
        assert!(state.entries.is_empty());
        assert!(!state.finished);
    }

    #[test]
    fn test_failed_file_is_skipped() {
        let src = TempDir::new().unwrap();
        touch(src.path(), "broken.dbc");
        touch(src.path(), "Talent.dbc");
        let out = TempDir::new().unwrap();
        let backend = RecordingBackend::default();

        let summary =
            pack_directory(&backend, src.path(), &out.path().join("patch-Z.MPQ")).unwrap();

        assert_eq!(summary.added, vec!["DBFilesClient\\Talent.dbc"]);
        assert_eq!(summary.skipped.len(), 1);
        assert!(summary.skipped[0].0.ends_with("broken.dbc"));
    }

    #[test]
    fn test_missing_source_dir_fails() {
        let out = TempDir::new().unwrap();
        let backend = RecordingBackend::default();
        let result = pack_directory(
            &backend,
            &out.path().join("does-not-exist"),
            &out.path().join("patch-Z.MPQ"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_creates_output_parent_dirs() {
        let src = TempDir::new().unwrap();
        touch(src.path(), "Spell.dbc");
        let out = TempDir::new().unwrap();
        let dest = out.path().join("patches").join("latest").join("patch-Z.MPQ");

        pack_directory(&RecordingBackend::default(), src.path(), &dest).unwrap();

        assert!(dest.parent().unwrap().is_dir());
    }

    #[test]
    fn test_unavailable_backend_fails_immediately() {
        let src = TempDir::new().unwrap();
        touch(src.path(), "Spell.dbc");
        let out = TempDir::new().unwrap();

        let err = pack_directory(&UnavailableBackend, src.path(), &out.path().join("patch-Z.MPQ"))
            .unwrap_err();
        assert!(format!("{:#}", err).contains("archive library missing"));
    }

    #[cfg(feature = "mpq")]
    #[test]
    fn test_mpq_backend_writes_archive() {
        let src = TempDir::new().unwrap();
        touch(src.path(), "Spell.dbc");
        touch(src.path(), "Item.dbc");
        let out = TempDir::new().unwrap();
        let dest = out.path().join("patch-Z.MPQ");

        let summary = pack_directory(&MpqBackend, src.path(), &dest).unwrap();

        assert_eq!(summary.added.len(), 2);
        let bytes = fs::read(&dest).unwrap();
        assert_eq!(&bytes[..4], b"MPQ\x1a");
    }
}
