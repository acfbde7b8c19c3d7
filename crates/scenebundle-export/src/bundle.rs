//! Bundle naming, the in-memory bundle, and the sinks it is written to.
//!
//! Every file of a bundle shares a prefix:
//! `{prefix}_metadata.{ext}`, `{prefix}_{k}.{ext}` for payload `k`,
//! `{prefix}_glyph_{k}.{ext}` for the glyph mesh of payload `k`, and
//! `{prefix}_view.{ext}`. The view is always written last.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use scenebundle_core::{ExportError, Result};

/// Deterministic file names for one bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleNaming {
    prefix: String,
    extension: String,
}

impl BundleNaming {
    /// Creates a naming scheme.
    ///
    /// The prefix must be non-empty and usable as a file name stem; a leading
    /// dot on the extension is ignored.
    pub fn new(prefix: impl Into<String>, extension: impl AsRef<str>) -> Result<Self> {
        let prefix = prefix.into();
        let extension = extension.as_ref().trim_start_matches('.').to_string();
        let bad_component =
            |s: &str| s.is_empty() || s == "." || s == ".." || s.contains(['/', '\\', '\0']);
        if bad_component(&prefix) {
            return Err(ExportError::InvalidPrefix(prefix));
        }
        if bad_component(&extension) {
            return Err(ExportError::InvalidPrefix(format!("{prefix}.{extension}")));
        }
        Ok(Self { prefix, extension })
    }

    /// Returns the prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the extension.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Name of the metadata file.
    #[must_use]
    pub fn metadata_name(&self) -> String {
        format!("{}_metadata.{}", self.prefix, self.extension)
    }

    /// Name of payload file `k` (starting at 1).
    #[must_use]
    pub fn payload_name(&self, k: usize) -> String {
        format!("{}_{k}.{}", self.prefix, self.extension)
    }

    /// Name of the glyph mesh file for payload `k`.
    #[must_use]
    pub fn glyph_geometry_name(&self, k: usize) -> String {
        format!("{}_glyph_{k}.{}", self.prefix, self.extension)
    }

    /// Name of the view file.
    #[must_use]
    pub fn view_name(&self) -> String {
        format!("{}_view.{}", self.prefix, self.extension)
    }

    /// Name of the file holding resource buffer `index`.
    #[must_use]
    pub fn buffer_name(&self, index: usize) -> String {
        if index == 0 {
            self.metadata_name()
        } else {
            self.payload_name(index)
        }
    }
}

/// One named file of a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleFile {
    /// File name.
    pub name: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl BundleFile {
    /// Returns the contents as UTF-8 text.
    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.bytes)
            .map_err(|e| ExportError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }

    /// Parses the contents as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_slice(&self.bytes)?)
    }
}

/// The files produced by one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    /// The metadata file.
    pub metadata: BundleFile,
    /// Payload files, in payload order.
    pub payloads: Vec<BundleFile>,
    /// Glyph mesh files, in payload order.
    pub glyph_geometries: Vec<BundleFile>,
    /// The view file.
    pub view: BundleFile,
}

impl Bundle {
    /// Returns all files in write order: metadata, payloads, glyph meshes, view.
    pub fn files(&self) -> impl Iterator<Item = &BundleFile> {
        std::iter::once(&self.metadata)
            .chain(self.payloads.iter())
            .chain(self.glyph_geometries.iter())
            .chain(std::iter::once(&self.view))
    }

    /// Returns the file names in write order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.files().map(|f| f.name.as_str()).collect()
    }

    /// Finds a file by name.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&BundleFile> {
        self.files().find(|f| f.name == name)
    }

    /// Returns the total number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.payloads.len() + self.glyph_geometries.len() + 2
    }

    /// Always false; a bundle holds at least metadata and view.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Writes every file to `sink`, view last.
    pub fn write_to(&self, sink: &mut dyn BundleSink) -> Result<()> {
        self.write_buffers(sink)?;
        self.write_view(sink)
    }

    /// Writes the metadata, payload and glyph mesh files.
    pub fn write_buffers(&self, sink: &mut dyn BundleSink) -> Result<()> {
        sink.write_file(&self.metadata.name, &self.metadata.bytes)?;
        for file in self.payloads.iter().chain(&self.glyph_geometries) {
            sink.write_file(&file.name, &file.bytes)?;
        }
        Ok(())
    }

    /// Writes the view file.
    pub fn write_view(&self, sink: &mut dyn BundleSink) -> Result<()> {
        sink.write_file(&self.view.name, &self.view.bytes)
    }
}

/// A destination for bundle files.
pub trait BundleSink {
    /// Creates or truncates `name` and writes `bytes` to it.
    fn write_file(&mut self, name: &str, bytes: &[u8]) -> Result<()>;
}

/// Writes bundle files into a directory.
///
/// Files are created or truncated in place; a failure part way through
/// leaves the files written so far.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Creates a sink for `dir`, creating the directory if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Returns the output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl BundleSink for DirectorySink {
    fn write_file(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.dir.join(name);
        std::fs::write(&path, bytes)?;
        log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

/// Collects bundle files in memory, remembering write order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: BTreeMap<String, Vec<u8>>,
    order: Vec<String>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the contents of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(Vec::as_slice)
    }

    /// Returns the names in the order they were first written.
    #[must_use]
    pub fn write_order(&self) -> &[String] {
        &self.order
    }

    /// Returns the number of distinct files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl BundleSink for MemorySink {
    fn write_file(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        if self.files.insert(name.to_string(), bytes.to_vec()).is_none() {
            self.order.push(name.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, text: &str) -> BundleFile {
        BundleFile {
            name: name.into(),
            bytes: text.as_bytes().to_vec(),
        }
    }

    fn sample_bundle() -> Bundle {
        Bundle {
            metadata: file("Test_metadata.json", "{}"),
            payloads: vec![file("Test_1.json", "[1]"), file("Test_2.json", "[2]")],
            glyph_geometries: vec![file("Test_glyph_2.json", "{}")],
            view: file("Test_view.json", "{}"),
        }
    }

    #[test]
    fn test_naming() {
        let naming = BundleNaming::new("Test", "json").unwrap();
        assert_eq!(naming.metadata_name(), "Test_metadata.json");
        assert_eq!(naming.payload_name(3), "Test_3.json");
        assert_eq!(naming.view_name(), "Test_view.json");
        assert_eq!(naming.glyph_geometry_name(2), "Test_glyph_2.json");
        assert_eq!(naming.buffer_name(0), "Test_metadata.json");
        assert_eq!(naming.buffer_name(1), "Test_1.json");
    }

    #[test]
    fn test_naming_strips_dot() {
        let naming = BundleNaming::new("heart", ".json").unwrap();
        assert_eq!(naming.view_name(), "heart_view.json");
    }

    #[test]
    fn test_invalid_prefix() {
        for prefix in ["", ".", "..", "a/b", "a\\b"] {
            assert!(
                matches!(BundleNaming::new(prefix, "json"), Err(ExportError::InvalidPrefix(_))),
                "prefix {prefix:?} accepted"
            );
        }
        assert!(BundleNaming::new("ok", "").is_err());
    }

    #[test]
    fn test_bundle_order() {
        let bundle = sample_bundle();
        assert_eq!(
            bundle.names(),
            vec![
                "Test_metadata.json",
                "Test_1.json",
                "Test_2.json",
                "Test_glyph_2.json",
                "Test_view.json"
            ]
        );
        assert_eq!(bundle.len(), 5);
        assert_eq!(bundle.file("Test_2.json").unwrap().text().unwrap(), "[2]");
    }

    #[test]
    fn test_memory_sink_order() {
        let bundle = sample_bundle();
        let mut sink = MemorySink::new();
        bundle.write_to(&mut sink).unwrap();
        assert_eq!(sink.len(), 5);
        assert_eq!(sink.get("Test_glyph_2.json"), Some(&b"{}"[..]));
        assert_eq!(sink.write_order().last().unwrap(), "Test_view.json");
        assert_eq!(sink.get("Test_1.json"), Some(&b"[1]"[..]));
    }

    #[test]
    fn test_directory_sink() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("html");
        let mut sink = DirectorySink::new(&out).unwrap();
        sample_bundle().write_to(&mut sink).unwrap();
        let text = std::fs::read_to_string(out.join("Test_2.json")).unwrap();
        assert_eq!(text, "[2]");

        // Rewriting truncates
        sink.write_file("Test_2.json", b"x").unwrap();
        assert_eq!(std::fs::read_to_string(out.join("Test_2.json")).unwrap(), "x");
    }
}
