//! Reference rewriting for the metadata buffer.
//!
//! The serializer refers to payloads by their buffers' internal placeholder
//! names. Before the bundle is persisted those references are swapped for
//! the stable file names the payloads will be written under.
//!
//! Rewriting is structural. The metadata is parsed as JSON, and only the
//! reference fields of each object entry (`URL` and `GlyphGeometriesURL`)
//! are resolved. Group names, material names and any other text are never
//! touched, even when they look like a placeholder.

use serde_json::Value;

use scenebundle_core::{ExportError, Result};

use crate::buffer::{parse_placeholder, ResourceBuffer, PLACEHOLDER_PREFIX};
use crate::bundle::BundleNaming;

/// Object entry fields that hold resource references.
const REFERENCE_KEYS: [&str; 2] = ["URL", "GlyphGeometriesURL"];

/// Outcome of a rewrite pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    /// Number of references replaced.
    pub replaced: usize,
    /// Placeholder-like strings left unchanged.
    pub unresolved: Vec<String>,
}

/// Rewrites placeholder references in the metadata buffer.
#[derive(Debug, Clone)]
pub struct ReferenceRewriter<'a> {
    naming: &'a BundleNaming,
    strict: bool,
}

impl<'a> ReferenceRewriter<'a> {
    /// Creates a rewriter producing names from `naming`.
    ///
    /// In strict mode an unresolvable placeholder fails the rewrite; otherwise
    /// it is left unchanged and logged.
    pub fn new(naming: &'a BundleNaming, strict: bool) -> Self {
        Self { naming, strict }
    }

    /// Rewrites buffer 0 of `buffers`, resolving references to buffers `1..len`.
    ///
    /// The other buffers are not touched.
    pub fn rewrite(&self, buffers: &mut [ResourceBuffer]) -> Result<RewriteReport> {
        let Some((metadata, payloads)) = buffers.split_first_mut() else {
            return Ok(RewriteReport::default());
        };
        let mut document: Value = serde_json::from_slice(metadata.bytes())?;
        let report = self.rewrite_value(&mut document, payloads.len());

        if !report.unresolved.is_empty() {
            if self.strict {
                return Err(ExportError::UnresolvedReference(report.unresolved[0].clone()));
            }
            log::warn!(
                "left {} unresolved resource references: {:?}",
                report.unresolved.len(),
                report.unresolved
            );
        }

        metadata.set_bytes(serde_json::to_vec_pretty(&document)?);
        log::debug!("rewrote {} resource references", report.replaced);
        Ok(report)
    }

    /// Rewrites placeholder references in the object entries of `document`,
    /// with `payload_count` payloads available.
    pub fn rewrite_value(&self, document: &mut Value, payload_count: usize) -> RewriteReport {
        let mut report = RewriteReport::default();
        let Some(objects) = document.get_mut("Objects").and_then(Value::as_array_mut) else {
            return report;
        };
        for entry in objects.iter_mut().filter_map(Value::as_object_mut) {
            for key in REFERENCE_KEYS {
                if let Some(Value::String(text)) = entry.get_mut(key) {
                    self.resolve(text, payload_count, &mut report);
                }
            }
        }
        report
    }

    fn resolve(&self, text: &mut String, payload_count: usize, report: &mut RewriteReport) {
        if !text.starts_with(PLACEHOLDER_PREFIX) {
            return;
        }
        match parse_placeholder(text) {
            Some(index) if (1..=payload_count).contains(&index) => {
                *text = self.naming.payload_name(index);
                report.replaced += 1;
            }
            _ => report.unresolved.push(text.clone()),
        }
    }
}
