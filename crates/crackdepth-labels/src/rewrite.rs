use std::ops::Range;
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::error::LabelError;

const OBJECT: &[u8] = b"object";
const NAME: &[u8] = b"name";

/// The label to look for and its replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameConfig {
    /// Label text to replace, matched exactly.
    pub old: String,
    /// Replacement label text.
    pub new: String,
}

impl RenameConfig {
    /// Creates a new `RenameConfig`.
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }
}

/// The result of rewriting a single document in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// The rewritten document.
    pub text: String,
    /// Number of labels replaced.
    pub replaced: usize,
}

/// Totals of a directory run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenameSummary {
    /// Annotation files visited.
    pub files: usize,
    /// Annotation files written back.
    pub changed: usize,
    /// Labels replaced over all files.
    pub replaced: usize,
}

// Finds the byte ranges of the `object/name` texts equal to `old`.
fn matching_spans(xml: &str, old: &str) -> Result<Vec<Range<usize>>, LabelError> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut object_has_name = false;
    let mut spans = Vec::new();

    loop {
        let event = reader.read_event()?;
        match event {
            Event::Start(e) => {
                let name = e.name().as_ref().to_vec();
                let in_object = stack.len() == 2 && stack[1] == OBJECT;

                if stack.len() == 1 && name == OBJECT {
                    object_has_name = false;
                } else if in_object && name == NAME && !object_has_name {
                    object_has_name = true;

                    // the label is the text up to the first markup after the start tag
                    let start = reader.buffer_position() as usize;
                    let len = xml[start..].find('<').unwrap_or(xml.len() - start);
                    let raw = &xml[start..start + len];

                    if quick_xml::escape::unescape(raw)? == old {
                        spans.push(start..start + len);
                    }
                }

                stack.push(name);
            }
            Event::Empty(e) => {
                let in_object = stack.len() == 2 && stack[1] == OBJECT;
                if in_object && e.name().as_ref() == NAME {
                    object_has_name = true;
                }
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(LabelError::UnclosedElement(
            String::from_utf8_lossy(open).into_owned(),
        ));
    }

    Ok(spans)
}

/// Rename the `object/name` labels equal to `old` in an XML document.
///
/// Everything but the matched label texts is kept byte for byte.
///
/// # Examples
///
/// ```
/// use crackdepth_labels::rename_labels;
///
/// let xml = "<annotation><object><name>weironghe</name></object></annotation>";
/// let rewrite = rename_labels(xml, "weironghe", "other").unwrap();
///
/// assert_eq!(rewrite.replaced, 1);
/// assert_eq!(rewrite.text, "<annotation><object><name>other</name></object></annotation>");
/// ```
pub fn rename_labels(xml: &str, old: &str, new: &str) -> Result<Rewrite, LabelError> {
    let spans = matching_spans(xml, old)?;

    let replacement = quick_xml::escape::escape(new);
    let mut text = String::with_capacity(xml.len());
    let mut last = 0;
    for span in &spans {
        text.push_str(&xml[last..span.start]);
        text.push_str(&replacement);
        last = span.end;
    }
    text.push_str(&xml[last..]);

    Ok(Rewrite {
        text,
        replaced: spans.len(),
    })
}

/// Rename the matching labels of an annotation file and save it in place.
///
/// The file is left untouched when nothing matches.
///
/// # Returns
///
/// The number of labels replaced.
pub fn rename_labels_in_file(
    path: impl AsRef<Path>,
    config: &RenameConfig,
) -> Result<usize, LabelError> {
    let path = path.as_ref();

    let xml =
        std::fs::read_to_string(path).map_err(|e| LabelError::Io(path.to_path_buf(), e))?;

    let rewrite =
        rename_labels(&xml, &config.old, &config.new).map_err(|e| LabelError::Document {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    if rewrite.replaced > 0 {
        for _ in 0..rewrite.replaced {
            log::info!("{}: {} -> {}", path.display(), config.old, config.new);
        }
        std::fs::write(path, rewrite.text).map_err(|e| LabelError::Io(path.to_path_buf(), e))?;
    }

    Ok(rewrite.replaced)
}

// Lists the `.xml` files directly inside `dir`, sorted by path.
fn annotation_files(dir: &Path) -> Result<Vec<PathBuf>, LabelError> {
    let entries = std::fs::read_dir(dir).map_err(|e| LabelError::Io(dir.to_path_buf(), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| LabelError::Io(dir.to_path_buf(), e))?
            .path();
        let is_xml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
        if is_xml && path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

/// Rename the matching labels of every annotation file in a directory.
///
/// Files are processed one at a time in path order. The first failure stops
/// the run.
pub fn rename_labels_in_dir(
    dir: impl AsRef<Path>,
    config: &RenameConfig,
) -> Result<RenameSummary, LabelError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(LabelError::DirectoryDoesNotExist(dir.to_path_buf()));
    }

    let mut summary = RenameSummary::default();
    for path in annotation_files(dir)? {
        let replaced = rename_labels_in_file(&path, config)?;
        summary.files += 1;
        summary.replaced += replaced;
        if replaced > 0 {
            summary.changed += 1;
        }
    }

    log::debug!("{summary:?}");

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<annotation verified="no">
	<!-- exported by labelImg -->
	<folder>VOC2007</folder>
	<filename>crack_001.jpg</filename>
	<object>
		<name>weironghe</name>
		<pose>Unspecified</pose>
		<bndbox><xmin>12</xmin><ymin>40</ymin><xmax>88</xmax><ymax>120</ymax></bndbox>
	</object>
	<object>
		<name>crack</name>
		<truncated>0</truncated>
	</object>
	<object><name>weironghe</name></object>
</annotation>
"#;

    #[test]
    fn renames_matching_objects_only() -> Result<(), LabelError> {
        let rewrite = rename_labels(DOC, "weironghe", "other")?;
        assert_eq!(rewrite.replaced, 2);
        assert_eq!(rewrite.text, DOC.replace("<name>weironghe</name>", "<name>other</name>"));
        assert!(rewrite.text.contains("<name>crack</name>"));
        Ok(())
    }

    #[test]
    fn no_match_is_identity() -> Result<(), LabelError> {
        let rewrite = rename_labels(DOC, "Weironghe", "other")?;
        assert_eq!(rewrite.replaced, 0);
        assert_eq!(rewrite.text, DOC);
        Ok(())
    }

    #[test]
    fn rewriting_is_idempotent() -> Result<(), LabelError> {
        let once = rename_labels(DOC, "weironghe", "other")?;
        let twice = rename_labels(&once.text, "weironghe", "other")?;
        assert_eq!(twice.replaced, 0);
        assert_eq!(twice.text, once.text);
        Ok(())
    }

    #[test]
    fn only_first_name_of_object() -> Result<(), LabelError> {
        let xml = "<a><object><name>x</name><name>x</name></object></a>";
        let rewrite = rename_labels(xml, "x", "y")?;
        assert_eq!(rewrite.text, "<a><object><name>y</name><name>x</name></object></a>");

        // an empty first name hides the next one
        let xml = "<a><object><name/><name>x</name></object></a>";
        assert_eq!(rename_labels(xml, "x", "y")?.replaced, 0);
        Ok(())
    }

    #[test]
    fn ignores_names_outside_objects() -> Result<(), LabelError> {
        let xml = "<a><name>x</name><object><part><name>x</name></part></object>\
                   <group><object><name>x</name></object></group></a>";
        let rewrite = rename_labels(xml, "x", "y")?;
        assert_eq!(rewrite.replaced, 0);
        assert_eq!(rewrite.text, xml);
        Ok(())
    }

    #[test]
    fn exact_text_match() -> Result<(), LabelError> {
        let xml = "<a><object><name> x </name></object><object><name>xx</name></object></a>";
        assert_eq!(rename_labels(xml, "x", "y")?.replaced, 0);
        Ok(())
    }

    #[test]
    fn escaped_labels() -> Result<(), LabelError> {
        let xml = "<a><object><name>a&amp;b</name></object></a>";
        let rewrite = rename_labels(xml, "a&b", "c<d")?;
        assert_eq!(rewrite.text, "<a><object><name>c&lt;d</name></object></a>");
        Ok(())
    }

    #[test]
    fn malformed_document() {
        let xml = "<a><object><name>x</name></obj></a>";
        assert!(rename_labels(xml, "x", "y").is_err());

        let xml = "<a><object><name>x</name></object>";
        assert!(rename_labels(xml, "x", "y").is_err());
    }
}
