//! Input reading for model output, summaries and snippets
//!
//! Provides consistent handling for:
//! - stdin vs. file input
//! - Non-UTF-8 input (lossy conversion)
//! - Oversized input (truncation)

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::TakeawayError;
use crate::core::model::ItemError;
use crate::core::util::truncate_string;

/// Default truncation size in bytes (1 MB); model output is far smaller
pub const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;

/// Where input text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// `None` and `-` both mean stdin
    pub fn from_arg(path: Option<&Path>) -> Self {
        match path {
            Some(p) if p != Path::new("-") => InputSource::File(p.to_path_buf()),
            _ => InputSource::Stdin,
        }
    }

    /// Human-readable label used in messages and result paths
    pub fn label(&self) -> String {
        match self {
            InputSource::Stdin => "<stdin>".to_string(),
            InputSource::File(p) => p.display().to_string(),
        }
    }
}

/// Warning codes for input reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningCode {
    /// Input was truncated due to size
    InputTruncated,
    /// Lossy encoding conversion used
    LossyConversion,
}

impl WarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningCode::InputTruncated => "INPUT_TRUNCATED",
            WarningCode::LossyConversion => "LOSSY_CONVERSION",
        }
    }
}

/// A structured warning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputWarning {
    pub code: WarningCode,
    pub message: String,
}

impl InputWarning {
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Convert for embedding in a ResultItem
    pub fn to_item_error(&self) -> ItemError {
        ItemError::new(self.code.as_str(), &self.message)
    }
}

/// Text read from an input source
#[derive(Debug, Clone)]
pub struct InputText {
    pub label: String,
    pub content: String,
    pub truncated: bool,
    pub lossy_conversion: bool,
    pub warnings: Vec<InputWarning>,
}

/// Read input text, capping at `max_bytes`
pub fn read_input_with_limit(
    source: &InputSource,
    max_bytes: usize,
) -> Result<InputText, TakeawayError> {
    let label = source.label();
    let bytes = read_bytes(source).map_err(|source| TakeawayError::InputRead {
        label: label.clone(),
        source,
    })?;

    Ok(decode(label, bytes, max_bytes))
}

/// Read input text with the default size cap
pub fn read_input(source: &InputSource) -> Result<InputText, TakeawayError> {
    read_input_with_limit(source, DEFAULT_MAX_INPUT_BYTES)
}

fn read_bytes(source: &InputSource) -> std::io::Result<Vec<u8>> {
    match source {
        InputSource::Stdin => {
            let mut buffer = Vec::new();
            std::io::stdin().read_to_end(&mut buffer)?;
            Ok(buffer)
        }
        InputSource::File(path) => fs::read(path),
    }
}

fn decode(label: String, bytes: Vec<u8>, max_bytes: usize) -> InputText {
    let mut warnings = Vec::new();

    let (content, lossy_conversion) = match String::from_utf8(bytes) {
        Ok(content) => (content, false),
        Err(err) => {
            warnings.push(InputWarning::new(
                WarningCode::LossyConversion,
                "Lossy UTF-8 conversion applied (some characters replaced)",
            ));
            (String::from_utf8_lossy(err.as_bytes()).into_owned(), true)
        }
    };

    let original_len = content.len();
    let (content, truncated) = truncate_string(&content, max_bytes);
    if truncated {
        warnings.push(InputWarning::new(
            WarningCode::InputTruncated,
            format!(
                "Input truncated from {} to {} bytes",
                original_len,
                content.len()
            ),
        ));
    }

    InputText {
        label,
        content,
        truncated,
        lossy_conversion,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_source_from_arg() {
        assert_eq!(InputSource::from_arg(None), InputSource::Stdin);
        assert_eq!(
            InputSource::from_arg(Some(Path::new("-"))),
            InputSource::Stdin
        );
        assert_eq!(
            InputSource::from_arg(Some(Path::new("out.txt"))),
            InputSource::File(PathBuf::from("out.txt"))
        );
    }

    #[test]
    fn test_read_utf8_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "- First point\n- Second point\n").unwrap();

        let input = read_input(&InputSource::File(file.path().to_path_buf())).unwrap();
        assert_eq!(input.content, "- First point\n- Second point\n");
        assert!(!input.truncated);
        assert!(!input.lossy_conversion);
        assert!(input.warnings.is_empty());
    }

    #[test]
    fn test_read_lossy_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[b'a', 0xFF, b'b']).unwrap();

        let input = read_input(&InputSource::File(file.path().to_path_buf())).unwrap();
        assert!(input.lossy_conversion);
        assert_eq!(input.content, "a\u{FFFD}b");
        assert_eq!(input.warnings[0].code, WarningCode::LossyConversion);
    }

    #[test]
    fn test_read_truncates() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "0123456789").unwrap();

        let input =
            read_input_with_limit(&InputSource::File(file.path().to_path_buf()), 4).unwrap();
        assert_eq!(input.content, "0123");
        assert!(input.truncated);
        assert_eq!(input.warnings[0].to_item_error().code, "INPUT_TRUNCATED");
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_input(&InputSource::File(PathBuf::from(
            "/definitely/not/here.txt",
        )))
        .unwrap_err();
        assert_eq!(err.code(), "INPUT_READ");
    }
}
