//! Export of the results text.
use std::io;
use std::path::{Path, PathBuf};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

pub const RESULTS_FILENAME: &str = "MiringResultsReport.xml";

/// Bytes `encodeURIComponent` leaves alone: alphanumerics and `-_.!~*'()`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A results file ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    content: String,
}

impl Download {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn filename(&self) -> &'static str {
        RESULTS_FILENAME
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// `data:` link carrying the content as percent-encoded plain text.
    pub fn href(&self) -> String {
        format!(
            "data:text/plain;charset=utf-8,{}",
            utf8_percent_encode(&self.content, URI_COMPONENT)
        )
    }

    /// Write the content to `dir/MiringResultsReport.xml`, replacing any previous file.
    ///
    /// # Errors
    /// Propagates I/O errors from writing the file.
    pub fn write_to_dir(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(RESULTS_FILENAME);
        std::fs::write(&path, self.content.as_bytes())?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use percent_encoding::percent_decode_str;

    #[test]
    fn href_matches_uri_component_encoding() {
        let download = Download::new("<a b=\"c\">it's (ok)!~*</a>\n%");
        assert_eq!(
            download.href(),
            "data:text/plain;charset=utf-8,%3Ca%20b%3D%22c%22%3Eit's%20(ok)!~*%3C%2Fa%3E%0A%25"
        );
    }

    #[test]
    fn href_round_trips_content() {
        let content = "<miring-report>\r\n  <note>µ & ü</note>\n</miring-report>";
        let download = Download::new(content);
        let href = download.href();
        let encoded = href
            .strip_prefix("data:text/plain;charset=utf-8,")
            .expect("data prefix");
        let decoded = percent_decode_str(encoded).decode_utf8().expect("utf-8");
        assert_eq!(decoded, content);
    }

    #[test]
    fn write_to_dir_uses_fixed_filename() {
        let dir = tempfile::tempdir().expect("temp dir");
        let download = Download::new("<r/>");
        let path = download.write_to_dir(dir.path()).expect("write");
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some(RESULTS_FILENAME));
        assert_eq!(std::fs::read_to_string(path).expect("read"), "<r/>");
    }
}
