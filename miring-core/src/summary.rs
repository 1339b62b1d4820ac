//! Section counts of a MIRING results report.
use quick_xml::{Reader, events::Event};
use serde::Serialize;

use crate::report::ValidationReport;

/// Result sections the validator may append to a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportSection {
    FatalValidationErrors,
    MiringValidationErrors,
    ValidationWarnings,
    ValidationInfo,
    FatalHmlSchemaValidationErrors,
    HmlSchemaValidationErrors,
    HmlSchemaValidationWarnings,
}

impl ReportSection {
    pub const ALL: [ReportSection; 7] = [
        ReportSection::FatalValidationErrors,
        ReportSection::MiringValidationErrors,
        ReportSection::ValidationWarnings,
        ReportSection::ValidationInfo,
        ReportSection::FatalHmlSchemaValidationErrors,
        ReportSection::HmlSchemaValidationErrors,
        ReportSection::HmlSchemaValidationWarnings,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            ReportSection::FatalValidationErrors => "fatal-validation-errors",
            ReportSection::MiringValidationErrors => "miring-validation-errors",
            ReportSection::ValidationWarnings => "validation-warnings",
            ReportSection::ValidationInfo => "validation-info",
            ReportSection::FatalHmlSchemaValidationErrors => "fatal-hml-schema-validation-errors",
            ReportSection::HmlSchemaValidationErrors => "hml-schema-validation-errors",
            ReportSection::HmlSchemaValidationWarnings => "hml-schema-validation-warnings",
        }
    }

    fn from_tag(tag: &[u8]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|section| section.tag().as_bytes() == tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ReportSummary {
    timestamp: Option<String>,
    counts: Vec<(ReportSection, usize)>,
}

impl ReportSummary {
    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    /// Entries found under `section`, zero when the section is absent.
    pub fn count(&self, section: ReportSection) -> usize {
        self.counts
            .iter()
            .filter(|(s, _)| *s == section)
            .map(|(_, n)| n)
            .sum()
    }

    /// Sections present in the report, in document order.
    pub fn sections(&self) -> &[(ReportSection, usize)] {
        &self.counts
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|(_, n)| *n == 0)
    }
}

/// Count the entries of each result section.
///
/// Reading stops at the first malformed construct; whatever was counted up
/// to that point is returned.
pub fn summarize(report: &ValidationReport) -> ReportSummary {
    let mut reader = Reader::from_str(report.text());
    let mut summary = ReportSummary::default();
    let mut depth = 0usize;
    // (index into counts, depth of the section element)
    let mut open_section: Option<(usize, usize)> = None;

    loop {
        let event = match reader.read_event() {
            Ok(Event::Eof) | Err(_) => break,
            Ok(event) => event,
        };
        match event {
            Event::Start(start) => {
                depth += 1;
                match open_section {
                    Some((index, section_depth)) if depth == section_depth + 1 => {
                        summary.counts[index].1 += 1;
                    }
                    Some(_) => {}
                    None => {
                        if start.name().as_ref() == b"miring-report" {
                            summary.timestamp = timestamp_attr(&start);
                        } else if let Some(section) = ReportSection::from_tag(start.name().as_ref())
                        {
                            summary.counts.push((section, 0));
                            open_section = Some((summary.counts.len() - 1, depth));
                        }
                    }
                }
            }
            Event::Empty(empty) => match open_section {
                Some((index, section_depth)) if depth == section_depth => {
                    summary.counts[index].1 += 1;
                }
                Some(_) => {}
                None => {
                    if empty.name().as_ref() == b"miring-report" {
                        summary.timestamp = timestamp_attr(&empty);
                    }
                }
            },
            Event::End(_) => {
                if let Some((_, section_depth)) = open_section {
                    if depth == section_depth {
                        open_section = None;
                    }
                }
                depth = depth.saturating_sub(1);
            }
            _ => {}
        }
    }
    summary
}

fn timestamp_attr(element: &quick_xml::events::BytesStart<'_>) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"timestamp")
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<miring-report timestamp="03/14/2016 09:26:53">
  <hml-compliant>true</hml-compliant>
  <miring-compliant>false</miring-compliant>
  <hmlid extension="1234" root="7654"/>
  <samples>
    <sample id="123" miring-compliant="false" hml-compliant="true"/>
  </samples>
  <miring-validation-errors>
    <miring-result miring-rule-id="1.1.b" severity="miring">
      <description>A reference database must be provided.</description>
      <solution>Add a reference-database element.</solution>
    </miring-result>
    <miring-result miring-rule-id="2.2.a" severity="miring"/>
  </miring-validation-errors>
  <validation-warnings>
    <miring-result miring-rule-id="5.1" severity="warning"/>
  </validation-warnings>
</miring-report>"#;

    #[test]
    fn counts_direct_entries_per_section() {
        let summary = summarize(&ValidationReport::from_text(REPORT));
        assert_eq!(summary.timestamp(), Some("03/14/2016 09:26:53"));
        assert_eq!(summary.count(ReportSection::MiringValidationErrors), 2);
        assert_eq!(summary.count(ReportSection::ValidationWarnings), 1);
        assert_eq!(summary.count(ReportSection::FatalValidationErrors), 0);
        assert_eq!(
            summary.sections(),
            &[
                (ReportSection::MiringValidationErrors, 2),
                (ReportSection::ValidationWarnings, 1),
            ]
        );
        assert!(!summary.is_empty());
    }

    #[test]
    fn report_without_sections_is_empty() {
        let summary = summarize(&ValidationReport::from_text(
            "<miring-report><miring-compliant>true</miring-compliant></miring-report>",
        ));
        assert!(summary.is_empty());
        assert_eq!(summary.timestamp(), None);
    }

    #[test]
    fn malformed_report_keeps_partial_counts() {
        let summary = summarize(&ValidationReport::from_text(
            "<miring-report><validation-info><miring-result/><miring-result></validation-info>",
        ));
        assert_eq!(summary.count(ReportSection::ValidationInfo), 2);
    }
}
