//! Validation reports, verdict extraction and indicator projection.
//!
//! The validator answers with an XML report that carries two verdict
//! elements, `<miring-compliant>` and `<hml-compliant>`. Only the raw text of
//! the first element with each name is looked at; everything else in the
//! report is opaque here (see [`crate::summary`] for the informational
//! section counts).
use std::fmt;

use percent_encoding::percent_decode_str;
use quick_xml::{Reader, events::Event};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const MIRING_COMPLIANT_TAG: &str = "miring-compliant";
pub const HML_COMPLIANT_TAG: &str = "hml-compliant";

/// Raw report text as returned by the validator, after percent-decoding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationReport {
    text: String,
}

impl ValidationReport {
    /// Wrap a response body, decoding percent-escaped sequences.
    ///
    /// Bodies whose escapes do not decode to UTF-8 are kept unchanged.
    pub fn from_response_body(body: &str) -> Self {
        let text = match percent_decode_str(body).decode_utf8() {
            Ok(decoded) => decoded.into_owned(),
            Err(e) => {
                warn!(error = %e, "report body is not valid percent-encoded UTF-8, keeping it verbatim");
                body.to_string()
            }
        };
        Self { text }
    }

    /// Wrap text that is already decoded.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn miring_token(&self) -> Option<String> {
        extract_element_text(&self.text, MIRING_COMPLIANT_TAG)
    }

    pub fn hml_token(&self) -> Option<String> {
        extract_element_text(&self.text, HML_COMPLIANT_TAG)
    }
}

/// Raw text content of the first element named `tag`.
///
/// Text is neither trimmed nor unescaped, so `" true "` or `tr&#117;e` stay
/// distinct from `true`. A self-closing element yields an empty string.
/// Returns `None` when no such element appears before the end of input or
/// before the reader hits malformed markup.
pub fn extract_element_text(xml: &str, tag: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) if start.name().as_ref() == tag.as_bytes() => {
                return collect_text_until_end(&mut reader, tag);
            }
            Ok(Event::Empty(empty)) if empty.name().as_ref() == tag.as_bytes() => {
                return Some(String::new());
            }
            Ok(Event::Eof) | Err(_) => return None,
            Ok(_) => {}
        }
    }
}

fn collect_text_until_end(reader: &mut Reader<&[u8]>, tag: &str) -> Option<String> {
    let mut value = String::new();
    loop {
        match reader.read_event() {
            Ok(Event::Text(text)) => value.push_str(&String::from_utf8_lossy(&text)),
            Ok(Event::CData(data)) => value.push_str(&String::from_utf8_lossy(&data)),
            Ok(Event::End(end)) if end.name().as_ref() == tag.as_bytes() => return Some(value),
            Ok(Event::Eof) | Err(_) => return None,
            Ok(_) => {}
        }
    }
}

/// MIRING compliance verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MiringVerdict {
    Compliant,
    NonCompliant,
    Rejected,
    CompliantWithWarnings,
}

impl MiringVerdict {
    /// Map an exact report token. Anything outside the accepted set is `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "true" => Some(MiringVerdict::Compliant),
            "false" => Some(MiringVerdict::NonCompliant),
            "reject" => Some(MiringVerdict::Rejected),
            "warnings" => Some(MiringVerdict::CompliantWithWarnings),
            _ => None,
        }
    }

    pub fn as_token(&self) -> &'static str {
        match self {
            MiringVerdict::Compliant => "true",
            MiringVerdict::NonCompliant => "false",
            MiringVerdict::Rejected => "reject",
            MiringVerdict::CompliantWithWarnings => "warnings",
        }
    }

    fn indicator(&self) -> Indicator {
        match self {
            MiringVerdict::Compliant => Indicator::GreenCheck,
            MiringVerdict::NonCompliant => Indicator::RedX,
            MiringVerdict::Rejected => Indicator::Reject,
            MiringVerdict::CompliantWithWarnings => Indicator::YellowCheck,
        }
    }
}

/// HML compliance verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HmlVerdict {
    Compliant,
    NonCompliant,
    Rejected,
}

impl HmlVerdict {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "true" => Some(HmlVerdict::Compliant),
            "false" => Some(HmlVerdict::NonCompliant),
            "reject" => Some(HmlVerdict::Rejected),
            _ => None,
        }
    }

    pub fn as_token(&self) -> &'static str {
        match self {
            HmlVerdict::Compliant => "true",
            HmlVerdict::NonCompliant => "false",
            HmlVerdict::Rejected => "reject",
        }
    }
}

/// Notices raised while reading verdicts out of a report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum VerdictAlert {
    /// `token` is `None` when the element is missing altogether.
    UnrecognizedMiring { token: Option<String> },
    UnrecognizedHml { token: Option<String> },
    HmlRejected,
}

impl fmt::Display for VerdictAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerdictAlert::UnrecognizedMiring { .. } => {
                f.write_str("Error determining MIRING Compliance.")
            }
            VerdictAlert::UnrecognizedHml { .. } => f.write_str("Error determining HML Compliance."),
            VerdictAlert::HmlRejected => {
                f.write_str("HML Rejected, Please Check Below For Reason")
            }
        }
    }
}

/// Verdicts derived from one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictState {
    miring: MiringVerdict,
    hml: HmlVerdict,
    alerts: Vec<VerdictAlert>,
}

impl VerdictState {
    pub fn miring(&self) -> MiringVerdict {
        self.miring
    }

    pub fn hml(&self) -> HmlVerdict {
        self.hml
    }

    pub fn alerts(&self) -> &[VerdictAlert] {
        &self.alerts
    }

    pub fn is_rejected(&self) -> bool {
        self.hml == HmlVerdict::Rejected
    }

    /// Project the verdicts onto indicator visibility.
    ///
    /// One indicator per family is shown. An HML rejection hides everything
    /// except the reject indicator.
    pub fn indicators(&self) -> IndicatorSet {
        let mut set = IndicatorSet::hidden();
        if self.is_rejected() {
            set.show(Indicator::Reject);
            return set;
        }
        set.show(self.miring.indicator());
        set.show(match self.hml {
            HmlVerdict::Compliant => Indicator::HmlCheck,
            HmlVerdict::NonCompliant | HmlVerdict::Rejected => Indicator::HmlX,
        });
        set
    }
}

/// Derive the verdicts of a report.
///
/// Unrecognized or missing tokens raise an alert and count as non-compliant.
///
/// # Examples
/// ```rust
/// use miring_core::report::{compute_verdict_state, HmlVerdict, MiringVerdict, ValidationReport};
///
/// let report = ValidationReport::from_text(
///     "<report><miring-compliant>warnings</miring-compliant><hml-compliant>true</hml-compliant></report>",
/// );
/// let state = compute_verdict_state(&report);
/// assert_eq!(state.miring(), MiringVerdict::CompliantWithWarnings);
/// assert_eq!(state.hml(), HmlVerdict::Compliant);
/// assert!(state.alerts().is_empty());
/// ```
pub fn compute_verdict_state(report: &ValidationReport) -> VerdictState {
    let mut alerts = Vec::new();

    let miring_token = report.miring_token();
    let miring = match miring_token.as_deref().and_then(MiringVerdict::from_token) {
        Some(verdict) => verdict,
        None => {
            warn!(token = ?miring_token, "unrecognized miring-compliant value");
            alerts.push(VerdictAlert::UnrecognizedMiring {
                token: miring_token,
            });
            MiringVerdict::NonCompliant
        }
    };

    let hml_token = report.hml_token();
    let hml = match hml_token.as_deref().and_then(HmlVerdict::from_token) {
        Some(verdict) => verdict,
        None => {
            warn!(token = ?hml_token, "unrecognized hml-compliant value");
            alerts.push(VerdictAlert::UnrecognizedHml { token: hml_token });
            HmlVerdict::NonCompliant
        }
    };
    if hml == HmlVerdict::Rejected {
        alerts.push(VerdictAlert::HmlRejected);
    }

    VerdictState {
        miring,
        hml,
        alerts,
    }
}

/// Visual status flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Indicator {
    GreenCheck,
    RedX,
    YellowCheck,
    Reject,
    HmlCheck,
    HmlX,
}

impl Indicator {
    pub const ALL: [Indicator; 6] = [
        Indicator::GreenCheck,
        Indicator::RedX,
        Indicator::YellowCheck,
        Indicator::Reject,
        Indicator::HmlCheck,
        Indicator::HmlX,
    ];

    pub fn family(&self) -> IndicatorFamily {
        match self {
            Indicator::GreenCheck
            | Indicator::RedX
            | Indicator::YellowCheck
            | Indicator::Reject => IndicatorFamily::Miring,
            Indicator::HmlCheck | Indicator::HmlX => IndicatorFamily::Hml,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Indicator::GreenCheck => "MIRING compliant",
            Indicator::RedX => "not MIRING compliant",
            Indicator::YellowCheck => "MIRING compliant with warnings",
            Indicator::Reject => "rejected",
            Indicator::HmlCheck => "HML compliant",
            Indicator::HmlX => "not HML compliant",
        }
    }

    fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorFamily {
    Miring,
    Hml,
}

/// Visibility of every [`Indicator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IndicatorSet {
    visible: u8,
}

impl IndicatorSet {
    pub fn hidden() -> Self {
        Self::default()
    }

    /// Show `indicator` and hide its siblings.
    pub fn show(&mut self, indicator: Indicator) {
        for sibling in Indicator::ALL
            .iter()
            .filter(|other| other.family() == indicator.family())
        {
            self.visible &= !sibling.bit();
        }
        self.visible |= indicator.bit();
    }

    pub fn is_visible(&self, indicator: Indicator) -> bool {
        self.visible & indicator.bit() != 0
    }

    pub fn visible(&self) -> Vec<Indicator> {
        Indicator::ALL
            .into_iter()
            .filter(|indicator| self.is_visible(*indicator))
            .collect()
    }

    pub fn is_all_hidden(&self) -> bool {
        self.visible == 0
    }
}

impl Serialize for IndicatorSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.visible().serialize(serializer)
    }
}
