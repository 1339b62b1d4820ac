//! Terminal projection of a session.
use std::fmt::Write;

use miring_core::{
    report::Indicator,
    session::Session,
    summary::ReportSummary,
};
use serde_json::{Value, json};

/// Results text, then alerts, indicator lines and section counts.
pub fn text(session: &Session) -> String {
    let mut out = String::new();
    out.push_str(session.results_text());
    if !out.ends_with('\n') {
        out.push('\n');
    }

    if let Some(verdict) = session.verdict() {
        out.push('\n');
        for alert in verdict.alerts() {
            let _ = writeln!(out, "! {alert}");
        }
    }

    let indicators = session.indicators();
    for indicator in Indicator::ALL {
        if indicators.is_visible(indicator) {
            let _ = writeln!(out, "[{}] {}", mark(indicator), indicator.label());
        }
    }

    if let Some(summary) = session.summary() {
        out.push_str(&summary_lines(&summary));
    }
    out
}

pub fn json(session: &Session) -> Value {
    json!({
        "verdict": session.verdict(),
        "indicators": session.indicators(),
        "summary": session.summary(),
        "results": session.results_text(),
    })
}

fn mark(indicator: Indicator) -> char {
    match indicator {
        Indicator::GreenCheck | Indicator::HmlCheck => '+',
        Indicator::YellowCheck => '~',
        Indicator::RedX | Indicator::HmlX | Indicator::Reject => 'x',
    }
}

fn summary_lines(summary: &ReportSummary) -> String {
    let mut out = String::new();
    for (section, count) in summary.sections() {
        let _ = writeln!(out, "  {}: {count}", section.tag());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use miring_core::report::ValidationReport;

    #[test]
    fn text_lists_visible_indicators_after_results() {
        let mut session = Session::new();
        session.show_report(ValidationReport::from_text(
            "<miring-report><hml-compliant>true</hml-compliant><miring-compliant>warnings</miring-compliant>\
             <validation-warnings><miring-result/></validation-warnings></miring-report>",
        ));
        let rendered = text(&session);
        assert!(rendered.starts_with("<miring-report>"));
        assert!(rendered.contains("[~] MIRING compliant with warnings\n"));
        assert!(rendered.contains("[+] HML compliant\n"));
        assert!(!rendered.contains("[+] MIRING compliant\n"));
        assert!(rendered.contains("  validation-warnings: 1\n"));
    }

    #[test]
    fn text_shows_alerts() {
        let mut session = Session::new();
        session.show_report(ValidationReport::from_text(
            "<r><miring-compliant>maybe</miring-compliant><hml-compliant>reject</hml-compliant></r>",
        ));
        let rendered = text(&session);
        assert!(rendered.contains("! Error determining MIRING Compliance.\n"));
        assert!(rendered.contains("! HML Rejected, Please Check Below For Reason\n"));
        assert!(rendered.contains("[x] rejected\n"));
    }

    #[test]
    fn miring_reject_does_not_contradict_hml_verdict() {
        let mut session = Session::new();
        session.show_report(ValidationReport::from_text(
            "<r><miring-compliant>reject</miring-compliant><hml-compliant>true</hml-compliant></r>",
        ));
        let rendered = text(&session);
        assert!(rendered.contains("[x] rejected\n"));
        assert!(rendered.contains("[+] HML compliant\n"));
        assert!(!rendered.contains("HML rejected"));
    }

    #[test]
    fn json_of_cleared_session_has_no_verdict() {
        let value = json(&Session::new());
        assert_eq!(value["verdict"], Value::Null);
        assert_eq!(value["indicators"], json!([]));
        assert_eq!(value["results"], "");
    }
}
