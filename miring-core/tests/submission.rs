use std::path::{Path, PathBuf};

use httpmock::{Method::POST, MockServer};
use miring_core::{
    api::ValidatorClient,
    config::{Config, PayloadFormat},
    report::{HmlVerdict, Indicator, MiringVerdict, ValidationReport, compute_verdict_state},
    session::{Session, SessionError},
    summary::ReportSection,
};

fn fixture(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(relative)
}

fn read_fixture(relative: &str) -> String {
    std::fs::read_to_string(fixture(relative)).expect("read fixture")
}

fn try_start_server() -> Option<MockServer> {
    std::panic::catch_unwind(MockServer::start).ok()
}

#[test]
fn warnings_report_shows_yellow_only() {
    let report = ValidationReport::from_text(read_fixture("reports/miring-warnings.xml"));
    let state = compute_verdict_state(&report);
    assert_eq!(state.miring(), MiringVerdict::CompliantWithWarnings);
    assert_eq!(state.hml(), HmlVerdict::Compliant);
    assert_eq!(
        state.indicators().visible(),
        vec![Indicator::YellowCheck, Indicator::HmlCheck]
    );
}

#[test]
fn rejected_report_overrides_miring_verdict() {
    let report = ValidationReport::from_text(read_fixture("reports/hml-rejected.xml"));
    let state = compute_verdict_state(&report);
    assert_eq!(state.miring(), MiringVerdict::Compliant);
    assert!(state.is_rejected());
    assert_eq!(state.indicators().visible(), vec![Indicator::Reject]);
}

#[test]
fn session_round_trip_against_validator() {
    let server = match try_start_server() {
        Some(server) => server,
        None => return,
    };
    let hml = read_fixture("hml/sample-miring.xml");
    let report = read_fixture("reports/miring-warnings.xml");
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/validator/ValidateMiring/")
            .x_www_form_urlencoded_tuple("xml", hml.as_str());
        then.status(200)
            .header("content-type", "application/xml")
            .body(report.as_str());
    });

    let rt = tokio::runtime::Runtime::new().expect("runtime");
    rt.block_on(async {
        let config =
            Config::new(server.base_url()).with_payload_format(PayloadFormat::DocumentOnly);
        let client = ValidatorClient::new(config).expect("client");
        let mut session = Session::new();

        session
            .validate_file(&client, &fixture("hml/sample-miring.xml"), Some("1.0.1"))
            .await
            .expect("verdict");

        assert_eq!(session.results_text(), report);
        assert_eq!(session.download_results().content(), report);

        let summary = session.summary().expect("summary");
        assert_eq!(summary.timestamp(), Some("03/14/2016 09:26:53"));
        assert_eq!(summary.count(ReportSection::ValidationWarnings), 1);
        assert_eq!(summary.count(ReportSection::ValidationInfo), 1);

        session.clear_text();
        assert_eq!(session.results_text(), "");
        assert!(session.indicators().is_all_hidden());
    });
    mock.assert();
}

#[test]
fn repeated_submissions_keep_only_last_response() {
    let server = match try_start_server() {
        Some(server) => server,
        None => return,
    };
    let mut first = server.mock(|when, then| {
        when.method(POST).path("/validator/ValidateMiring/");
        then.status(200)
            .body(read_fixture("reports/hml-rejected.xml"));
    });

    let rt = tokio::runtime::Runtime::new().expect("runtime");
    rt.block_on(async {
        let client = ValidatorClient::new(Config::new(server.base_url())).expect("client");
        let mut session = Session::new();
        session.set_input("<hml/>");
        session.submit(&client, Some("1.0.1")).await.expect("first");
        assert_eq!(session.indicators().visible(), vec![Indicator::Reject]);

        first.delete();
        let second = server.mock(|when, then| {
            when.method(POST).path("/validator/ValidateMiring/");
            then.status(503).body("{\"trace\":\"x\"}\nService Unavailable");
        });

        let result = session.submit(&client, Some("1.0.1")).await;
        assert!(matches!(result, Err(SessionError::Submission(_))));
        assert!(session.indicators().is_all_hidden());
        assert!(session.results_text().ends_with(" Service Unavailable"));
        assert!(!session.results_text().contains("trace"));
        second.assert();
    });
}
