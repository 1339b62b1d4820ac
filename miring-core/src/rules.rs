//! Rendering of the validator's rule table.
use std::sync::LazyLock;

use regex::Regex;

use crate::api::{ValidatorClient, ValidatorError};

// `\r` is tried first, so a CRLF pair yields an empty row between lines.
static LINE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r|\r?\n").unwrap_or_else(|e| panic!("line pattern: {e}")));

/// Render the rules CSV as an HTML table.
///
/// The first line becomes header cells, every other line (including empty
/// ones) a data row. Cell text is inserted unescaped.
///
/// # Examples
/// ```rust
/// use miring_core::rules::render_rule_table;
///
/// let html = render_rule_table("Rule,Tier\n1.1,1");
/// assert_eq!(
///     html,
///     "<table border=\"1\"><tr><th>Rule</th><th>Tier</th></tr><tr><td>1.1</td><td>1</td></tr></table>"
/// );
/// ```
pub fn render_rule_table(csv: &str) -> String {
    let mut html = String::from("<table border=\"1\">");
    for (index, line) in LINE_SPLIT.split(csv).enumerate() {
        html.push_str("<tr>");
        let (open, close) = if index == 0 {
            ("<th>", "</th>")
        } else {
            ("<td>", "</td>")
        };
        for cell in line.split(',') {
            html.push_str(open);
            html.push_str(cell);
            html.push_str(close);
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
    html
}

/// Fetch the rules CSV and render it.
///
/// # Errors
/// Returns [`ValidatorError`] when the CSV cannot be fetched; nothing is rendered then.
pub async fn fetch_rule_table(client: &ValidatorClient) -> Result<String, ValidatorError> {
    let csv = client.fetch_rules().await?;
    Ok(render_rule_table(&csv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use httpmock::{Method::GET, MockServer};

    #[test]
    fn fetch_rule_table_renders_served_csv() {
        let server = match std::panic::catch_unwind(MockServer::start).ok() {
            Some(server) => server,
            None => return,
        };
        let mock = server.mock(|when, then| {
            when.method(GET).path("/rules/Rules.csv");
            then.status(200).body("Rule,Tier\n1.1.b,1");
        });

        let rt = tokio::runtime::Runtime::new().expect("runtime");
        let html = rt.block_on(async {
            let client = ValidatorClient::new(Config::new(server.base_url())).expect("client");
            fetch_rule_table(&client).await.expect("table")
        });
        assert_eq!(
            html,
            "<table border=\"1\"><tr><th>Rule</th><th>Tier</th></tr><tr><td>1.1.b</td><td>1</td></tr></table>"
        );
        mock.assert();
    }

    #[test]
    fn trailing_newline_adds_empty_row() {
        assert_eq!(
            render_rule_table("A,B\nx,y\n"),
            "<table border=\"1\"><tr><th>A</th><th>B</th></tr><tr><td>x</td><td>y</td></tr><tr><td></td></tr></table>"
        );
    }

    #[test]
    fn crlf_splits_twice() {
        assert_eq!(
            render_rule_table("A\r\nb"),
            "<table border=\"1\"><tr><th>A</th></tr><tr><td></td></tr><tr><td>b</td></tr></table>"
        );
    }

    #[test]
    fn lone_carriage_return_is_a_line_break() {
        assert_eq!(
            render_rule_table("A\rb"),
            "<table border=\"1\"><tr><th>A</th></tr><tr><td>b</td></tr></table>"
        );
    }

    #[test]
    fn cells_are_not_escaped() {
        let html = render_rule_table("Rule\n<b>1.2.b</b> & more");
        assert!(html.contains("<td><b>1.2.b</b> & more</td>"));
    }

    #[test]
    fn empty_input_renders_one_empty_header() {
        assert_eq!(
            render_rule_table(""),
            "<table border=\"1\"><tr><th></th></tr></table>"
        );
    }
}
