//! Result rendering for the terminal.

use serde::Serialize;
use statecheck::{Analysis, BatteryReport};

/// Where the classified document came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "location", rename_all = "snake_case")]
pub enum Source {
    Url(String),
    File(String),
    Stdin,
}

/// JSON output shape.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub source: &'a Source,
    #[serde(flatten)]
    pub analysis: &'a Analysis,
}

/// One-line verdict, optionally followed by per-detector breakdown.
pub fn render_text(source: &Source, analysis: &Analysis, explain: bool) -> String {
    let subject = match source {
        Source::Url(url) => format!("The website {url}"),
        Source::File(path) => format!("The document {path}"),
        Source::Stdin => "The document on stdin".to_string(),
    };

    let mut out = format!("{subject} is {}", analysis.classification);
    if explain {
        out.push('\n');
        push_battery(&mut out, &analysis.stateful);
        push_battery(&mut out, &analysis.stateless);
    }
    out
}

fn push_battery(out: &mut String, report: &BatteryReport) {
    out.push_str(&format!(
        "\n{} checks: {}/{} (threshold {}) -> {}\n",
        report.hypothesis,
        report.count,
        report.signals.len(),
        report.threshold,
        if report.verdict { "yes" } else { "no" }
    ));
    for signal in &report.signals {
        let mark = if signal.fired { "x" } else { " " };
        out.push_str(&format!("  [{mark}] {}\n", signal.detector));
    }
}

pub fn render_json(source: &Source, analysis: &Analysis) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Report { source, analysis })
}

#[cfg(test)]
mod tests {
    use super::*;
    use statecheck::Engine;

    #[test]
    fn test_render_text_url() {
        let analysis = Engine::default().analyze("");
        let text = render_text(&Source::Url("https://example.com".into()), &analysis, false);
        assert_eq!(text, "The website https://example.com is Undetermined");
    }

    #[test]
    fn test_render_text_explain() {
        let analysis = Engine::default().analyze("Set-Cookie: a=1\n<input type='hidden'>");
        let text = render_text(&Source::Stdin, &analysis, true);
        assert!(text.starts_with("The document on stdin is Stateful"));
        assert!(text.contains("stateful checks: 2/7 (threshold 2) -> yes"));
        assert!(text.contains("  [x] set_cookie"));
        assert!(text.contains("  [ ] websocket"));
        assert!(text.contains("stateless checks: 0/3 (threshold 1) -> no"));
    }

    #[test]
    fn test_render_json() {
        let analysis = Engine::default().analyze("?");
        let json = render_json(&Source::File("page.html".into()), &analysis).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["classification"], "stateless");
        assert_eq!(value["source"]["kind"], "file");
        assert_eq!(value["source"]["location"], "page.html");
        assert_eq!(value["stateless"]["count"], 1);
        assert_eq!(value["stateful"]["signals"][0]["detector"], "set_cookie");
        assert_eq!(value["stateful"]["signals"][0]["fired"], false);
    }
}
