//! Static pattern detectors over raw page text.
//!
//! Each detector is a pure check from the document text to a boolean. No
//! detector parses HTML or runs scripts; they look for textual markers that
//! hint at session state (cookies, session ids, hidden fields, script-driven
//! state) or at resource-oriented requests (path segments, query strings).
//!
//! All patterns are compiled once into process-wide statics and only read
//! afterwards, so detectors can run from any number of threads at once. The
//! `regex` crate guarantees linear-time matching, so hostile input cannot
//! trigger catastrophic backtracking.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

use crate::config::EngineConfig;

/// Detectors backing the stateful hypothesis, in declared order.
pub const STATEFUL_DETECTORS: [Detector; 7] = [
    Detector::SetCookie,
    Detector::SessionIdInUrl,
    Detector::HiddenField,
    Detector::ScriptState,
    Detector::NonStandardMethod,
    Detector::Ajax,
    Detector::WebSocket,
];

/// Detectors backing the stateless hypothesis, in declared order.
pub const STATELESS_DETECTORS: [Detector; 3] = [
    Detector::RestfulUrl,
    Detector::QueryParam,
    Detector::NonStandardMethod,
];

/// A single named pattern check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Detector {
    /// Literal `Set-Cookie` response-header marker.
    SetCookie,
    /// Query parameter whose value embeds a `PHPSESSID=` token.
    SessionIdInUrl,
    /// `type="hidden"` input attribute, either quote style.
    HiddenField,
    /// Inline script writing `document.cookie` or mutating a `.value`.
    ScriptState,
    /// `method="..."` naming a verb other than GET or POST.
    NonStandardMethod,
    /// Inline script mentioning `xmlhttprequest`.
    Ajax,
    /// Inline script mentioning `websocket`.
    WebSocket,
    /// A `/segment` path fragment anywhere in the text.
    RestfulUrl,
    /// A literal `?`.
    QueryParam,
}

impl Detector {
    /// Stable snake_case name used in diagnostics and JSON output.
    pub fn name(&self) -> &'static str {
        match self {
            Detector::SetCookie => "set_cookie",
            Detector::SessionIdInUrl => "session_id_in_url",
            Detector::HiddenField => "hidden_field",
            Detector::ScriptState => "script_state",
            Detector::NonStandardMethod => "non_standard_method",
            Detector::Ajax => "ajax",
            Detector::WebSocket => "websocket",
            Detector::RestfulUrl => "restful_url",
            Detector::QueryParam => "query_param",
        }
    }

    /// Run the check. Total over any input: never panics, never fails.
    pub fn detect(&self, body: &str, config: &EngineConfig) -> bool {
        let ci = config.case_insensitive_keywords;
        match self {
            Detector::SetCookie => body.contains("Set-Cookie"),
            Detector::SessionIdInUrl => session_id_re().is_match(body),
            Detector::HiddenField => hidden_field_re().is_match(body),
            Detector::ScriptState => any_script(body, |script| {
                Keyword::DocumentCookie.regex(ci).is_match(script) || script.contains(".value")
            }),
            Detector::NonStandardMethod => method_re().is_match(body),
            Detector::Ajax => {
                any_script(body, |script| Keyword::XmlHttpRequest.regex(ci).is_match(script))
            }
            Detector::WebSocket => {
                any_script(body, |script| Keyword::WebSocket.regex(ci).is_match(script))
            }
            Detector::RestfulUrl => restful_url_re().is_match(body),
            Detector::QueryParam => body.contains('?'),
        }
    }
}

// ── Patterns ────────────────────────────────────────────────────────────────

fn session_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[?&][^=]+=[^&]*PHPSESSID=[^&]+").expect("valid regex"))
}

fn hidden_field_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"type=["']hidden["']"#).expect("valid regex"))
}

fn method_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"method=["'](PUT|DELETE|PATCH|OPTIONS|HEAD|TRACE|CONNECT)["']"#)
            .expect("valid regex")
    })
}

fn script_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<script.*?</script>").expect("valid regex"))
}

fn restful_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/[a-zA-Z0-9_-]+").expect("valid regex"))
}

/// Script keywords whose case sensitivity follows the engine config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    DocumentCookie,
    XmlHttpRequest,
    WebSocket,
}

impl Keyword {
    const ALL: [Keyword; 3] = [
        Keyword::DocumentCookie,
        Keyword::XmlHttpRequest,
        Keyword::WebSocket,
    ];

    fn literal(self) -> &'static str {
        match self {
            Keyword::DocumentCookie => "document.cookie",
            Keyword::XmlHttpRequest => "xmlhttprequest",
            Keyword::WebSocket => "websocket",
        }
    }

    /// Escaped literal pattern, compiled once per keyword and case mode.
    fn regex(self, case_insensitive: bool) -> &'static Regex {
        static TABLE: OnceLock<[[Regex; 2]; 3]> = OnceLock::new();
        let table = TABLE.get_or_init(|| {
            Keyword::ALL.map(|keyword| [keyword.compile(false), keyword.compile(true)])
        });
        &table[self as usize][usize::from(case_insensitive)]
    }

    fn compile(self, case_insensitive: bool) -> Regex {
        RegexBuilder::new(&regex::escape(self.literal()))
            .case_insensitive(case_insensitive)
            .build()
            .expect("valid regex")
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// True if any inline `<script>…</script>` block satisfies `pred`.
/// Stops at the first matching block.
fn any_script(body: &str, pred: impl Fn(&str) -> bool) -> bool {
    script_block_re()
        .find_iter(body)
        .any(|m| pred(m.as_str()))
}
