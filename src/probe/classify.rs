//! Response body classification.

use serde::Serialize;

/// Which deployment answered a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Canary,
    Main,
}

impl Verdict {
    pub fn is_canary(self) -> bool {
        self == Verdict::Canary
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Canary => "canary",
            Verdict::Main => "main",
        }
    }
}

/// Classify a response body. `None` is treated as an empty body.
///
/// Matching is case-insensitive. A body is canary when it mentions
/// "canary", or carries a `color:` declaration alongside "yellow".
pub fn classify(body: Option<&str>) -> Verdict {
    let body = body.unwrap_or_default().to_lowercase();

    // The version clause is subsumed by the first one.
    let is_canary = body.contains("canary")
        || (body.contains("color:") && body.contains("yellow"))
        || (body.contains("version") && (body.contains("canary") || body.contains("canary-")));

    if is_canary {
        Verdict::Canary
    } else {
        Verdict::Main
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canary_keyword_any_case() {
        assert_eq!(classify(Some("<h1>Canary Release</h1>")), Verdict::Canary);
        assert_eq!(classify(Some("CANARY")), Verdict::Canary);
        assert_eq!(classify(Some("version: canary-2")), Verdict::Canary);
    }

    #[test]
    fn test_yellow_color_marker() {
        assert_eq!(classify(Some("Color: YELLOW")), Verdict::Canary);
        assert_eq!(classify(Some("<body style=\"color: yellow\">")), Verdict::Canary);
    }

    #[test]
    fn test_yellow_without_color_is_main() {
        assert_eq!(classify(Some("yellow submarine")), Verdict::Main);
        assert_eq!(classify(Some("color: blue")), Verdict::Main);
        assert_eq!(classify(Some("colour: yellow")), Verdict::Main);
    }

    #[test]
    fn test_main_bodies() {
        assert_eq!(classify(Some("Version: stable-1.2")), Verdict::Main);
        assert_eq!(classify(Some("")), Verdict::Main);
        assert_eq!(classify(None), Verdict::Main);
    }
}
