use std::sync::LazyLock;

use regex::Regex;

use crate::model::QualMarker;

static PLACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)\.\s*").unwrap());
// `regex` has no lookbehind: the char before the marker is matched and checked instead.
static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[^dD])([qQ][iIeE]?)\s*$").unwrap());
static REACTION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d)\(").unwrap());

/// Decoded content of the "result" cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCell {
    pub place: Option<u32>,
    pub qualified: Option<QualMarker>,
    pub performance: String,
}

/// Split `"1. 11''45q"` into place, qualification marker and performance.
pub fn decode(raw: &str) -> ResultCell {
    let text = raw.trim();

    let (place, rest) = match PLACE_RE.captures(text) {
        Some(caps) => {
            let place = caps[1].parse::<u32>().ok().filter(|p| *p > 0);
            (place, &text[caps[0].len()..])
        }
        None => (None, text),
    };

    let (qualified, rest) = match MARKER_RE.captures(rest) {
        Some(caps) => {
            let m = caps.get(1).map(|g| (g.start(), g.as_str()));
            match m.and_then(|(start, s)| QualMarker::parse(s).map(|q| (start, q))) {
                Some((start, q)) => (Some(q), &rest[..start]),
                None => (None, rest),
            }
        }
        None => (None, rest),
    };

    ResultCell {
        place,
        qualified,
        performance: normalize_performance(rest),
    }
}

/// `''` → `"`, and a space before a reaction time: `7"78(0.123)` → `7"78 (0.123)`.
pub fn normalize_performance(perf: &str) -> String {
    let perf = perf.trim().replace("''", "\"");
    REACTION_RE.replace_all(&perf, "$1 (").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_and_plain_time() {
        let c = decode("1. 11''45");
        assert_eq!(c.place, Some(1));
        assert_eq!(c.qualified, None);
        assert_eq!(c.performance, "11\"45");
    }

    #[test]
    fn qi_marker_with_place() {
        let c = decode("2. 35'18\"qi");
        assert_eq!(c.place, Some(2));
        assert_eq!(c.qualified, Some(QualMarker::Qi));
        assert_eq!(c.performance, "35'18\"");
    }

    #[test]
    fn qe_and_q_markers() {
        assert_eq!(decode("4. 12'45\"qe").qualified, Some(QualMarker::Qe));
        let c = decode("3. 8''12 q");
        assert_eq!(c.qualified, Some(QualMarker::Q));
        assert_eq!(c.performance, "8\"12");
    }

    #[test]
    fn uppercase_marker_is_qualification() {
        assert_eq!(decode("1. 24''10Q").qualified, Some(QualMarker::Q));
    }

    #[test]
    fn disqualification_is_not_a_marker() {
        let c = decode("42.50D");
        assert_eq!(c.qualified, None);
        let c = decode("DQ");
        assert_eq!(c.qualified, None);
        assert_eq!(c.performance, "DQ");
        assert_eq!(decode("12''30 dq").qualified, None);
    }

    #[test]
    fn no_leading_place() {
        let c = decode("11''45");
        assert_eq!(c.place, None);
        assert_eq!(c.performance, "11\"45");
    }

    #[test]
    fn reaction_time_is_spaced() {
        let c = decode("1. 7''78(0.123)");
        assert_eq!(c.performance, "7\"78 (0.123)");
    }

    #[test]
    fn zero_place_is_absent() {
        assert_eq!(decode("0. 10''00").place, None);
    }

    #[test]
    fn empty_cell() {
        let c = decode("   ");
        assert_eq!(c.place, None);
        assert_eq!(c.qualified, None);
        assert_eq!(c.performance, "");
    }
}
