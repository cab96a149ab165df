use crate::model::{DatedRecord, Highlight};

/// Rounds whose placings are not final placings.
const PRELIMINARY_KEYWORDS: &[&str] = &[
    "série", "serie", "demi", "semi", "qualif", "tour", "1/2", "1/4", "1/8",
];

/// Level prefixes that make a result a highlight on their own.
pub const HIGHLIGHT_LEVELS: &[&str] = &["N", "IR", "IA", "IB"];

const NO_PLACE: u32 = 99;

/// Competition tier, most prestigious first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Ia,
    Ib,
    National,
    InterRegional,
    Other,
}

impl Tier {
    pub fn from_level(level: &str) -> Self {
        if level.starts_with("IA") {
            Tier::Ia
        } else if level.starts_with("IB") {
            Tier::Ib
        } else if level.starts_with('N') {
            Tier::National
        } else if level.starts_with("IR") {
            Tier::InterRegional
        } else {
            Tier::Other
        }
    }
}

/// Prefix predicate over level codes.
#[derive(Debug, Clone)]
pub struct LevelFilter {
    prefixes: Vec<String>,
}

impl LevelFilter {
    pub fn new<S: AsRef<str>>(prefixes: &[S]) -> Self {
        Self {
            prefixes: prefixes.iter().map(|p| p.as_ref().to_string()).collect(),
        }
    }

    pub fn matches(&self, level: &str) -> bool {
        self.prefixes.iter().any(|p| level.starts_with(p.as_str()))
    }
}

impl Default for LevelFilter {
    fn default() -> Self {
        Self::new(HIGHLIGHT_LEVELS)
    }
}

pub fn is_preliminary(round: &str) -> bool {
    let round = round.to_lowercase();
    PRELIMINARY_KEYWORDS.iter().any(|kw| round.contains(kw))
}

/// Select podiums (finals only), qualifications and high-level results,
/// then rank: podiums by place first, everything else by tier.
pub fn classify(recent: &[DatedRecord], levels: &LevelFilter) -> Vec<Highlight> {
    let mut highlights: Vec<Highlight> = recent
        .iter()
        .filter_map(|entry| {
            let r = &entry.record;
            let is_podium = matches!(r.place, Some(p) if p <= 3) && !is_preliminary(&r.round);
            if is_podium || r.is_qualified() || levels.matches(&r.level) {
                Some(Highlight {
                    entry: entry.clone(),
                    is_podium,
                })
            } else {
                None
            }
        })
        .collect();

    highlights.sort_by(|a, b| rank_key(a).cmp(&rank_key(b)));
    highlights
}

fn rank_key(h: &Highlight) -> (bool, u32, Tier, &str) {
    let r = h.record();
    let place = if h.is_podium {
        r.place.unwrap_or(NO_PLACE)
    } else {
        NO_PLACE
    };
    (!h.is_podium, place, Tier::from_level(&r.level), r.level.as_str())
}
