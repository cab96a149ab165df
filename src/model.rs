use chrono::NaiveDate;
use serde::Serialize;

/// Qualification marker appended to a performance ("q", "qi", "qe").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualMarker {
    Q,
    Qi,
    Qe,
}

impl QualMarker {
    /// Case-insensitive; anything outside the known set is not a marker.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "q" => Some(Self::Q),
            "qi" => Some(Self::Qi),
            "qe" => Some(Self::Qe),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Q => "q",
            Self::Qi => "qi",
            Self::Qe => "qe",
        }
    }
}

/// One row of the federation results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub athlete_name: String,
    pub event: String,
    pub round: String,
    pub performance: String,
    pub points: u32,
    pub place: Option<u32>,
    pub qualified: Option<QualMarker>,
    pub level: String,
    pub date_text: String,
    pub city: String,
}

impl ResultRecord {
    pub fn is_qualified(&self) -> bool {
        self.qualified.is_some()
    }
}

/// A record that survived the recency filter, with its resolved date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatedRecord {
    #[serde(flatten)]
    pub record: ResultRecord,
    pub date: NaiveDate,
}

/// A recent record promoted to the highlight subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    #[serde(flatten)]
    pub entry: DatedRecord,
    pub is_podium: bool,
}

impl Highlight {
    pub fn record(&self) -> &ResultRecord {
        &self.entry.record
    }
}

/// Output of the analysis stage, handed to the renderer as-is.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Digest {
    pub recent: Vec<DatedRecord>,
    pub highlights: Vec<Highlight>,
}

impl Digest {
    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }
}
