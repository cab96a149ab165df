pub mod dates;
pub mod highlights;

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::model::{DatedRecord, Digest, ResultRecord};
use highlights::LevelFilter;

pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;

/// Keep records dated within `days` of `today` (inclusive), sorted by
/// date, city, then athlete. Records with an unresolvable date are dropped.
pub fn filter_recent(raw: Vec<ResultRecord>, today: NaiveDate, days: u32) -> Vec<DatedRecord> {
    let cutoff = today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN);

    let mut recent: Vec<DatedRecord> = raw
        .into_iter()
        .filter_map(|record| match dates::resolve(&record.date_text, today) {
            Some(date) if date >= cutoff => Some(DatedRecord { record, date }),
            Some(_) => None,
            None => {
                debug!(date = %record.date_text, athlete = %record.athlete_name, "unresolved date");
                None
            }
        })
        .collect();

    // Stable: full ties keep their input order.
    recent.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.record.city.cmp(&b.record.city))
            .then_with(|| a.record.athlete_name.cmp(&b.record.athlete_name))
    });
    recent
}

/// Full analysis: recency window, then highlight selection.
pub fn process_results(
    raw: Vec<ResultRecord>,
    today: NaiveDate,
    days: u32,
    levels: &LevelFilter,
) -> Digest {
    let total = raw.len();
    let recent = filter_recent(raw, today, days);
    let highlights = highlights::classify(&recent, levels);
    debug!(total, recent = recent.len(), highlights = highlights.len(), "analyzed results");
    Digest { recent, highlights }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 15).unwrap()
    }

    fn rec(name: &str, date: &str, city: &str) -> ResultRecord {
        ResultRecord {
            athlete_name: name.to_string(),
            event: "100m / SEF".to_string(),
            round: String::new(),
            performance: "11\"45".to_string(),
            points: 0,
            place: None,
            qualified: None,
            level: String::new(),
            date_text: date.to_string(),
            city: city.to_string(),
        }
    }

    fn names(recent: &[DatedRecord]) -> Vec<&str> {
        recent.iter().map(|r| r.record.athlete_name.as_str()).collect()
    }

    #[test]
    fn keeps_last_seven_days() {
        let recent = filter_recent(
            vec![rec("Recent", "12/02", "Paris"), rec("Old", "01/01", "Paris")],
            today(),
            DEFAULT_LOOKBACK_DAYS,
        );
        assert_eq!(names(&recent), vec!["Recent"]);
        assert_eq!(recent[0].date, NaiveDate::from_ymd_opt(2026, 2, 12).unwrap());
    }

    #[test]
    fn cutoff_is_inclusive() {
        let recent = filter_recent(
            vec![rec("edge", "08/02", "Paris"), rec("before", "07/02", "Paris")],
            today(),
            7,
        );
        assert_eq!(names(&recent), vec!["edge"]);
    }

    #[test]
    fn custom_window() {
        let recent = filter_recent(vec![rec("A", "01/02", "Paris")], today(), 30);
        assert_eq!(recent.len(), 1);
    }

    #[test]
    fn unresolvable_dates_dropped() {
        let recent = filter_recent(
            vec![rec("bad", "31/02", "Paris"), rec("none", "", "Paris"), rec("ok", "14/02", "Paris")],
            today(),
            7,
        );
        assert_eq!(names(&recent), vec!["ok"]);
    }

    #[test]
    fn sorted_by_date_then_city_then_name() {
        let recent = filter_recent(
            vec![
                rec("B", "14/02", "Paris"),
                rec("Z", "12/02", "Paris"),
                rec("Y", "12/02", "Lyon"),
                rec("A", "12/02", "Paris"),
            ],
            today(),
            7,
        );
        assert_eq!(names(&recent), vec!["Y", "A", "Z", "B"]);
    }

    #[test]
    fn full_ties_keep_input_order() {
        let mut first = rec("A", "12/02", "Paris");
        first.event = "Longueur".to_string();
        let mut second = rec("A", "12/02", "Paris");
        second.event = "Triple".to_string();
        let recent = filter_recent(vec![first, second], today(), 7);
        let events: Vec<_> = recent.iter().map(|r| r.record.event.as_str()).collect();
        assert_eq!(events, vec!["Longueur", "Triple"]);
    }

    #[test]
    fn january_window_reaches_december() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 3).unwrap();
        let recent = filter_recent(vec![rec("A", "29/12", "Bordeaux")], today, 7);
        assert_eq!(recent[0].date, NaiveDate::from_ymd_opt(2025, 12, 29).unwrap());
    }

    #[test]
    fn highlights_come_from_recent_only() {
        let mut podium = rec("P", "12/02", "Paris");
        podium.place = Some(1);
        podium.round = "Finale".to_string();
        let mut old_podium = podium.clone();
        old_podium.date_text = "01/01".to_string();

        let digest = process_results(vec![podium, old_podium], today(), 7, &LevelFilter::default());
        assert_eq!(digest.recent.len(), 1);
        assert_eq!(digest.highlights.len(), 1);
        assert!(digest.highlights[0].is_podium);
    }

    #[test]
    fn sample_page_pipeline() {
        let html = std::fs::read_to_string("tests/fixtures/sample_table.html").unwrap();
        let raw = crate::parser::process_page(&html);
        let digest = process_results(raw, today(), 7, &LevelFilter::default());

        assert_eq!(
            names(&digest.recent),
            vec![
                "GARCIA Leo",
                "RICHARD Chloé",
                "DUPONT Marie",
                "KOVANOV Danik",
                "LASCAUX Alix",
                "LEROY Emma",
                "MARTIN Hugo",
                "PETIT Clara",
                "THOMAS Julie",
            ]
        );

        let highlights: Vec<_> = digest
            .highlights
            .iter()
            .map(|h| (h.record().athlete_name.as_str(), h.is_podium))
            .collect();
        assert_eq!(
            highlights,
            vec![
                ("DUPONT Marie", true),
                ("KOVANOV Danik", true),
                ("MARTIN Hugo", true),
                ("GARCIA Leo", false),
                ("PETIT Clara", false),
                ("RICHARD Chloé", false),
                ("LEROY Emma", false),
            ]
        );
    }

    #[test]
    fn empty_input() {
        let digest = process_results(Vec::new(), today(), 7, &LevelFilter::default());
        assert!(digest.recent.is_empty());
        assert!(digest.highlights.is_empty());
        assert!(digest.is_empty());
    }
}
