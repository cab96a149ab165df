use std::collections::HashSet;
use std::fmt::Write;

use chrono::NaiveDate;

use crate::analyzer::highlights::LevelFilter;
use crate::model::{DatedRecord, Digest, ResultRecord};

/// Counters shown at the top of the digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub athletes: usize,
    pub highlights: usize,
    pub high_level: usize,
}

pub fn dashboard(digest: &Digest, levels: &LevelFilter) -> Dashboard {
    let athletes: HashSet<&str> = digest
        .recent
        .iter()
        .map(|r| r.record.athlete_name.as_str())
        .collect();
    Dashboard {
        athletes: athletes.len(),
        highlights: digest.highlights.len(),
        high_level: digest
            .recent
            .iter()
            .filter(|r| levels.matches(&r.record.level))
            .count(),
    }
}

/// Display options for the HTML digest.
pub struct ReportStyle<'a> {
    /// Levels shown in bold on result cards.
    pub highlight_levels: &'a LevelFilter,
    /// Levels counted by the dashboard.
    pub dashboard_levels: &'a LevelFilter,
}

/// Render the full HTML email. Sequences are rendered in the order given.
pub fn render_html(club_name: &str, digest: &Digest, today: NaiveDate, style: &ReportStyle) -> String {
    let club = escape(club_name);
    let stats = dashboard(digest, style.dashboard_levels);

    let mut html = String::with_capacity(8 * 1024);
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Résultats {club}</title>
</head>
<body style="margin:0; padding:0; background-color:#f1f5f9; font-family:Arial, sans-serif;">
<div style="max-width:600px; margin:0 auto; padding:20px; background-color:#ffffff;">
<h1 style="font-size:22px; color:#0f172a; margin:0 0 4px 0;">{club}</h1>
<div style="font-size:13px; color:#64748b; margin-bottom:20px;">Résultats au {date}</div>
"#,
        date = today.format("%d/%m"),
    );

    render_dashboard(&mut html, &stats);

    if digest.is_empty() {
        html.push_str(
            r#"<p style="color:#64748b; text-align:center; padding:30px 0;">Aucune compétition cette semaine.</p>"#,
        );
    } else {
        if !digest.highlights.is_empty() {
            html.push_str(SECTION_HIGHLIGHTS);
            html.push_str(r#"<div style="width:100%;">"#);
            for h in &digest.highlights {
                let podium = if h.is_podium { h.record().place } else { None };
                render_card(&mut html, h.record(), podium, style.highlight_levels);
            }
            html.push_str("</div>");
        }

        html.push_str(SECTION_RECENT);
        render_grouped(&mut html, &digest.recent, style.highlight_levels);
    }

    html.push_str(
        r#"<div style="margin-top:30px; font-size:11px; color:#94a3b8; text-align:center;">
<p>Généré par <strong>Club Digest</strong>.</p>
<p>Données: www.athle.fr</p>
</div>
</div>
</body>
</html>
"#,
    );
    html
}

const SECTION_HIGHLIGHTS: &str =
    r#"<h2 style="font-size:16px; color:#1e40af; border-bottom:2px solid #dbeafe; padding-bottom:6px;">Highlights</h2>"#;
const SECTION_RECENT: &str =
    r#"<h2 style="font-size:16px; color:#1e40af; border-bottom:2px solid #dbeafe; padding-bottom:6px;">Tous les résultats</h2>"#;

fn render_dashboard(html: &mut String, stats: &Dashboard) {
    let cell = |value: usize, label: &str, last: bool| {
        let border = if last { "" } else { " border-right:1px solid #dbeafe;" };
        format!(
            r#"<td align="center" style="padding:15px;{border}"><div style="font-size:24px; font-weight:bold; color:#1e40af;">{value}</div><div style="font-size:11px; text-transform:uppercase; color:#64748b;">{label}</div></td>"#
        )
    };
    let _ = write!(
        html,
        r#"<table width="100%" cellpadding="0" cellspacing="0" style="background-color:#f0f7ff; border-radius:8px; margin-bottom:25px; border:1px solid #dbeafe;"><tr>{}{}{}</tr></table>"#,
        cell(stats.athletes, "Athlètes", false),
        cell(stats.highlights, "Highlights", false),
        cell(stats.high_level, "Perfs N/I", true),
    );
}

/// Cards under a "date à city" header, a new header whenever the pair changes.
fn render_grouped(html: &mut String, recent: &[DatedRecord], levels: &LevelFilter) {
    html.push_str(r#"<div style="width:100%;">"#);
    let mut last_group: Option<(&str, &str)> = None;
    for entry in recent {
        let r = &entry.record;
        let group = (r.date_text.as_str(), r.city.as_str());
        if last_group != Some(group) {
            let _ = write!(
                html,
                r#"<div style="font-size:13px; font-weight:bold; color:#334155; margin:18px 0 8px 0;">📅 {} à {}</div>"#,
                escape(&r.date_text),
                escape(&r.city)
            );
            last_group = Some(group);
        }
        render_card(html, r, None, levels);
    }
    html.push_str("</div>");
}

fn render_card(html: &mut String, r: &ResultRecord, podium: Option<u32>, levels: &LevelFilter) {
    let (border, bg, medal) = match podium {
        Some(1) => ("#f59e0b", "#fffbeb", "🥇 "),
        Some(2) => ("#94a3b8", "#f8fafc", "🥈 "),
        Some(3) => ("#d97706", "#fff7ed", "🥉 "),
        _ => ("#e2e8f0", "#ffffff", ""),
    };

    let qualif = r
        .qualified
        .map(|q| {
            format!(
                r#" <span style="background-color:#dcfce7; color:#166534; font-size:11px; padding:1px 5px; border-radius:4px;">{}</span>"#,
                q.as_str()
            )
        })
        .unwrap_or_default();
    let round = if r.round.is_empty() {
        String::new()
    } else {
        format!(r#" <span style="color:#94a3b8;">({})</span>"#, escape(&r.round))
    };

    let _ = write!(
        html,
        r#"<table width="100%" cellpadding="0" cellspacing="0" style="margin-bottom:8px; border:1px solid {border}; border-left:4px solid {border}; border-radius:6px; background-color:{bg};"><tr>
<td style="padding:10px;"><div style="font-weight:bold; color:#0f172a;">{medal}{name}</div><div style="font-size:12px; color:#64748b;">{event}{round}</div></td>
<td align="right" style="padding:10px; white-space:nowrap;"><div style="font-weight:bold; font-size:15px; color:#0f172a;">{perf}{qualif}</div><div style="font-size:11px; color:#64748b;">{meta}</div></td>
</tr></table>
"#,
        name = escape(&r.athlete_name),
        event = escape(&r.event),
        perf = escape(&r.performance),
        meta = card_meta(r, levels),
    );
}

/// "1100 pts • <b>N2</b> • 1er"
fn card_meta(r: &ResultRecord, levels: &LevelFilter) -> String {
    let mut meta = Vec::new();
    if r.points > 0 {
        meta.push(format!("{} pts", r.points));
    }
    if !r.level.is_empty() {
        if levels.matches(&r.level) {
            meta.push(format!(
                r#"<span style="font-weight:bold; color:#0f172a;">{}</span>"#,
                escape(&r.level)
            ));
        } else {
            meta.push(escape(&r.level));
        }
    }
    if let Some(place) = r.place {
        meta.push(ordinal(place));
    }
    meta.join(" &bull; ")
}

pub fn ordinal(place: u32) -> String {
    if place == 1 {
        "1er".to_string()
    } else {
        format!("{}e", place)
    }
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
