use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use super::table::cell_text;

static HEADERS_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.headers").unwrap());
static PAGER_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.select-text").unwrap());
static PAGER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)/(\d+)").unwrap());

/// Club display name from the page banner ("US TALENCE | Résultats ...").
pub fn club_name(doc: &Html, club_id: &str) -> String {
    match doc.select(&HEADERS_SEL).next() {
        Some(div) => {
            let text = cell_text(div);
            match text.split_once('|') {
                Some((name, _)) => name.trim().to_string(),
                None => text,
            }
        }
        None => format!("Club {}", club_id),
    }
}

/// Number of result pages advertised by the pager ("Page > 001/005 <"). Defaults to 1.
pub fn total_pages(doc: &Html) -> usize {
    doc.select(&PAGER_SEL)
        .next()
        .and_then(|span| {
            let text = cell_text(span);
            PAGER_RE.captures(&text)?[2].parse::<usize>().ok()
        })
        .filter(|n| *n > 0)
        .unwrap_or(1)
}
