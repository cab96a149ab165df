pub mod page;
pub mod result_cell;
pub mod table;

use rayon::prelude::*;
use scraper::Html;

use crate::model::ResultRecord;

/// Parse one results page and extract its rows.
pub fn process_page(html: &str) -> Vec<ResultRecord> {
    table::extract(&Html::parse_document(html))
}

/// Extract every page in parallel; rows are concatenated in page order.
pub fn process_pages(pages: &[String]) -> Vec<ResultRecord> {
    pages
        .par_iter()
        .map(|html| process_page(html))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}
