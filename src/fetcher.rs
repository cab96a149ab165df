use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use scraper::Html;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::parser::page;
use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("page {position} returned {status}")]
    Status { position: usize, status: u16 },
    #[error("fetch task aborted: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("failed to read sample: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw HTML of every results page, in page order, plus the club display name.
pub struct ClubPages {
    pub club_name: String,
    pub pages: Vec<String>,
}

impl ClubPages {
    fn from_pages(club_id: &str, pages: Vec<String>) -> Self {
        let club_name = pages
            .first()
            .map(|html| page::club_name(&Html::parse_document(html), club_id))
            .unwrap_or_else(|| format!("Club {}", club_id));
        Self { club_name, pages }
    }
}

pub struct Fetcher {
    client: reqwest::Client,
    base_url: String,
    concurrency: usize,
}

impl Fetcher {
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            concurrency: settings.concurrency.max(1),
        })
    }

    /// Fetch one page of the club's season results.
    pub async fn fetch_page(
        &self,
        club_id: &str,
        season: i32,
        position: usize,
    ) -> Result<String, FetchError> {
        fetch_one(&self.client, &page_url(&self.base_url, club_id, season, position), position)
            .await
    }

    /// Fetch the first page, read the pager, then fetch the rest concurrently.
    pub async fn fetch_all(&self, club_id: &str, season: i32) -> Result<ClubPages, FetchError> {
        info!(club = %club_id, season, "fetching results");
        let first = self.fetch_page(club_id, season, 0).await?;
        let total = page::total_pages(&Html::parse_document(&first));
        info!(club = %club_id, pages = total, "pagination read");

        let mut pages = Vec::with_capacity(total);
        pages.push(first);
        if total > 1 {
            pages.extend(self.fetch_rest(club_id, season, total).await?);
        }
        Ok(ClubPages::from_pages(club_id, pages))
    }

    async fn fetch_rest(
        &self,
        club_id: &str,
        season: i32,
        total: usize,
    ) -> Result<Vec<String>, FetchError> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let pb = ProgressBar::new((total - 1) as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} pages")
        {
            pb.set_style(style.progress_chars("=> "));
        }

        let mut tasks = JoinSet::new();
        for position in 1..total {
            let client = self.client.clone();
            let sem = Arc::clone(&semaphore);
            let url = page_url(&self.base_url, club_id, season, position);
            let pb = pb.clone();
            tasks.spawn(async move {
                let _permit = sem.acquire_owned().await;
                let res = fetch_one(&client, &url, position).await;
                pb.inc(1);
                (position, res)
            });
        }

        let pages = collect_pages(tasks).await;
        pb.finish_and_clear();
        pages
    }
}

type PageTask = (usize, Result<String, FetchError>);

/// Gather page results back into position order. The first failure drops
/// the set, which aborts the fetches still in flight.
async fn collect_pages(mut tasks: JoinSet<PageTask>) -> Result<Vec<String>, FetchError> {
    let mut pages = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        let (position, res) = joined?;
        pages.push((position, res?));
    }
    pages.sort_by_key(|(position, _)| *position);
    Ok(pages.into_iter().map(|(_, html)| html).collect())
}

async fn fetch_one(
    client: &reqwest::Client,
    url: &str,
    position: usize,
) -> Result<String, FetchError> {
    debug!(url = %url, "GET");
    let resp = client.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            position,
            status: status.as_u16(),
        });
    }
    Ok(resp.text().await?)
}

/// Load a saved results page in place of a fetch.
pub fn load_sample(path: &str, club_id: &str) -> Result<ClubPages, FetchError> {
    let html = std::fs::read_to_string(path)?;
    info!(path = %path, bytes = html.len(), "loaded sample");
    Ok(ClubPages::from_pages(club_id, vec![html]))
}

pub fn page_url(base_url: &str, club_id: &str, season: i32, position: usize) -> String {
    let mut url = format!(
        "{}?frmbase=resultats&frmmode=1&frmclub={}&frmespace=0&frmsaison={}",
        base_url, club_id, season
    );
    if position > 0 {
        url.push_str(&format!("&frmposition={}", position));
    }
    url
}
