mod analyzer;
mod fetcher;
mod mailer;
mod model;
mod parser;
mod report;
mod settings;

use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use fetcher::{ClubPages, Fetcher};
use model::Digest;
use settings::Settings;

#[derive(Parser)]
#[command(name = "club_digest", about = "Weekly athletics results digest for a club")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Source {
    /// Club id on the federation site (e.g. 033033)
    #[arg(long)]
    club: String,
    /// Local HTML results page to use instead of fetching
    #[arg(long)]
    sample: Option<String>,
    /// Season to fetch (default: current year)
    #[arg(long)]
    season: Option<i32>,
    /// Lookback window in days (default from config, 7)
    #[arg(short, long)]
    days: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, analyze and send (or preview) the HTML digest
    Digest {
        #[command(flatten)]
        source: Source,
        /// Recipient address (overrides RESEND_TO_EMAIL)
        #[arg(long)]
        to: Option<String>,
        /// Write the raw HTML of the first fetched page to this file
        #[arg(long)]
        save_sample: Option<String>,
    },
    /// Print recent results and highlights to the terminal
    Inspect {
        #[command(flatten)]
        source: Source,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show how many result pages the site lists for a club
    Pages {
        #[arg(long)]
        club: String,
        #[arg(long)]
        season: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    let today = Local::now().date_naive();

    let result = match cli.command {
        Commands::Digest { source, to, save_sample } => {
            let pages = load_pages(&settings, &source, today).await?;
            if let Some(path) = &save_sample {
                if let Some(first) = pages.pages.first() {
                    std::fs::write(path, first)
                        .with_context(|| format!("Failed to write sample {}", path))?;
                    println!("Sample saved: {}", path);
                }
            }

            let digest = analyze(&settings, &source, &pages, today);
            let style = report::ReportStyle {
                highlight_levels: &settings.highlight_filter(),
                dashboard_levels: &settings.dashboard_filter(),
            };
            let html = report::render_html(&pages.club_name, &digest, today, &style);

            let to = to.or_else(|| settings.resend_to.clone());
            match (settings.resend_api_key.clone(), to) {
                (Some(api_key), Some(to)) => {
                    let subject =
                        format!("Résultats {} - {}", pages.club_name, today.format("%d/%m"));
                    mailer::Mailer::new(api_key, settings.mail_from.clone())
                        .send(&to, &subject, &html)
                        .await?;
                    println!("Digest sent to {}.", to);
                }
                _ => {
                    let path = format!("preview_{}.html", source.club);
                    std::fs::write(&path, &html)
                        .with_context(|| format!("Failed to write preview {}", path))?;
                    let abs = std::fs::canonicalize(&path).unwrap_or_else(|_| path.clone().into());
                    println!("{}", "-".repeat(50));
                    println!("Dev mode (no email sent)");
                    println!("Preview written: {}", abs.display());
                    println!("Set RESEND_API_KEY and --to (or RESEND_TO_EMAIL) to send.");
                    println!("{}", "-".repeat(50));
                }
            }
            Ok(())
        }
        Commands::Inspect { source, json } => {
            let pages = load_pages(&settings, &source, today).await?;
            let digest = analyze(&settings, &source, &pages, today);
            if json {
                println!("{}", serde_json::to_string_pretty(&digest)?);
            } else {
                print_digest(&pages.club_name, &digest);
            }
            Ok(())
        }
        Commands::Pages { club, season } => {
            let fetcher = Fetcher::new(&settings)?;
            let season = season.unwrap_or_else(|| today.year());
            let first = fetcher.fetch_page(&club, season, 0).await?;
            let doc = scraper::Html::parse_document(&first);
            println!(
                "{}: {} page(s) for season {}",
                parser::page::club_name(&doc, &club),
                parser::page::total_pages(&doc),
                season
            );
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn load_pages(settings: &Settings, source: &Source, today: NaiveDate) -> Result<ClubPages> {
    match &source.sample {
        Some(path) => {
            println!("Loading sample: {}", path);
            Ok(fetcher::load_sample(path, &source.club)?)
        }
        None => {
            let season = source.season.unwrap_or_else(|| today.year());
            let pages = Fetcher::new(settings)?
                .fetch_all(&source.club, season)
                .await
                .with_context(|| format!("Failed to fetch results for club {}", source.club))?;
            println!("Scraped club {} ({} page(s))", source.club, pages.pages.len());
            Ok(pages)
        }
    }
}

fn analyze(settings: &Settings, source: &Source, pages: &ClubPages, today: NaiveDate) -> Digest {
    let days = source.days.unwrap_or(settings.lookback_days);

    let raw = parser::process_pages(&pages.pages);
    println!("  -> {} raw results", raw.len());

    let digest = analyzer::process_results(raw, today, days, &settings.highlight_filter());
    println!("  -> {} recent results ({}d)", digest.recent.len(), days);
    println!("  -> {} highlights", digest.highlights.len());
    info!(club = %pages.club_name, recent = digest.recent.len(), "analysis done");
    digest
}

fn print_digest(club_name: &str, digest: &Digest) {
    println!("\n=== {} ===", club_name);
    if digest.is_empty() {
        println!("No competitions in the window.");
        return;
    }

    println!("\n--- Highlights ---");
    for h in &digest.highlights {
        let r = h.record();
        let tag = if h.is_podium {
            r.place.map(report::ordinal).unwrap_or_default()
        } else {
            r.qualified.map(|q| q.as_str().to_string()).unwrap_or_else(|| r.level.clone())
        };
        println!(
            "{:>4} | {:<24} | {:<22} | {:<12}",
            tag,
            truncate(&r.athlete_name, 24),
            truncate(&r.event, 22),
            r.performance
        );
    }

    println!("\n--- Recent ---");
    println!(
        "{:<5} | {:<16} | {:<24} | {:<22} | {:<12} | {:>5} | {:<5}",
        "Date", "City", "Athlete", "Event", "Perf", "Pts", "Level"
    );
    println!("{}", "-".repeat(106));
    for e in &digest.recent {
        let r = &e.record;
        println!(
            "{:<5} | {:<16} | {:<24} | {:<22} | {:<12} | {:>5} | {:<5}",
            r.date_text,
            truncate(&r.city, 16),
            truncate(&r.athlete_name, 24),
            truncate(&r.event, 22),
            r.performance,
            r.points,
            r.level
        );
    }
    println!("\n{} results | {} highlights", digest.recent.len(), digest.highlights.len());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
