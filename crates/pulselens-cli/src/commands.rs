//! Command handlers for the CLI.
//!
//! `run` owns the session lifecycle: sign in when credentials are given,
//! hand the bearer token to the row client, and sign out on the way back.
//! The report command fetches a single topic and propagates fetch errors;
//! the all-sources views fetch every table and skip failed ones.

use std::path::{Path, PathBuf};
use std::time::Duration;

use pulselens_client::{AuthClient, RowClient, SessionManager};
use pulselens_core::AppConfig;
use pulselens_views::export::{report_csv, report_filename, today_csv, today_filename};
use pulselens_views::filter::{filter_account_groups, filter_date_groups};
use pulselens_views::{
    filter_by_date_range, filter_by_text, group_by_account, group_by_date, group_by_recency,
    utc_today, Stats,
};

use crate::{Cli, Commands};

pub(crate) async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    let auth = AuthClient::new(
        &config.project_url,
        &config.api_key,
        config.request_timeout_secs,
    )?;
    let mut sessions = SessionManager::new(Duration::from_millis(config.idle_timeout_ms));
    sessions.subscribe(|event| tracing::info!(?event, "session changed"));

    if let (Some(email), Some(password)) = (cli.email.as_deref(), cli.password.as_deref()) {
        let session = auth.sign_in(email, password).await?;
        tracing::info!(
            email = session
                .user
                .as_ref()
                .and_then(|u| u.email.as_deref())
                .unwrap_or(email),
            "signed in"
        );
        sessions.set_session(session);
    }

    let mut rows = RowClient::new(
        &config.project_url,
        &config.api_key,
        config.request_timeout_secs,
    )?;
    if let Some(session) = sessions.session() {
        rows = rows.with_bearer(&session.access_token);
    }

    let result = match cli.command {
        Commands::Report {
            topic,
            from,
            to,
            query,
            out,
        } => report(&rows, config, topic, from, to, query, out).await,
        Commands::Accounts { query } => accounts(&rows, config, query.as_deref()).await,
        Commands::Timeline { query } => timeline(&rows, config, query.as_deref()).await,
        Commands::Today { out } => today(&rows, config, out).await,
    };

    if let Some(session) = sessions.clear() {
        if let Err(e) = auth.sign_out(&session.access_token).await {
            tracing::warn!(error = %e, "sign-out failed");
        }
    }

    result
}

/// Single-topic report: date range + text filter, stats, optional CSV export.
///
/// Fetch failures propagate — this path does not degrade to an empty result.
async fn report(
    rows: &RowClient,
    config: &AppConfig,
    topic: Option<String>,
    from: Option<String>,
    to: Option<String>,
    query: Option<String>,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let topic = topic.unwrap_or_else(|| config.tables[0].clone());
    if !config.tables.contains(&topic) {
        anyhow::bail!("unknown topic '{topic}' (configured: {})", config.tables.join(", "));
    }

    let posts = rows.fetch_posts(&topic).await?;
    let dated = filter_by_date_range(&posts, from.as_deref(), to.as_deref());
    let stats = Stats::compute(&dated);
    let visible = filter_by_text(&dated, query.as_deref().unwrap_or(""));

    println!("Report: {topic}");
    println!(
        "  {} narratives ({} fetched), {} engagements, {} active accounts",
        visible.len(),
        posts.len(),
        stats.total_engagements,
        stats.unique_accounts
    );
    for post in &visible {
        println!(
            "  {}  {:<20} {:<10} {:>8}  {}",
            if post.date.is_empty() { "no date   " } else { post.date.as_str() },
            post.handle,
            post.platform,
            post.engagements,
            snippet(&post.narrative)
        );
    }

    if let Some(path) = out {
        write_csv(&path, &report_csv(&visible))?;
        println!(
            "Wrote {} rows to {} (suggested name: {})",
            visible.len(),
            path.display(),
            report_filename(&topic, utc_today())
        );
    }

    Ok(())
}

/// Account groups across all sources, most active first.
async fn accounts(rows: &RowClient, config: &AppConfig, query: Option<&str>) -> anyhow::Result<()> {
    let posts = rows.fetch_all_posts(&config.tables).await;
    let groups = group_by_account(&posts);
    let groups = filter_account_groups(&groups, query.unwrap_or(""));

    println!("{} accounts", groups.len());
    for group in &groups {
        println!("{} ({}) — {} entries", group.handle, group.account_name, group.count);
        println!(
            "  activity: {}, {} engagements",
            group.summary.date_range, group.summary.total_engagements
        );
        if !group.summary.top_keywords.is_empty() {
            println!("  key themes: {}", group.summary.top_keywords.join(", "));
        }
    }

    Ok(())
}

/// Date groups across all sources, newest first.
async fn timeline(rows: &RowClient, config: &AppConfig, query: Option<&str>) -> anyhow::Result<()> {
    let posts = rows.fetch_all_posts(&config.tables).await;
    let groups = group_by_date(&posts);
    let groups = filter_date_groups(&groups, query.unwrap_or(""));

    println!("{} dates", groups.len());
    for group in &groups {
        println!("{} — {} entries", group.display_date, group.count);
        println!(
            "  {} accounts, {} engagements, platforms: {}",
            group.summary.unique_accounts,
            group.summary.total_engagements,
            group.summary.top_platforms.join(", ")
        );
    }

    Ok(())
}

/// Recency view: yesterday + today per source table, optional CSV export.
async fn today(rows: &RowClient, config: &AppConfig, out: Option<PathBuf>) -> anyhow::Result<()> {
    let posts = rows.fetch_all_posts(&config.tables).await;
    let today = utc_today();
    let groups = group_by_recency(&posts, &config.tables, today);

    let total: usize = groups.iter().map(|g| g.count).sum();
    println!("Today's data — {total} entries across {} tables", groups.len());
    for group in &groups {
        println!(
            "{}: {} entries, {} accounts, {} engagements",
            group.table_name, group.count, group.unique_accounts, group.total_engagements
        );
        for entry in &group.entries {
            println!(
                "  {:<20} {:>8}  {}",
                entry.handle,
                entry.engagements,
                snippet(&entry.narrative)
            );
        }
    }

    if let Some(path) = out {
        write_csv(&path, &today_csv(&groups))?;
        println!(
            "Wrote export to {} (suggested name: {})",
            path.display(),
            today_filename(today)
        );
    }

    Ok(())
}

fn write_csv(path: &Path, csv: &str) -> anyhow::Result<()> {
    std::fs::write(path, csv)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))
}

/// First line of a narrative, shortened for terminal output.
fn snippet(narrative: &str) -> String {
    const MAX: usize = 80;
    let line = narrative.lines().next().unwrap_or("");
    if line.chars().count() <= MAX {
        line.to_string()
    } else {
        let cut: String = line.chars().take(MAX).collect();
        format!("{cut}…")
    }
}
