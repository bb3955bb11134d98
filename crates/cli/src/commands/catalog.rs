use std::io::BufRead;

use anyhow::Result;
use gamehub_core::{
    debounce::debounce,
    downloads::format_count,
    filter::SuggestionKind,
    resource::{loader::orphaned_games, ResourceLoader},
    FilterOptions, Game, Platform, SortOrder,
};
use tokio::sync::mpsc;
use tracing::warn;

use super::{truncate, Context};

pub struct GamesArgs {
    pub category: Option<String>,
    pub platform: Option<Platform>,
    pub sort: Option<SortOrder>,
    pub q: Option<String>,
    pub limit: Option<usize>,
    pub query: Option<String>,
}

impl GamesArgs {
    /// Query string first, explicit flags on top.
    fn filters(self) -> FilterOptions {
        let mut filters = self
            .query
            .as_deref()
            .map(FilterOptions::from_query)
            .unwrap_or_default();
        if let Some(category) = self.category {
            filters = filters.category(category);
        }
        if let Some(platform) = self.platform {
            filters = filters.platform(platform.as_str());
        }
        if let Some(sort) = self.sort {
            filters = filters.sort(sort);
        }
        if let Some(q) = self.q {
            filters = filters.search(q);
        }
        if let Some(limit) = self.limit {
            filters = filters.limit(limit);
        }
        filters
    }
}

pub async fn games(ctx: &Context, args: GamesArgs) -> Result<()> {
    let catalog = ctx.catalog().await?;
    let filters = args.filters();
    catalog.set_filters(filters.clone());

    let games = catalog.filtered_games();
    print_games(&games);
    let query = filters.to_query();
    println!(
        "\n{} of {} games, {} downloads{}",
        games.len(),
        catalog.games().len(),
        format_count(catalog.total_downloads()),
        if query.is_empty() {
            String::new()
        } else {
            format!(" (?{query})")
        }
    );
    Ok(())
}

pub async fn show(ctx: &Context, slug: &str) -> Result<()> {
    let catalog = ctx.catalog().await?;
    let game = catalog.find_by_slug(slug)?;
    let platforms: Vec<&str> = game.platform.iter().map(|p| p.as_str()).collect();

    println!("{}  ({})", game.title, game.slug);
    println!("  category   {}", game.category);
    println!("  platforms  {}", platforms.join(", "));
    println!("  version    {} ({})", game.version, game.size);
    println!("  rating     {:.1}", game.rating);
    println!("  downloads  {}", game.downloads);
    println!("  updated    {}", game.updated_at.format("%Y-%m-%d"));
    println!(
        "  status     {}{}",
        game.status.as_str(),
        if game.featured { ", featured" } else { "" }
    );
    println!();
    println!("{}", game.description);
    println!();
    println!("download: {}", catalog.download_link(slug)?);
    Ok(())
}

pub async fn suggest(ctx: &Context, term: &str) -> Result<()> {
    let catalog = ctx.catalog().await?;
    let suggestions = catalog.suggestions(term);
    if suggestions.is_empty() {
        println!("no suggestions");
    }
    for suggestion in suggestions {
        let count = match suggestion.kind {
            SuggestionKind::Title => format!("{} games", suggestion.game_count),
            SuggestionKind::Category => format!("{} games in category", suggestion.game_count),
        };
        println!("{:<32} {}", suggestion.term, count);
    }
    Ok(())
}

/// Apply each search term typed on stdin once typing pauses.
pub async fn search(ctx: &Context) -> Result<()> {
    let catalog = ctx.catalog().await?;
    let (sender, receiver) = mpsc::channel(32);
    let reader = tokio::task::spawn_blocking(move || -> Result<()> {
        for line in std::io::stdin().lock().lines() {
            if sender.blocking_send(line?).is_err() {
                break;
            }
        }
        Ok(())
    });

    let recent = ctx.recent.list();
    if !recent.is_empty() {
        println!("recent: {}", recent.join(", "));
    }

    let mut terms = debounce(receiver, ctx.search_debounce);
    while let Some(term) = terms.recv().await {
        let term = term.trim().to_string();
        if let Err(err) = ctx.recent.record(&term) {
            warn!("failed to save recent search: {err}");
        }
        catalog.set_filters(FilterOptions::default().search(term.as_str()));
        let games = catalog.filtered_games();
        println!("-- \"{term}\": {} matches", games.len());
        print_games(&games);
    }
    reader.await??;
    Ok(())
}

pub async fn categories(ctx: &Context) -> Result<()> {
    let loader = ResourceLoader::new(ctx.source.clone());
    let categories = loader.categories().await?;
    let catalog = ctx.catalog().await?;
    let counts = catalog.categories();

    for category in &categories {
        let loaded = counts
            .iter()
            .find(|facet| facet.slug.eq_ignore_ascii_case(&category.slug))
            .map_or(0, |facet| facet.count);
        println!(
            "{} {:<16} {:>4} listed {:>4} loaded  {}",
            category.icon,
            category.name,
            category.game_count,
            loaded,
            truncate(&category.description, 48)
        );
    }

    let games = catalog.games();
    let orphans = orphaned_games(&games, &categories);
    if !orphans.is_empty() {
        println!("\n{} games reference unknown categories", orphans.len());
    }
    Ok(())
}

pub async fn platforms(ctx: &Context) -> Result<()> {
    let loader = ResourceLoader::new(ctx.source.clone());
    for platform in loader.platforms().await? {
        println!(
            "{} {:<10} {:>4} games  {}",
            platform.icon,
            platform.name,
            platform.game_count,
            truncate(&platform.description, 48)
        );
    }
    Ok(())
}

pub(crate) fn print_games(games: &[Game]) {
    if games.is_empty() {
        println!("no games match");
        return;
    }
    for game in games {
        let platforms: Vec<&str> = game.platform.iter().map(|p| p.as_str()).collect();
        println!(
            "{:<32} {:<12} {:<20} {:>3.1} {:>8}  {}",
            truncate(&game.title, 32),
            game.category,
            platforms.join(","),
            game.rating,
            game.downloads,
            game.updated_at.format("%Y-%m-%d")
        );
    }
}
