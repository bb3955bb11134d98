//! Pure filtering and ordering over an in-memory game list.

use std::{cmp::Ordering, fmt, str::FromStr};

use reqwest::Url;

use crate::models::{Game, Platform};

const SUGGESTION_LIMIT: usize = 5;
const SUGGESTION_MIN_CHARS: usize = 2;

/// Orderings selectable through the `sort` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    /// Most recently updated first.
    #[default]
    Newest,
    /// Least recently updated first.
    Oldest,
    /// Title, A to Z.
    Name,
    /// Highest parsed download count first.
    Popular,
    /// Highest rating first.
    Rating,
}

impl SortOrder {
    /// Value used in the query string.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::Name => "name",
            SortOrder::Popular => "popular",
            SortOrder::Rating => "rating",
        }
    }

    /// Label shown next to result counts.
    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Newest => "Newest",
            SortOrder::Oldest => "Oldest First",
            SortOrder::Name => "Name A-Z",
            SortOrder::Popular => "Most Popular",
            SortOrder::Rating => "Highest Rating",
        }
    }

    pub(crate) fn compare(self, a: &Game, b: &Game) -> Ordering {
        match self {
            SortOrder::Newest => b.updated_at.cmp(&a.updated_at),
            SortOrder::Oldest => a.updated_at.cmp(&b.updated_at),
            SortOrder::Name => locale_cmp(&a.title, &b.title),
            SortOrder::Popular => b.download_count().total_cmp(&a.download_count()),
            SortOrder::Rating => b.rating.total_cmp(&a.rating),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "name" => Ok(SortOrder::Name),
            "popular" => Ok(SortOrder::Popular),
            "rating" => Ok(SortOrder::Rating),
            other => Err(format!("unknown sort order '{other}'")),
        }
    }
}

/// Criteria applied by [`apply`]. Empty or absent criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    /// Case-insensitive exact category match.
    pub category: Option<String>,
    /// Platform slug the game must list.
    pub platform: Option<String>,
    /// Case-insensitive substring over title, description and category.
    pub search: Option<String>,
    /// Ordering; `None` keeps the filtered order.
    pub sort: Option<SortOrder>,
    /// Keep only the first N results. Zero means no limit.
    pub limit: Option<usize>,
}

impl FilterOptions {
    /// Restrict to a category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restrict to a platform.
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Restrict to a search term.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Order the results.
    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Truncate the results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Build options from decoded query pairs (`category`, `platform`, `sort`, `q`, `limit`).
    ///
    /// Unknown keys are ignored, and so are unparseable `sort` and `limit` values.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut options = FilterOptions::default();
        for (key, value) in pairs {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "category" => options.category = Some(value.to_string()),
                "platform" => options.platform = Some(value.to_string()),
                "q" => options.search = Some(value.to_string()),
                "sort" => options.sort = value.parse().ok(),
                "limit" => options.limit = value.parse().ok().filter(|limit| *limit > 0),
                _ => {}
            }
        }
        options
    }

    /// Parse a raw, percent-encoded query string such as `category=arcade&q=surf`.
    pub fn from_query(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        match Url::parse("http://gamehub.local/games") {
            Ok(mut url) => {
                url.set_query(Some(query));
                Self::from_query_pairs(url.query_pairs())
            }
            Err(_) => Self::default(),
        }
    }

    /// Render back to a percent-encoded query string, omitting empty criteria.
    pub fn to_query(&self) -> String {
        let Ok(mut url) = Url::parse("http://gamehub.local/games") else {
            return String::new();
        };
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(category) = non_empty(&self.category) {
                pairs.append_pair("category", category);
            }
            if let Some(platform) = non_empty(&self.platform) {
                pairs.append_pair("platform", platform);
            }
            if let Some(sort) = self.sort {
                pairs.append_pair("sort", sort.as_str());
            }
            if let Some(search) = non_empty(&self.search) {
                pairs.append_pair("q", search);
            }
            if let Some(limit) = self.limit.filter(|limit| *limit > 0) {
                pairs.append_pair("limit", &limit.to_string());
            }
        }
        url.query().unwrap_or_default().to_string()
    }
}

/// Filter, order and truncate `games` according to `options`.
pub fn apply(games: &[Game], options: &FilterOptions) -> Vec<Game> {
    let category = non_empty(&options.category).map(str::to_lowercase);
    let platform = non_empty(&options.platform).map(|value| value.parse::<Platform>().ok());
    let search = non_empty(&options.search).map(str::to_lowercase);

    let mut result: Vec<Game> = games
        .iter()
        .filter(|game| {
            category
                .as_deref()
                .map_or(true, |wanted| game.category.to_lowercase() == wanted)
        })
        .filter(|game| match platform {
            None => true,
            Some(Some(wanted)) => game.supports(wanted),
            Some(None) => false,
        })
        .filter(|game| search.as_deref().map_or(true, |needle| matches_search(game, needle)))
        .cloned()
        .collect();

    if let Some(order) = options.sort {
        result.sort_by(|a, b| order.compare(a, b));
    }

    if let Some(limit) = options.limit.filter(|limit| *limit > 0) {
        result.truncate(limit);
    }

    result
}

/// Where a suggested search term came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    /// A game title.
    Title,
    /// A category name.
    Category,
}

/// One search-box suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Term to search for.
    pub term: String,
    /// Title or category.
    pub kind: SuggestionKind,
    /// Games with exactly this title, or in exactly this category.
    pub game_count: usize,
}

/// Search-box suggestions: game titles, then distinct category names, whose
/// text contains `term` case-insensitively. At most five; none for terms
/// shorter than two characters.
pub fn suggest(games: &[Game], term: &str) -> Vec<Suggestion> {
    let needle = term.trim().to_lowercase();
    if needle.chars().count() < SUGGESTION_MIN_CHARS {
        return Vec::new();
    }

    let mut categories: Vec<&str> = Vec::new();
    for game in games {
        if !categories.contains(&game.category.as_str()) {
            categories.push(&game.category);
        }
    }

    let titles = games
        .iter()
        .map(|game| (game.title.as_str(), SuggestionKind::Title));
    let categories = categories
        .into_iter()
        .map(|category| (category, SuggestionKind::Category));

    titles
        .chain(categories)
        .filter(|(text, _)| text.to_lowercase().contains(&needle))
        .take(SUGGESTION_LIMIT)
        .map(|(text, kind)| {
            let game_count = games
                .iter()
                .filter(|game| match kind {
                    SuggestionKind::Title => game.title == text,
                    SuggestionKind::Category => game.category == text,
                })
                .count();
            Suggestion {
                term: text.to_string(),
                kind,
                game_count,
            }
        })
        .collect()
}

/// Number of games per category or platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetCount {
    /// Value as it appears on the games.
    pub name: String,
    /// Lowercase slug for links.
    pub slug: String,
    /// Games carrying the value.
    pub count: usize,
}

/// Count games per category, in first-seen order.
pub fn category_counts(games: &[Game]) -> Vec<FacetCount> {
    tally(games.iter().map(|game| game.category.as_str()))
}

/// Count games per platform, in first-seen order.
pub fn platform_counts(games: &[Game]) -> Vec<FacetCount> {
    tally(
        games
            .iter()
            .flat_map(|game| game.platform.iter().map(|platform| platform.as_str())),
    )
}

fn tally<'a>(values: impl Iterator<Item = &'a str>) -> Vec<FacetCount> {
    let mut counts: Vec<FacetCount> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|entry| entry.name == value) {
            Some(entry) => entry.count += 1,
            None => counts.push(FacetCount {
                name: value.to_string(),
                slug: value.to_lowercase(),
                count: 1,
            }),
        }
    }
    counts
}

fn matches_search(game: &Game, needle: &str) -> bool {
    game.title.to_lowercase().contains(needle)
        || game.description.to_lowercase().contains(needle)
        || game.category.to_lowercase().contains(needle)
}

/// Case-insensitive ordering with a case-sensitive tie-break, close to `localeCompare`.
fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
