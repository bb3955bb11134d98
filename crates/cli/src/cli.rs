use clap::{Parser, Subcommand};
use gamehub_core::{filter::SortOrder, models::NotificationKind, Platform};

#[derive(Parser, Debug)]
#[command(name = "gamehub")]
#[command(about = "Browse and administer the GameHub catalog")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Read data from this base URL instead of the configured source
    #[arg(long, global = true, conflicts_with = "data_dir")]
    pub data_url: Option<String>,

    /// Read data from this directory instead of the configured source
    #[arg(long, global = true)]
    pub data_dir: Option<std::path::PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List games, filtered and sorted
    Games {
        /// Only games in this category
        #[arg(long, short = 'c')]
        category: Option<String>,

        /// Only games available on this platform
        #[arg(long, short = 'p')]
        platform: Option<Platform>,

        /// Ordering: newest, oldest, name, popular, rating
        #[arg(long, short = 's')]
        sort: Option<SortOrder>,

        /// Search title, description and category
        #[arg(long)]
        q: Option<String>,

        /// Show at most N games
        #[arg(long, short = 'n')]
        limit: Option<usize>,

        /// Page query string, e.g. "category=racing&sort=popular"
        #[arg(long)]
        query: Option<String>,
    },

    /// Show one game and its download link
    Show {
        /// Game slug
        slug: String,
    },

    /// Search-box suggestions for a partial title
    Suggest {
        /// Search term (at least two characters)
        term: String,
    },

    /// Search interactively: one term per line on stdin
    Search,

    /// List categories
    Categories,

    /// List platforms
    Platforms,

    /// List WhatsApp channels
    Channels {
        /// Only channels in this category
        #[arg(long, short = 'c')]
        category: Option<String>,

        /// Show the N largest channels
        #[arg(long)]
        popular: Option<usize>,

        /// Print the invite link of this channel id
        #[arg(long, conflicts_with_all = ["category", "popular"])]
        join: Option<String>,
    },

    /// List notifications
    Notifications {
        /// Only unread notifications
        #[arg(long, conflicts_with = "kind")]
        unread: bool,

        /// Only one kind: new_game, update, announcement, whatsapp, maintenance
        #[arg(long, short = 'k')]
        kind: Option<NotificationKind>,
    },

    /// Admin views over the catalog
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },

    /// Inspect or clear the local games cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Paged game table
    List {
        /// Search title, description and category
        #[arg(long)]
        search: Option<String>,

        /// Exact category, or "all"
        #[arg(long, short = 'c', default_value = "all")]
        category: String,

        /// draft, published or "all"
        #[arg(long, default_value = "all")]
        status: String,

        /// Ordering: newest, oldest, name, popular, rating
        #[arg(long, short = 's', default_value = "newest")]
        sort: SortOrder,

        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,
    },

    /// Dashboard counters
    Stats,

    /// Send a notification to the in-process notification centre
    Notify {
        /// Notification kind
        #[arg(long, short = 'k', default_value = "announcement")]
        kind: NotificationKind,

        /// Title
        #[arg(long)]
        title: String,

        /// Message body
        #[arg(long)]
        message: String,

        /// Optional link
        #[arg(long)]
        link: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Show age and size of the cached game list
    Status,
    /// Drop the cached game list
    Clear,
}
