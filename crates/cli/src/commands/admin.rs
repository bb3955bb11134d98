use std::sync::Arc;

use anyhow::{anyhow, Result};
use gamehub_core::{
    admin::{AdminQuery, AdminStore, NotificationDraft, Outbox},
    models::NotificationKind,
    notifications::{self, LogNotifier, NotificationCenter},
    GameStatus, SortOrder,
};

use super::{catalog::print_games, community::print_notification, Context};

pub struct ListArgs {
    pub search: Option<String>,
    pub category: String,
    pub status: String,
    pub sort: SortOrder,
    pub page: usize,
}

async fn store(ctx: &Context) -> Result<AdminStore> {
    let catalog = ctx.catalog().await?;
    Ok(AdminStore::new(catalog.games()))
}

pub async fn list(ctx: &Context, args: ListArgs) -> Result<()> {
    let status = match args.status.trim() {
        "" | "all" => None,
        other => Some(other.parse::<GameStatus>().map_err(|err| anyhow!(err))?),
    };
    let query = AdminQuery {
        search: args.search.unwrap_or_default(),
        category: args.category,
        status,
        sort: args.sort,
    };

    let page = store(ctx).await?.page(&query, args.page);
    print_games(&page.items);
    println!(
        "\npage {}/{} ({} games)",
        page.page, page.total_pages, page.total_items
    );
    Ok(())
}

pub async fn stats(ctx: &Context) -> Result<()> {
    let stats = store(ctx).await?.stats();
    println!("total      {}", stats.total);
    println!("published  {}", stats.published);
    println!("drafts     {}", stats.drafts);
    println!("featured   {}", stats.featured);
    Ok(())
}

pub async fn notify(
    ctx: &Context,
    kind: NotificationKind,
    title: String,
    message: String,
    link: Option<String>,
) -> Result<()> {
    let center = NotificationCenter::new(Arc::new(LogNotifier::granted()));
    center.load(ctx.source.as_ref()).await;

    let (publisher, mut receiver) = notifications::channel(8);
    let outbox = Outbox::new(publisher);
    let draft = NotificationDraft {
        kind,
        title,
        message,
        link: link.unwrap_or_default(),
        ..NotificationDraft::default()
    };
    let sent = outbox.send(&draft).await?;
    center.drain(&mut receiver);

    println!("{} {} ({})", sent.id, sent.title, sent.status.as_str());
    if let Some(latest) = center.notifications().first() {
        print_notification(latest);
    }
    println!("\n{} unread", center.unread_count());
    Ok(())
}
