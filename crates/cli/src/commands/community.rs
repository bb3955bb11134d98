use std::sync::Arc;

use anyhow::Result;
use gamehub_core::{
    downloads::format_count,
    models::{Notification, NotificationKind, WhatsAppChannel},
    notifications::{LogNotifier, NotificationCenter, NotificationFilter},
    ChannelDirectory,
};

use super::{truncate, Context};

pub async fn channels(
    ctx: &Context,
    category: Option<String>,
    popular: Option<usize>,
    join: Option<String>,
) -> Result<()> {
    let directory = ChannelDirectory::new();
    directory.load(ctx.source.as_ref()).await;

    if let Some(id) = join {
        println!("{}", directory.join(&id)?);
        return Ok(());
    }

    let channels = match (category, popular) {
        (Some(category), _) => directory.by_category(&category),
        (None, Some(limit)) => directory.popular(limit),
        (None, None) => directory.channels(),
    };
    for channel in &channels {
        print_channel(channel);
    }

    let stats = directory.stats();
    println!(
        "\n{} channels, {} members, most popular: {}",
        stats.total_channels,
        format_count(stats.total_members),
        if stats.most_popular.is_empty() { "-" } else { stats.most_popular.as_str() }
    );
    Ok(())
}

fn print_channel(channel: &WhatsAppChannel) {
    println!(
        "{:>3} {} {:<24} {:>8}  {}",
        channel.id,
        channel.icon,
        truncate(&channel.name, 24),
        channel.members,
        truncate(&channel.description, 40)
    );
}

pub async fn notifications(
    ctx: &Context,
    unread: bool,
    kind: Option<NotificationKind>,
) -> Result<()> {
    let center = NotificationCenter::new(Arc::new(LogNotifier::default()));
    center.load(ctx.source.as_ref()).await;

    let filter = match (unread, kind) {
        (true, _) => NotificationFilter::Unread,
        (false, Some(kind)) => NotificationFilter::Kind(kind),
        (false, None) => NotificationFilter::All,
    };
    let listed = center.filtered(filter);
    if listed.is_empty() {
        println!("no notifications");
    }
    for notification in &listed {
        print_notification(notification);
    }

    let counts: Vec<String> = center
        .counts()
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(kind, count)| format!("{kind} {count}"))
        .collect();
    println!(
        "\n{} unread of {} ({})",
        center.unread_count(),
        center.notifications().len(),
        counts.join(", ")
    );
    Ok(())
}

pub(crate) fn print_notification(notification: &Notification) {
    let marker = if notification.read { ' ' } else { '*' };
    println!(
        "{marker} {} {:<36} {:<13} {}",
        notification.icon,
        truncate(&notification.title, 36),
        notification.kind.as_str(),
        notification.timestamp.format("%Y-%m-%d %H:%M")
    );
    println!("    {}", truncate(&notification.message, 72));
}
