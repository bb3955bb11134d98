use anyhow::Result;

use super::Context;

pub fn status(ctx: &Context) -> Result<()> {
    let Some(envelope) = ctx.cache.envelope() else {
        println!("games cache is empty");
        return Ok(());
    };
    let now = ctx.cache.now_millis();
    let age_secs = envelope.age_millis(now) / 1000;
    let state = if envelope.is_fresh(now, ctx.cache.ttl()) {
        "fresh"
    } else {
        "expired"
    };
    println!(
        "{} games cached {}s ago ({state}, ttl {}s)",
        envelope.data.len(),
        age_secs,
        ctx.cache.ttl().as_secs()
    );
    Ok(())
}

pub fn clear(ctx: &Context) -> Result<()> {
    ctx.cache.invalidate()?;
    println!("games cache cleared");
    Ok(())
}
