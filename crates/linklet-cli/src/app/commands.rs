use crate::app::{config::AppConfig, config::Command, store::FileStore};
use anyhow::Context;
use linklet::{
    Components, HostIdentity, LockSnowflakeGenerator, MemoryCache, NodeId, NodeIdResolver,
    ShortCode, Shortener, SnowflakeId, SnowflakeLayout, WallClock,
};
use serde::Serialize;
use std::process::ExitCode;

type AppShortener = Shortener<FileStore, MemoryCache, WallClock>;

/// Decoded view of a short code, printed by `inspect`.
#[derive(Debug, Serialize)]
struct Inspection<'a> {
    code: &'a str,
    id: SnowflakeId,
    #[serde(flatten)]
    components: Components,
    unix_ms: u64,
}

pub async fn run(config: AppConfig) -> anyhow::Result<ExitCode> {
    match &config.command {
        Command::Shorten { target, owner } => {
            let shortener = build_shortener(&config)?;
            let created = shortener
                .create(target, owner.as_deref())
                .await
                .context("failed to shorten target")?;
            println!("{}", created.record.code);
        }
        Command::Resolve { code } => {
            let shortener = build_shortener(&config)?;
            let resolution = shortener
                .resolve(code)
                .await
                .with_context(|| format!("failed to resolve {code}"))?;
            match resolution.into_target() {
                Some(target) => println!("{target}"),
                None => {
                    eprintln!("no mapping for {code}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Command::Inspect { code } => {
            let line = inspect(config.layout, config.epoch_ms(), code)?;
            println!("{line}");
        }
        Command::History { owner } => {
            let shortener = build_shortener(&config)?;
            for record in shortener.history(owner).await? {
                println!("{}", serde_json::to_string(&record)?);
            }
        }
        Command::NodeId => println!("{}", resolve_node_id(&config)?),
    }

    Ok(ExitCode::SUCCESS)
}

fn resolve_node_id(config: &AppConfig) -> anyhow::Result<NodeId> {
    let node_id = NodeIdResolver::new(config.layout)
        .configured(config.node_id)
        .source(HostIdentity)
        .resolve()?;
    Ok(node_id)
}

fn build_shortener(config: &AppConfig) -> anyhow::Result<AppShortener> {
    let node_id = resolve_node_id(config)?;
    tracing::info!(
        node_id = node_id.value(),
        degraded = node_id.is_degraded(),
        store = %config.store_path.display(),
        "starting linklet"
    );

    let generator = LockSnowflakeGenerator::new(
        config.layout,
        node_id.value(),
        WallClock::with_epoch(config.epoch),
    )?;

    Ok(Shortener::new(
        generator,
        FileStore::new(&config.store_path),
        MemoryCache::new(),
    )
    .with_cache_ttl(config.cache_ttl))
}

fn inspect(layout: SnowflakeLayout, epoch_ms: u64, code: &str) -> anyhow::Result<String> {
    let short = ShortCode::parse(code).with_context(|| format!("invalid short code {code:?}"))?;
    let id = SnowflakeId::from(short.to_u64());
    let components = layout.decompose(id);
    let inspection = Inspection {
        code: short.as_str(),
        id,
        components,
        unix_ms: epoch_ms.saturating_add(components.timestamp),
    };
    Ok(serde_json::to_string(&inspection)?)
}
