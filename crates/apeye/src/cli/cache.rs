use super::app::{CacheCommands, HttpCacheCommands};
use anyhow::{Context, Result};
use apeye::{Cache, CacheOptions, HttpCache, HttpCacheOptions};
use std::io::Write;
use std::path::Path;
use tracing::info;

fn open_memo(app: &str, root: Option<&Path>) -> Result<Cache> {
    let mut options = CacheOptions::new();
    if let Some(root) = root {
        options = options.dir(root.join(app));
    }
    Cache::with_options(app, options).with_context(|| format!("failed to open cache for '{app}'"))
}

fn open_http(app: &str, root: Option<&Path>) -> Result<HttpCache> {
    let mut options = HttpCacheOptions::new();
    if let Some(root) = root {
        options = options.dir(root.join(app));
    }
    HttpCache::with_options(app, options).with_context(|| format!("failed to open HTTP cache for '{app}'"))
}

pub fn memo(cmd: CacheCommands, root: Option<&Path>, out: &mut impl Write) -> Result<()> {
    match cmd {
        CacheCommands::List(arg) => {
            let cache = open_memo(&arg.app, root)?;
            for name in cache.functions()? {
                writeln!(out, "{name}")?;
            }
        }
        CacheCommands::Show(arg) => {
            let cache = open_memo(&arg.app, root)?;
            let entries = cache
                .entries(&arg.function)
                .with_context(|| format!("failed to read results of '{}'", arg.function))?;
            writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
        }
        CacheCommands::Clear(arg) => {
            let cache = open_memo(&arg.app, root)?;
            let removed = match &arg.function {
                Some(function) => cache.clear_function(function)?,
                None => cache.clear()?,
            };
            info!(app = %arg.app, function = ?arg.function, removed, "cleared cache");
            let target = match &arg.function {
                Some(function) => format!("{}::{function}", arg.app),
                None => arg.app.clone(),
            };
            if removed {
                writeln!(out, "Cleared {target}")?;
            } else {
                writeln!(out, "Nothing to clear for {target}")?;
            }
        }
    }
    Ok(())
}

pub fn http(cmd: HttpCacheCommands, root: Option<&Path>, out: &mut impl Write) -> Result<()> {
    match cmd {
        HttpCacheCommands::Clear(arg) => {
            let cache = open_http(&arg.app, root)?;
            let removed = cache.clear()?;
            info!(app = %arg.app, dir = %cache.cache_dir().display(), removed, "cleared HTTP cache");
            if removed {
                writeln!(out, "Cleared {}", cache.cache_dir().display())?;
            } else {
                writeln!(out, "Nothing to clear for {}", arg.app)?;
            }
        }
    }
    Ok(())
}
