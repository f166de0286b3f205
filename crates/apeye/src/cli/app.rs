use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Clone, Debug, Parser)]
#[command(name = "apeye", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Root directory holding per-application caches
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(name = "url", about = "Print the components of a URL as JSON")]
    Url(UrlArg),
    #[command(subcommand, alias = "c", name = "cache", about = "Inspect or clear a memoization cache")]
    Cache(CacheCommands),
    #[command(subcommand, alias = "hc", name = "http-cache", about = "Manage an HTTP response cache")]
    HttpCache(HttpCacheCommands),
}

#[derive(Clone, Debug, Args)]
pub struct UrlArg {
    pub url: String,
}

#[derive(Clone, Debug, Subcommand)]
pub enum CacheCommands {
    #[command(alias = "ls", name = "list", about = "List functions with stored results")]
    List(AppArg),
    #[command(name = "show", about = "Print the stored results of a function")]
    Show(ShowArg),
    #[command(alias = "rm", name = "clear", about = "Remove stored results")]
    Clear(CacheClearArg),
}

#[derive(Clone, Debug, Subcommand)]
pub enum HttpCacheCommands {
    #[command(alias = "rm", name = "clear", about = "Remove every cached response")]
    Clear(AppArg),
}

#[derive(Clone, Debug, Args)]
pub struct AppArg {
    pub app: String,
}

#[derive(Clone, Debug, Args)]
pub struct ShowArg {
    pub app:      String,
    pub function: String,
}

#[derive(Clone, Debug, Args)]
pub struct CacheClearArg {
    pub app: String,

    /// Clear only this function
    #[arg(short, long)]
    pub function: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_is_counted_anywhere() {
        let app = App::try_parse_from(["apeye", "-vv", "url", "https://bbc.co.uk"]).unwrap();
        assert_eq!(app.verbose, 2);

        let app = App::try_parse_from(["apeye", "cache", "list", "demo", "-v"]).unwrap();
        assert_eq!(app.verbose, 1);
    }

    #[test]
    fn test_cache_clear_function_flag() {
        let app = App::try_parse_from(["apeye", "cache", "clear", "demo", "--function", "square"]).unwrap();
        let Commands::Cache(CacheCommands::Clear(arg)) = app.cmd else {
            panic!("parsed {:?}", app.cmd);
        };
        assert_eq!(arg.app, "demo");
        assert_eq!(arg.function.as_deref(), Some("square"));
    }

    #[test]
    fn test_aliases_and_global_dir() {
        let app = App::try_parse_from(["apeye", "hc", "rm", "demo", "--cache-dir", "/tmp/x"]).unwrap();
        assert!(matches!(app.cmd, Commands::HttpCache(HttpCacheCommands::Clear(_))));
        assert_eq!(app.cache_dir, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn test_show_requires_function() {
        assert!(App::try_parse_from(["apeye", "cache", "show", "demo"]).is_err());
    }
}
