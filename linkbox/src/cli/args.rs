// src/cli/args.rs
use crate::domain::caller::CallerId;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// Personal bookmark manager with a bulk-import REST endpoint
pub struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Turn debugging information on
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Runs the HTTP server
    Serve {
        /// Address to listen on, overrides server.bind
        #[arg(short, long, value_name = "ADDR")]
        bind: Option<String>,
    },
    /// Imports bookmarks from a text file: category,title,url,username,defaultBrowser
    Import {
        /// Path to the text file, one bookmark per line
        path: PathBuf,

        #[arg(short = 'u', long = "user", help = "id of the owning user")]
        user: CallerId,

        #[arg(
            short = 's',
            long = "server",
            value_name = "URL",
            help = "submit to a running server instead of the local database"
        )]
        server: Option<String>,

        #[arg(long = "dry-run", help = "only print the parsed records as json")]
        dry_run: bool,
    },
    /// Lists all bookmarks
    List {
        #[arg(short = 'c', long = "category", help = "only bookmarks in this category")]
        category: Option<String>,

        #[arg(
            short = 'u',
            long = "user",
            conflicts_with = "category",
            help = "only bookmarks owned by this user"
        )]
        user: Option<CallerId>,

        #[arg(long = "json", help = "output as json")]
        is_json: bool,
    },
    /// Lists the categories in use
    Categories,
    /// Opens a bookmark in its stored browser, or the system default
    Open {
        /// Bookmark id
        id: i32,
    },
    /// Initializes bookmark database
    CreateDb {
        /// pathname to database file
        path: String,
    },
    /// Prints the default configuration as toml
    Config,
}
