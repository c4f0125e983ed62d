use clap::{ArgAction, Parser, Subcommand};
use crossrate_models::SiteName;
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "crossrate")]
#[command(about = "Crossrate - IMDb and Rotten Tomatoes ratings, side by side")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors and results
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write logs to a daily-rotated file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn parse_site(s: &str) -> Result<SiteName, String> {
    s.parse::<SiteName>().map_err(|e| e.to_string())
}

#[derive(Subcommand)]
enum Commands {
    /// Show a movie page's ratings next to the other site's
    #[command(long_about = "Fetch an IMDb or Rotten Tomatoes movie page, read which movie it is, find the same movie on the other site and print both sets of ratings.")]
    Lookup {
        /// Movie page URL
        #[arg(long)]
        url: String,

        /// Site of the page (imdb, rotten); recognized from the URL when omitted
        #[arg(long, value_parser = parse_site)]
        site: Option<SiteName>,
    },
    /// Look a movie up on one site by title
    #[command(long_about = "Send a lookup request for a movie identity straight to the resolver and print the ratings found on the target site.")]
    Resolve {
        /// Movie title
        #[arg(long)]
        title: String,

        /// Release year
        #[arg(long)]
        year: Option<u16>,

        /// Director
        #[arg(long)]
        director: Option<String>,

        /// Site to look the movie up on (imdb, rotten)
        #[arg(long, value_parser = parse_site)]
        target: SiteName,
    },
    /// Inject the other site's ratings into a movie page
    #[command(long_about = "Like lookup, then insert the remote ratings into the fetched page and write the resulting HTML to --out (or stdout).")]
    Inject {
        /// Movie page URL
        #[arg(long)]
        url: String,

        /// Site of the page (imdb, rotten); recognized from the URL when omitted
        #[arg(long, value_parser = parse_site)]
        site: Option<SiteName>,

        /// File to write the modified page to
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Locale used to format injected numbers (e.g. de-DE); overrides config
        #[arg(long)]
        locale: Option<String>,
    },
    /// Answer JSON lookup requests, one per stdin line
    #[command(long_about = "Read one lookup request per line from stdin ({\"movieInfo\": {...}, \"remotePageName\": \"rotten\"}) and write one JSON response per line to stdout.")]
    Message,
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file without asking
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
    /// Print the configuration file location
    Path,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);
    let config_path = cli.config.as_ref();

    let result = match cli.command {
        Commands::Lookup { url, site } => commands::lookup::run_lookup(&url, site, config_path, &output).await,
        Commands::Resolve {
            title,
            year,
            director,
            target,
        } => commands::resolve::run_resolve(title, year, director, target, config_path, &output).await,
        Commands::Inject { url, site, out, locale } => {
            commands::inject::run_inject(&url, site, out, locale, config_path, &output).await
        }
        Commands::Message => commands::message::run_message(config_path, &output).await,
        Commands::Config { cmd } => commands::config::run_config(cmd, config_path, &output).await,
    };

    // JSON consumers get the failure as a JSON document instead of a report
    match result {
        Err(e) if !output.is_human() => {
            output.error(format!("{:#}", e));
            std::process::exit(1);
        }
        other => other,
    }
}
