use anyhow::Result;
use clap::Parser;
use flint_fetch::{Config, GitHubFetcher};

/// flint-fetch - GitHub repository facts
///
/// Print the metadata, file tree or release names of a GitHub repository.
///
/// If the GITHUB_TOKEN environment variable is set, it will be used for authentication.
/// This is useful for accessing private repositories or avoiding rate limits.
///
/// Examples:
///   flint-fetch info tyhal/flint        # Description and homepage as JSON
///   flint-fetch tree tyhal/flint        # Every file path on the default branch
///   flint-fetch releases tyhal/flint    # Names of published releases
#[derive(Parser, Debug)]
#[command(author, version = env!("FLINT_FETCH_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", env = "GITHUB_API_URL", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// GitHub token used as a bearer credential
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print the repository description and homepage as JSON
    Info(RepoArgs),

    /// Print every file path in the repository tree, one per line
    Tree(TreeArgs),

    /// Print the names of published releases, one per line
    Releases(RepoArgs),
}

#[derive(clap::Args, Debug)]
pub struct RepoArgs {
    /// The GitHub repository in the format "owner/name"
    #[arg(value_name = "OWNER/NAME")]
    pub repo: String,
}

#[derive(clap::Args, Debug)]
pub struct TreeArgs {
    /// The GitHub repository in the format "owner/name"
    #[arg(value_name = "OWNER/NAME")]
    pub repo: String,

    /// Branch to list instead of the repository's default branch
    #[arg(long, short = 'b')]
    pub branch: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let config = Config::new(cli.api_url, cli.token);
    let client = config.build_client()?;
    let fetcher = GitHubFetcher::with_api_url(Some(&client), &config.api_url);

    match cli.command {
        Commands::Info(args) => {
            let metadata = fetcher.fetch_repository(&args.repo).await?;
            println!("{}", serde_json::to_string_pretty(&metadata)?);
        }
        Commands::Tree(args) => {
            let paths = match args.branch.as_deref() {
                Some(branch) => fetcher.fetch_tree_at(&args.repo, branch).await?,
                None => fetcher.fetch_tree(&args.repo).await?,
            };
            for path in paths {
                println!("{}", path);
            }
        }
        Commands::Releases(args) => {
            for name in fetcher.fetch_releases(&args.repo).await? {
                println!("{}", name);
            }
        }
    }
    Ok(())
}
