use clap::{Args, Parser, Subcommand};
use domain::products::{CompetitionLevel, ProductFilters, Recommendation};
use domain::Id;
use service::config::Config;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "catalogai",
    about = "Command line client for the CatalogAI backend",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and keep the session for later commands
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CATALOGAI_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in with it
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CATALOGAI_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show dashboard totals and recent catalogs
    Dashboard,
    #[command(subcommand)]
    Catalogs(CatalogCommand),
    #[command(subcommand)]
    Products(ProductCommand),
    #[command(subcommand)]
    Reports(ReportCommand),
    #[command(subcommand)]
    Subscription(SubscriptionCommand),
    /// Price marketplace links without uploading a catalog
    AnalyzeLinks {
        /// Links to analyze
        links: Vec<String>,
        /// Also read links from this file, one per line
        #[arg(long)]
        from_file: Option<PathBuf>,
        /// Supplier cost applied to every link
        #[arg(long)]
        cost: f64,
        #[arg(long, default_value_t = 0.0)]
        tax_rate: f64,
        #[arg(long, default_value_t = 0.0)]
        extra_costs: f64,
    },
}

/// Supplier catalog uploads and their analysis
#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    Show {
        id: Id,
    },
    Upload {
        /// Catalog file (spreadsheet, CSV or PDF)
        file: PathBuf,
        #[arg(long)]
        tax_rate: f64,
        #[arg(long, default_value_t = 0.0)]
        extra_costs: f64,
        /// Marketplace listing to compare against; repeatable
        #[arg(long = "ml-link")]
        ml_links: Vec<String>,
    },
    Start {
        id: Id,
    },
    Pause {
        id: Id,
    },
    Resume {
        id: Id,
    },
    Cancel {
        id: Id,
    },
    Reanalyze {
        id: Id,
    },
    Delete {
        id: Id,
    },
    Logs {
        id: Id,
    },
}

/// Analyzed products
#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    List {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    Favorite {
        #[arg(required = true)]
        ids: Vec<Id>,
    },
    Unfavorite {
        #[arg(required = true)]
        ids: Vec<Id>,
    },
    Delete {
        #[arg(required = true)]
        ids: Vec<Id>,
    },
    /// Download matching products as CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Aggregated analysis results
#[derive(Debug, Subcommand)]
pub enum ReportCommand {
    Stats {
        #[command(flatten)]
        filters: FilterArgs,
    },
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Plans, usage and billing
#[derive(Debug, Subcommand)]
pub enum SubscriptionCommand {
    Plans,
    Current,
    Usage,
    /// Start a hosted checkout for a plan and print its URL
    Checkout {
        plan_id: String,
        #[arg(long)]
        success_url: String,
        #[arg(long)]
        cancel_url: String,
    },
    Cancel,
}

#[derive(Debug, Args)]
pub struct PageArgs {
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    /// Write the file here instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    #[arg(long)]
    pub catalog_id: Option<Id>,
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub recommendation: Option<Recommendation>,
    #[arg(long)]
    pub competition_level: Option<CompetitionLevel>,
    #[arg(long)]
    pub favorites_only: bool,
    #[arg(long)]
    pub min_margin: Option<f64>,
    #[arg(long)]
    pub max_margin: Option<f64>,
}

impl From<FilterArgs> for ProductFilters {
    fn from(args: FilterArgs) -> Self {
        ProductFilters {
            catalog_id: args.catalog_id,
            search: args.search,
            recommendation: args.recommendation,
            competition_level: args.competition_level,
            favorites_only: args.favorites_only.then_some(true),
            min_margin: args.min_margin,
            max_margin: args.max_margin,
        }
    }
}
