use clap::{Parser, Subcommand, Args};

#[derive(Parser)]
#[command(name = "perfreport", version, about = "Turns page-performance audits into a costed remediation plan")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Analyze one URL and print the report
    Analyze(AnalyzeArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(long, default_value = "8080")]
    pub port: u16,

    /// Listen address
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,
}

#[derive(Args, Clone)]
pub struct AnalyzeArgs {
    /// Page URL to audit
    #[arg(short, long)]
    pub url: String,

    /// Report identifier (generated when omitted)
    #[arg(long)]
    pub guid: Option<String>,

    /// Average pages viewed per visit
    #[arg(long, default_value = "1")]
    pub pages_per_visit: f64,

    /// Ads shown per page
    #[arg(long, default_value = "1")]
    pub ads_per_page: i64,

    /// Monthly visitors
    #[arg(long, default_value = "0")]
    pub visitors: f64,

    /// Audit passes (overrides lighthouse.passes)
    #[arg(long)]
    pub passes: Option<u32>,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Print the report without writing it to storage
    #[arg(long)]
    pub no_store: bool,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "perfreport", "analyze", "--url", "https://example.com",
            "--visitors", "10000", "--ads-per-page", "2", "--no-store",
        ]).unwrap();
        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.url, "https://example.com");
                assert_eq!(args.visitors, 10000.0);
                assert_eq!(args.ads_per_page, 2);
                assert_eq!(args.pages_per_visit, 1.0);
                assert!(args.no_store);
                assert!(args.guid.is_none());
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["perfreport", "serve", "-vv", "--log-json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.log_json);
    }

    #[test]
    fn test_analyze_requires_url() {
        assert!(Cli::try_parse_from(["perfreport", "analyze"]).is_err());
    }
}
