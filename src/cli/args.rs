// ABOUTME: Command line argument definitions and parsing using Clap
// ABOUTME: Defines the --template and repeatable --set flags plus global logging options

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "kube-render")]
#[command(
    about = "Render a Kubernetes manifest template from environment variables and --set overrides"
)]
#[command(version)]
pub struct Args {
    #[arg(long, value_name = "PATH", help = "Path to the root template file")]
    pub template: PathBuf,

    #[arg(
        long = "set",
        value_name = "KEY=VALUE",
        help = "Override a template variable (repeatable, later values win)"
    )]
    pub set: Vec<String>,

    #[arg(long, help = "Parse the template and resolve variables without rendering")]
    pub check: bool,

    #[arg(long, help = "Fail on template paths that resolve to nothing")]
    pub strict: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short, long, help = "Path to configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
