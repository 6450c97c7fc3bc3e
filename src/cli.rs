use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "git-status-report",
    version,
    about = "Create a simple status report for Git repositories under a given path"
)]
pub struct Cli {
    /// Directory to scan for Git repositories (default: current directory)
    pub dir: Option<String>,

    /// Name of output file (default: git-status-report.txt)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Add a timestamp (date_time) tag to the output file name
    #[arg(short, long)]
    pub timestamp: bool,

    /// Print the report as JSON instead of the console summary
    #[arg(long)]
    pub json: bool,

    /// Config file to use instead of the default location
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log each git invocation and its output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults() {
        let cli = Cli::try_parse_from(["git-status-report"]).unwrap();
        assert!(cli.dir.is_none());
        assert!(cli.output.is_none());
        assert!(!cli.timestamp);
        assert!(!cli.json);
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "git-status-report",
            "~/src",
            "-o",
            "out.txt",
            "-t",
            "--json",
            "-c",
            "cfg.toml",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.dir.as_deref(), Some("~/src"));
        assert_eq!(cli.output, Some(PathBuf::from("out.txt")));
        assert!(cli.timestamp);
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("cfg.toml")));
        assert!(cli.verbose);
    }

    #[test]
    fn rejects_extra_positional() {
        assert!(Cli::try_parse_from(["git-status-report", "a", "b"]).is_err());
    }
}
