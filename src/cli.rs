//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Download a file over plain HTTP/1.1.
#[derive(Parser, Debug)]
#[command(name = "rawget")]
#[command(version, about)]
pub struct Args {
    /// URL to download, e.g. http://example.com/file.zip
    pub url: Option<String>,

    /// Download directory
    #[arg(short, long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Output file name
    #[arg(short, long, value_name = "NAME")]
    pub output: Option<PathBuf>,

    /// Rewrite if file exists
    #[arg(short, long)]
    pub rewrite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_url_and_flags() {
        let args = Args::try_parse_from([
            "rawget",
            "-d",
            "downloads",
            "--output",
            "page.html",
            "-r",
            "http://example.com/index.html",
        ])
        .unwrap();

        assert_eq!(args.url.as_deref(), Some("http://example.com/index.html"));
        assert_eq!(args.directory, Some(PathBuf::from("downloads")));
        assert_eq!(args.output, Some(PathBuf::from("page.html")));
        assert!(args.rewrite);
    }

    #[test]
    fn test_cli_url_is_optional() {
        let args = Args::try_parse_from(["rawget"]).unwrap();
        assert!(args.url.is_none());
        assert!(!args.rewrite);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["rawget", "-h"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let err = Args::try_parse_from(["rawget", "--invalid-flag"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
