use crate::source::DEFAULT_SOURCE;
use crate::types::TypeFilter;
use clap::Parser;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::PathBuf;

lazy_static! {
    static ref DATE_ARG_RE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex");
}

#[derive(Parser, Debug, Clone)]
#[command(name = "bench-viewer")]
#[command(about = "Browse and compare dated benchmark result files")]
#[command(version)]
pub struct CliArgs {
    /// Where the result files live: an http(s) URL serving a directory
    /// listing, or a local directory
    #[arg(long, short = 's', value_name = "URL|DIR", env = "BENCH_VIEWER_SOURCE", default_value = DEFAULT_SOURCE)]
    pub source: String,

    /// Print the available dates and their files, then exit
    #[arg(long)]
    pub list_dates: bool,

    /// Date to show (default: newest available)
    #[arg(long, short = 'd', value_name = "YYYY-MM-DD")]
    pub date: Option<String>,

    /// Date to compare against
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub compare: Option<String>,

    /// Open the drill-down for this component
    #[arg(long, short = 'c', value_name = "NAME")]
    pub component: Option<String>,

    /// Classification shown in the drill-down
    #[arg(long = "type", short = 't', value_enum, default_value_t = TypeFilter::All)]
    pub type_filter: TypeFilter,

    /// Dataset whose files are listed (default: first listed dataset)
    #[arg(long, value_name = "NAME")]
    pub dataset: Option<String>,

    /// Search file and dataset names (case-insensitive) instead of listing a dataset
    #[arg(long, value_name = "TERM")]
    pub search: Option<String>,

    /// Show the detail panel for this file
    #[arg(long, value_name = "NAME")]
    pub file: Option<String>,

    /// Markdown report output path
    #[arg(long = "output-md", value_name = "PATH")]
    pub output_markdown: Option<PathBuf>,

    /// JSON report output path
    #[arg(long = "output-json", value_name = "PATH")]
    pub output_json: Option<PathBuf>,

    /// Override console width for testing (default: auto-detect)
    #[arg(long, value_name = "COLUMNS")]
    pub console_width: Option<usize>,

    /// Exit with status 2 when any component regressed against the comparison
    #[arg(long)]
    pub fail_on_regression: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        let mut args = CliArgs::parse();

        // Treat empty values (e.g. `--compare ""` from scripts) as absent
        for value in [&mut args.date, &mut args.compare, &mut args.dataset, &mut args.search, &mut args.file] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *value = None;
            }
        }

        args
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        for (flag, value) in [("--date", &self.date), ("--compare", &self.compare)] {
            if let Some(date) = value
                && !DATE_ARG_RE.is_match(date)
            {
                return Err(format!("{} expects a date like 2024-01-31, got '{}'", flag, date));
            }
        }

        if self.component.is_none() {
            let needs_component = [
                ("--dataset", self.dataset.is_some()),
                ("--search", self.search.is_some()),
                ("--file", self.file.is_some()),
                ("--type", self.type_filter != TypeFilter::All),
            ];
            if let Some((flag, _)) = needs_component.iter().find(|(_, set)| *set) {
                return Err(format!("{} requires --component", flag));
            }
        }

        if self.console_width == Some(0) {
            return Err("--console-width must be greater than zero".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        let mut full = vec!["bench-viewer"];
        full.extend_from_slice(args);
        CliArgs::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["--source", "results/"]);
        assert_eq!(args.source, "results/");
        assert_eq!(args.type_filter, TypeFilter::All);
        assert!(args.date.is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_type_values() {
        let args = parse(&["-s", "x", "--component", "mesh", "--type", "timeout"]);
        assert_eq!(args.type_filter, TypeFilter::Timeout);
        assert!(args.validate().is_ok());
        assert!(CliArgs::try_parse_from(["bench-viewer", "-s", "x", "--type", "broken"]).is_err());
    }

    #[test]
    fn test_validate_requires_component() {
        for extra in [&["--dataset", "D"][..], &["--search", "x"], &["--file", "f"], &["--type", "valid"]] {
            let mut argv = vec!["-s", "x"];
            argv.extend_from_slice(extra);
            let err = parse(&argv).validate().unwrap_err();
            assert!(err.contains("requires --component"), "{}", err);
        }
    }

    #[test]
    fn test_validate_dates() {
        assert!(parse(&["-s", "x", "--date", "2024-01-31"]).validate().is_ok());
        let err = parse(&["-s", "x", "--compare", "31.01.2024"]).validate().unwrap_err();
        assert!(err.starts_with("--compare"));
        assert!(parse(&["-s", "x", "--date", "2024-1-1"]).validate().is_err());
    }

    #[test]
    fn test_validate_console_width() {
        assert!(parse(&["-s", "x", "--console-width", "0"]).validate().is_err());
        assert!(parse(&["-s", "x", "--console-width", "80"]).validate().is_ok());
    }
}
