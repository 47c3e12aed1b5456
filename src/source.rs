/// Result file sources
///
/// This module handles:
/// - HTTP requests for the directory listing and result files
/// - Parsing anchors out of an HTML directory listing
/// - Reading the same layout from a local directory
use crate::error::SourceError;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

const USER_AGENT: &str = concat!("bench-viewer/", env!("CARGO_PKG_VERSION"));

/// Default location of the result files, relative to the dashboard root
pub const DEFAULT_SOURCE: &str = "benchmark/json_results/";

lazy_static! {
    static ref HREF_RE: Regex = Regex::new(r#"(?i)<a\s[^>]*?href\s*=\s*["']([^"']+)["']"#).expect("valid href regex");
}

/// Where result files live
#[derive(Debug, Clone)]
pub enum ResultSource {
    /// Base URL of a served directory with an HTML index page
    Http { base_url: String, agent: ureq::Agent },
    /// Local directory holding the JSON files
    Local { dir: PathBuf },
}

impl ResultSource {
    /// Interpret a `--source` argument: http(s) URLs are fetched, anything else
    /// (including `file://` URLs) is a local directory.
    pub fn parse(spec: &str) -> Self {
        if spec.starts_with("http://") || spec.starts_with("https://") {
            let base_url = if spec.ends_with('/') { spec.to_string() } else { format!("{}/", spec) };
            let agent = ureq::AgentBuilder::new().user_agent(USER_AGENT).timeout(Duration::from_secs(60)).build();
            ResultSource::Http { base_url, agent }
        } else {
            let path = spec.strip_prefix("file://").unwrap_or(spec);
            ResultSource::Local { dir: PathBuf::from(path) }
        }
    }

    /// Human-readable location
    pub fn describe(&self) -> String {
        match self {
            ResultSource::Http { base_url, .. } => base_url.clone(),
            ResultSource::Local { dir } => dir.display().to_string(),
        }
    }

    /// List candidate file names (not yet filtered for result files)
    pub fn list(&self) -> Result<Vec<String>, SourceError> {
        match self {
            ResultSource::Http { base_url, agent } => {
                debug!("fetching directory listing {}", base_url);
                let body = http_get_bytes(agent, base_url)?;
                Ok(parse_listing_links(&String::from_utf8_lossy(&body)))
            }
            ResultSource::Local { dir } => {
                debug!("listing local directory {:?}", dir);
                let entries = fs::read_dir(dir).map_err(|e| SourceError::io(dir, e))?;
                let mut names = Vec::new();
                for entry in entries {
                    let entry = entry.map_err(|e| SourceError::io(dir, e))?;
                    if entry.path().is_file() {
                        if let Some(name) = entry.file_name().to_str() {
                            names.push(name.to_string());
                        }
                    }
                }
                names.sort();
                Ok(names)
            }
        }
    }

    /// Fetch and parse one result file
    pub fn fetch_json(&self, file: &str) -> Result<serde_json::Value, SourceError> {
        let bytes = match self {
            ResultSource::Http { base_url, agent } => http_get_bytes(agent, &format!("{}{}", base_url, file))?,
            ResultSource::Local { dir } => {
                let path = dir.join(file);
                fs::read(&path).map_err(|e| SourceError::io(path, e))?
            }
        };
        serde_json::from_slice(&bytes).map_err(|source| SourceError::Json { file: file.to_string(), source })
    }
}

/// Download data from a URL using HTTP GET
fn http_get_bytes(agent: &ureq::Agent, url: &str) -> Result<Vec<u8>, SourceError> {
    let resp = agent.get(url).call().map_err(|e| SourceError::http(url, e))?;
    let len = resp.header("Content-Length").and_then(|s| s.parse::<usize>().ok()).unwrap_or(0);
    let mut data: Vec<u8> = Vec::with_capacity(len);
    resp.into_reader()
        .read_to_end(&mut data)
        .map_err(|e| SourceError::Http { url: url.to_string(), message: e.to_string() })?;
    Ok(data)
}

/// Extract the href targets of all anchors in an HTML page, reduced to their
/// last path segment (query strings dropped) and de-duplicated in page order.
pub fn parse_listing_links(html: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for cap in HREF_RE.captures_iter(html) {
        let href = cap[1].split(['?', '#']).next().unwrap_or("");
        let name = href.rsplit('/').next().unwrap_or(href);
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}
