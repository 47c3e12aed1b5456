/// Configuration resolution module
///
/// This module handles:
/// - Building a ViewPlan from CLI arguments and the available dates
/// - Defaulting the date to the newest one
/// - Dropping a comparison date equal to the current date
/// - Checking that requested dates exist
use crate::cli::CliArgs;
use crate::loader::Catalog;
use crate::types::TypeFilter;
use log::debug;
use std::path::PathBuf;

/// Drill-down selection of the plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrillDownPlan {
    pub component: String,
    pub type_filter: TypeFilter,
    pub dataset: Option<String>,
    pub search: Option<String>,
    pub file: Option<String>,
}

/// Fully resolved, immutable description of what to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewPlan {
    pub date: String,
    pub compare: Option<String>,
    pub drilldown: Option<DrillDownPlan>,
    pub output_markdown: Option<PathBuf>,
    pub output_json: Option<PathBuf>,
    pub fail_on_regression: bool,
    pub use_colors: bool,
    /// Non-fatal adjustments made while resolving, shown to the user
    pub notices: Vec<String>,
}

/// Build a complete ViewPlan from CLI arguments
///
/// This resolves all configuration upfront, so rendering receives a fully
/// validated selection. `catalog` must not be empty.
pub fn build_view_plan(args: &CliArgs, catalog: &Catalog) -> Result<ViewPlan, String> {
    debug!("Building view plan from CLI args");
    let mut notices = Vec::new();

    let date = resolve_date(args.date.as_deref(), catalog)?;
    debug!("Current date: {}", date);

    let compare = match args.compare.as_deref() {
        Some(c) if c == date => {
            notices.push(format!("comparison date {} equals the current date, not comparing", c));
            None
        }
        Some(c) => {
            require_available(c, catalog)?;
            Some(c.to_string())
        }
        None => None,
    };
    debug!("Comparison date: {:?}", compare);

    let drilldown = args.component.as_ref().map(|component| DrillDownPlan {
        component: component.clone(),
        type_filter: args.type_filter,
        dataset: args.dataset.clone(),
        search: args.search.clone(),
        file: args.file.clone(),
    });

    Ok(ViewPlan {
        date,
        compare,
        drilldown,
        output_markdown: args.output_markdown.clone(),
        output_json: args.output_json.clone(),
        fail_on_regression: args.fail_on_regression,
        use_colors: !args.no_color,
        notices,
    })
}

/// Requested date, or the newest available one
fn resolve_date(requested: Option<&str>, catalog: &Catalog) -> Result<String, String> {
    match requested {
        Some(date) => {
            require_available(date, catalog)?;
            Ok(date.to_string())
        }
        None => catalog.latest().map(str::to_string).ok_or_else(|| "no benchmark files found".to_string()),
    }
}

fn require_available(date: &str, catalog: &Catalog) -> Result<(), String> {
    if catalog.contains(date) {
        Ok(())
    } else {
        Err(format!("no results for date {} (available: {})", date, catalog.dates().join(", ")))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
