//! `ssg tree` command implementation.

use std::fmt::Write as _;

use clap::Args;
use ssg_site::{SectionId, SectionTree, Site};

use super::site_args::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the tree command.
#[derive(Args)]
pub(crate) struct TreeArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Print the tree as JSON.
    #[arg(long)]
    json: bool,
}

impl TreeArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let site = self.site.load_site(&output)?;

        let text = if self.json {
            serde_json::to_string_pretty(&site.section_tree())?
        } else {
            render_tree(&site)
        };
        output.result(text.trim_end())?;
        Ok(())
    }
}

/// Render the section tree as indented text.
///
/// Sections show their `title` property when set, otherwise their name.
fn render_tree(site: &Site) -> String {
    fn render(site: &Site, id: SectionId, depth: usize, out: &mut String) {
        let section = site.sections().get(id);
        let indent = "  ".repeat(depth);
        let label = section
            .property("title")
            .and_then(|v| v.as_str())
            .unwrap_or(section.name());
        let label = if label.is_empty() { "(root)" } else { label };

        let _ = writeln!(out, "{indent}{label} [{}]", section.url());
        for file in site.section_files(section) {
            let _ = writeln!(out, "{indent}  - {}", file.url());
        }
        for &child in section.sections() {
            render(site, child, depth + 1, out);
        }
    }

    let mut out = String::new();
    render(site, SectionTree::ROOT, 0, &mut out);
    out
}
