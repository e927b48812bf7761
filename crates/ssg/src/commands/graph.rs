//! `ssg graph` command implementation.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use ssg_site::Site;
use ssg_storage::DataBag;

use super::site_args::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the graph command.
#[derive(Args)]
pub(crate) struct GraphArgs {
    #[command(flatten)]
    pub site: SiteArgs,

    /// Write JSON to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit compact JSON.
    #[arg(long)]
    compact: bool,
}

/// One file in the graph output.
#[derive(Serialize)]
struct GraphEntry<'a> {
    path: &'a str,
    data: &'a DataBag,
}

impl GraphArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let site = self.site.load_site(&output)?;

        let json = render_graph(&site, self.compact)?;
        match &self.output {
            Some(path) => {
                std::fs::write(path, json)?;
                output.info(&format!("Wrote {}", path.display()));
            }
            None => output.result(&json)?,
        }
        Ok(())
    }
}

/// Serialize every file's path and data bag, in input order.
fn render_graph(site: &Site, compact: bool) -> Result<String, serde_json::Error> {
    let entries: Vec<GraphEntry<'_>> = site
        .files()
        .map(|file| GraphEntry {
            path: file.path(),
            data: file.data(),
        })
        .collect();

    if compact {
        serde_json::to_string(&entries)
    } else {
        serde_json::to_string_pretty(&entries)
    }
}
