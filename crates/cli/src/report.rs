//! `vinvegan report`: HTML from result files already on disk.

use std::path::{Path, PathBuf};

use vinvegan_io::output::read_results;
use vinvegan_io::report::{render, ReportEntry};
use vinvegan_io::{SOME_VEGAN_OPTIONS_FILE, VEGAN_FRIENDLY_FILE};

use crate::matching::write_text;
use crate::{policy, CliError};

fn load_entries(path: &Path) -> Result<Vec<ReportEntry>, CliError> {
    let records = read_results(path).map_err(|e| {
        CliError::from(e).with_hint("run `vinvegan match` first, or point --dir at its --out-dir")
    })?;

    let mut entries = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        match ReportEntry::from_record(record) {
            Some(entry) => entries.push(entry),
            None => log::warn!("{}: record {} has no company_name, skipped", path.display(), index),
        }
    }
    Ok(entries)
}

pub fn cmd_report(
    config: Option<&Path>,
    dir: PathBuf,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let policy = policy::load(config)?.policy;

    let vegan_friendly = load_entries(&dir.join(VEGAN_FRIENDLY_FILE))?;
    let some_vegan_options = load_entries(&dir.join(SOME_VEGAN_OPTIONS_FILE))?;
    let html = render(&vegan_friendly, &some_vegan_options, &policy);

    match output {
        Some(path) => {
            write_text(&path, &html)?;
            log::info!(
                "wrote report with {} + {} companies to {}",
                vegan_friendly.len(),
                some_vegan_options.len(),
                path.display()
            );
        }
        None => print!("{html}"),
    }
    Ok(())
}
