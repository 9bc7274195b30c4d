use anyhow::Result;
use peakascent::{Database, Table};
use std::io::Write;

pub(crate) fn summary(db: &Database, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", db.url())?;

    if let Some(version) = db.setting("version") {
        writeln!(out, "version {version}")?;
    }

    let width = db.tables().map(|table| table.name().len()).max().unwrap_or(0);

    for table in db.tables() {
        writeln!(out, "  {:<width$}  {}", table.name(), table.row_count())?;
    }

    Ok(())
}
