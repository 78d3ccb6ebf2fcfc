use anyhow::Result;
use csaccess::run_represent;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::RepresentArgs) -> Result<()> {
    let summary = run_represent(&args.input, &args.column, args.group.as_deref())?;

    for (group, counts) in &summary {
        println!("{group:<24} {counts}  (n={})", counts.total());
    }

    Ok(())
}
