use anyhow::Result;
use csaccess::{run_map, RunConfig};

pub fn run(cli: &crate::cli::Cli, args: &crate::cli::MapArgs) -> Result<()> {
    let mut config = RunConfig::load(&args.config)?;
    if let Some(output) = &args.output {
        config.output = output.clone();
    }

    let summary = run_map(&config)?;

    if cli.verbose > 0 {
        for (label, count) in &summary.classes {
            eprintln!("[map] {label}: {count}");
        }
    }
    eprintln!(
        "[map] {} schools ({} unclassified), {} block groups -> {}",
        summary.schools,
        summary.unclassified,
        summary.block_groups,
        summary.output.display(),
    );

    Ok(())
}
