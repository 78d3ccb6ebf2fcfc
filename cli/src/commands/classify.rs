use std::fs;

use anyhow::{Context, Result};
use csaccess::{config::SchemeConfig, presets, run_classify};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::ClassifyArgs) -> Result<()> {
    let scheme = match (&args.preset, &args.config) {
        (Some(name), _) => presets::scheme(name)?,
        (None, Some(path)) => {
            let bytes = fs::read(path)
                .with_context(|| format!("[classify] Failed to read {}", path.display()))?;
            serde_json::from_slice::<SchemeConfig>(&bytes)
                .with_context(|| format!("[classify] Failed to parse scheme in {}", path.display()))?
                .build()?
        }
        (None, None) => anyhow::bail!("[classify] either --preset or --config is required"),
    };
    let out_path = args.output.clone().unwrap_or("./classified.csv".into());

    let tally = run_classify(&args.input, args.id.as_deref(), &args.column, &scheme, &out_path)?;

    for (class, count) in scheme.classes().iter().zip(tally.counts()) {
        println!("{:<8} {:>6}  {}", class.color, count, class.label);
    }
    println!("{:<8} {:>6}", "none", tally.unclassified());
    eprintln!("[classify] wrote {}", out_path.display());

    Ok(())
}
