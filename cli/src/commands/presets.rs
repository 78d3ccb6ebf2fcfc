use anyhow::Result;
use csaccess::presets::{self, SCHEME_NAMES, UNDERLAY_NAMES};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::PresetsArgs) -> Result<()> {
    if let Some(name) = &args.name {
        let json = match presets::scheme(name) {
            Ok(scheme) => serde_json::to_string_pretty(&scheme)?,
            Err(_) => serde_json::to_string_pretty(&presets::underlay(name)?)?,
        };
        println!("{json}");
        return Ok(());
    }

    println!("schemes:");
    for name in SCHEME_NAMES {
        let scheme = presets::scheme(name)?;
        let colors = scheme.classes().iter().map(|c| c.color.to_string()).collect::<Vec<_>>();
        println!("  {name:<12} {:?} edges={:?} colors={}", scheme.extent(), &scheme.edges()[..], colors.join(","));
    }

    println!("underlays:");
    for name in UNDERLAY_NAMES {
        let underlay = presets::underlay(name)?;
        let ramp = underlay.ramp().iter().map(|c| c.to_string()).collect::<Vec<_>>();
        println!("  {name:<14} ramp={}", ramp.join(","));
    }

    Ok(())
}
