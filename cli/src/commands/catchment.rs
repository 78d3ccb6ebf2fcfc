use anyhow::Result;
use csaccess::{data::CatchmentColumns, run_catchment};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::CatchmentArgs) -> Result<()> {
    let mut columns = CatchmentColumns::default();
    if !args.shares.is_empty() {
        columns.shares = args.shares.clone();
    }
    if !args.distance_populations.is_empty() {
        columns.distance_populations = args.distance_populations.clone();
    }
    if let Some(income) = &args.income {
        columns.income = Some(income.clone());
    }
    let out_path = args.output.clone().unwrap_or("./catchments.csv".into());

    let summaries = run_catchment(&args.assignments, &args.census, &columns, &out_path)?;

    eprintln!("[catchment] wrote {} schools to {}", summaries.len(), out_path.display());
    Ok(())
}
