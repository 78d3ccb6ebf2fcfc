use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerWriter, prelude::{Column, CsvWriter, NamedFrom}, series::Series};

use crate::{classify::BinScheme, data::CatchmentSummary};

/// One classified entity as written to CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRow {
    pub id: String,
    pub value: Option<f64>,
    pub class_index: Option<u32>,
    pub color: Option<String>,
    pub label: Option<String>,
}

impl ClassifiedRow {
    pub fn classify(scheme: &BinScheme, id: String, value: Option<f64>) -> Self {
        let class = scheme.classify(value);
        Self {
            id,
            value,
            class_index: class.index().map(|i| i as u32),
            color: class.color().map(|c| c.to_string()),
            label: class.label().map(str::to_string),
        }
    }
}

/// Write rows as `id,value,class_index,color,label`; unclassified rows keep
/// empty class cells.
pub fn write_classified(rows: &[ClassifiedRow], path: &Path) -> Result<()> {
    let mut df = DataFrame::new(vec![
        Series::new("id".into(), rows.iter().map(|r| r.id.clone()).collect::<Vec<_>>()).into(),
        Series::new("value".into(), rows.iter().map(|r| r.value).collect::<Vec<_>>()).into(),
        Series::new("class_index".into(), rows.iter().map(|r| r.class_index).collect::<Vec<_>>()).into(),
        Series::new("color".into(), rows.iter().map(|r| r.color.clone()).collect::<Vec<_>>()).into(),
        Series::new("label".into(), rows.iter().map(|r| r.label.clone()).collect::<Vec<_>>()).into(),
    ])?;

    let file = File::create(path)
        .with_context(|| format!("[io::csv] Failed to create CSV file: {}", path.display()))?;
    CsvWriter::new(file)
        .finish(&mut df)
        .with_context(|| format!("[io::csv] Failed to write CSV to {:?}", path))
}

/// Write catchment summaries as `school_id,population`, then one
/// `weighted_avg_<column>` per share, `total_pop_weighted_avg_income`, and
/// one `<group>_population_avg_distance` per population group.
pub fn write_catchments(summaries: &[CatchmentSummary], path: &Path) -> Result<()> {
    let mut columns: Vec<Column> = vec![
        Series::new("school_id".into(), summaries.iter().map(|s| s.school_id.clone()).collect::<Vec<_>>()).into(),
        Series::new("population".into(), summaries.iter().map(|s| s.population).collect::<Vec<_>>()).into(),
    ];

    if let Some(first) = summaries.first() {
        for (i, (name, _)) in first.shares.iter().enumerate() {
            let values = summaries.iter().map(|s| s.shares.get(i).and_then(|(_, v)| *v)).collect::<Vec<_>>();
            columns.push(Series::new(format!("weighted_avg_{name}").as_str().into(), values).into());
        }
        columns.push(Series::new("total_pop_weighted_avg_income".into(), summaries.iter().map(|s| s.income).collect::<Vec<_>>()).into());
        for (i, (name, _)) in first.distances.iter().enumerate() {
            let values = summaries.iter().map(|s| s.distances.get(i).and_then(|(_, v)| *v)).collect::<Vec<_>>();
            columns.push(Series::new(format!("{name}_population_avg_distance").as_str().into(), values).into());
        }
    }

    let mut df = DataFrame::new(columns)?;
    let file = File::create(path)
        .with_context(|| format!("[io::csv] Failed to create CSV file: {}", path.display()))?;
    CsvWriter::new(file)
        .finish(&mut df)
        .with_context(|| format!("[io::csv] Failed to write CSV to {:?}", path))
}
