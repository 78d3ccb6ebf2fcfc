//! Per-school statistics over the block groups assigned to each school.
//!
//! Every block group in a catchment contributes in proportion to its
//! population. Missing populations or values drop the block group from that
//! statistic only.

use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use polars::frame::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{numeric_column, pad_geoid, string_column};

/// `Σ count / Σ population × 100`, or `None` for an empty population.
pub fn weighted_share<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (count, population) = pairs.into_iter()
        .fold((0.0, 0.0), |(c, p), (count, population)| (c + count, p + population));
    (population > 0.0).then(|| count / population * 100.0)
}

/// `Σ value·weight / Σ weight`, or `None` when the weights sum to zero.
pub fn weighted_mean<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (sum, weight) = pairs.into_iter()
        .fold((0.0, 0.0), |(s, w), (value, weight)| (s + value * weight, w + weight));
    (weight > 0.0).then(|| sum / weight)
}

/// Population-weighted harmonic mean of distance: `Σ pop / Σ (pop / d)`.
/// Non-positive distances are skipped; `None` when nothing remains.
pub fn harmonic_distance<I>(pairs: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let (num, denom) = pairs.into_iter()
        .filter(|&(_, distance)| distance > 0.0)
        .fold((0.0, 0.0), |(n, d), (population, distance)| (n + population, d + population / distance));
    (denom != 0.0).then(|| num / denom)
}

/// Census values keyed by padded GEOID.
pub type GeoidValues = HashMap<String, Option<f64>>;

/// Column names of the assignment and census tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatchmentColumns {
    pub school: String,
    /// Block-group id, shared by both tables.
    pub geoid: String,
    pub distance: String,
    pub population: String,
    /// Counts reported as a percentage of catchment population.
    pub shares: Vec<String>,
    /// Per-capita income, averaged by population.
    pub income: Option<String>,
    /// Population groups each given a harmonic-mean distance.
    pub distance_populations: Vec<String>,
}

impl Default for CatchmentColumns {
    fn default() -> Self {
        let names = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        Self {
            school: "UNIQUESCHOOLID".into(),
            geoid: "GEOID".into(),
            distance: "distance".into(),
            population: "total_population".into(),
            shares: names(&["edu_less_than_hs", "edu_hs_or_more", "without_internet_subscription", "households_no_computer"]),
            income: Some("percapita_income_total".into()),
            distance_populations: names(&[
                "white_alone_non_hispanic",
                "black_alone_non_hispanic",
                "asian_alone_non_hispanic",
                "hispanic_or_latino",
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Member {
    geoid: String,
    distance: Option<f64>,
}

/// Block groups assigned to each school.
#[derive(Debug, Clone, Default)]
pub struct Catchments {
    schools: BTreeMap<String, Vec<Member>>,
}

/// Statistics for one school's catchment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatchmentSummary {
    pub school_id: String,
    pub population: f64,
    /// Percentage of the catchment population per requested column.
    pub shares: Vec<(String, Option<f64>)>,
    pub income: Option<f64>,
    /// Harmonic-mean distance per population group.
    pub distances: Vec<(String, Option<f64>)>,
}

impl Catchments {
    /// Build from an assignment table with one row per (school, block group).
    pub fn from_table(df: &DataFrame, school: &str, geoid: &str, distance: &str) -> Result<Self> {
        let schools = string_column(df, school)?;
        let geoids = string_column(df, geoid)?;
        let distances = numeric_column(df, distance)?;

        let mut catchments = Self::default();
        for ((school, geoid), distance) in schools.into_iter().zip(geoids).zip(distances) {
            if let (Some(school), Some(geoid)) = (school, geoid) {
                catchments.insert(school, &geoid, distance);
            }
        }
        debug!("[data::catchment] {} schools, {} assignments", catchments.len(), df.height());
        Ok(catchments)
    }

    pub fn insert(&mut self, school: String, geoid: &str, distance: Option<f64>) {
        self.schools.entry(school).or_default()
            .push(Member { geoid: pad_geoid(geoid), distance });
    }

    #[inline] pub fn len(&self) -> usize { self.schools.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.schools.is_empty() }

    /// Summarize every school. `shares` are (column, count per GEOID)
    /// pairs turned into population percentages; `income` is averaged by
    /// total population; each `distance_populations` group gets its own
    /// harmonic-mean distance weighted by that group's head count.
    pub fn summarize(
        &self,
        population: &GeoidValues,
        shares: &[(String, GeoidValues)],
        income: Option<&GeoidValues>,
        distance_populations: &[(String, GeoidValues)],
    ) -> Vec<CatchmentSummary> {
        let lookup = |table: &GeoidValues, geoid: &str| table.get(geoid).copied().flatten();

        self.schools.iter()
            .map(|(school_id, members)| {
                let populated = members.iter()
                    .filter_map(|m| lookup(population, &m.geoid).map(|p| (m, p)))
                    .collect::<Vec<_>>();

                let shares = shares.iter()
                    .map(|(name, table)| {
                        let share = weighted_share(populated.iter()
                            .filter_map(|&(m, p)| lookup(table, &m.geoid).map(|c| (c, p))));
                        (name.clone(), share)
                    })
                    .collect();

                let income = income.and_then(|table| weighted_mean(populated.iter()
                    .filter_map(|&(m, p)| lookup(table, &m.geoid).map(|v| (v, p)))));

                let distances = distance_populations.iter()
                    .map(|(name, table)| {
                        let distance = harmonic_distance(members.iter()
                            .filter_map(|m| Some((lookup(table, &m.geoid)?, m.distance?))));
                        (name.clone(), distance)
                    })
                    .collect();

                CatchmentSummary {
                    school_id: school_id.clone(),
                    population: populated.iter().map(|&(_, p)| p).sum(),
                    shares,
                    income,
                    distances,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_is_a_percentage_of_population() {
        assert_eq!(weighted_share([(10.0, 100.0), (30.0, 100.0)]), Some(20.0));
        assert_eq!(weighted_share([(10.0, 0.0)]), None);
    }

    #[test]
    fn harmonic_distance_weights_by_population() {
        // 100 people at 1 km and 100 at 4 km: 200 / (100 + 25) = 1.6
        let d = harmonic_distance([(100.0, 1.0), (100.0, 4.0)]).unwrap();
        assert!((d - 1.6).abs() < 1e-12);
        assert_eq!(harmonic_distance([(100.0, 0.0)]), None);
        assert_eq!(harmonic_distance(std::iter::empty()), None);
    }

    #[test]
    fn summarizes_each_catchment() {
        let mut catchments = Catchments::default();
        catchments.insert("s1".into(), "10010201001", Some(1.0));
        catchments.insert("s1".into(), "010010201002", Some(4.0));
        catchments.insert("s2".into(), "010010201003", None);

        let table = |rows: &[(&str, f64)]| rows.iter()
            .map(|(k, v)| (k.to_string(), Some(*v)))
            .collect::<GeoidValues>();
        let population = table(&[("010010201001", 100.0), ("010010201002", 300.0), ("010010201003", 0.0)]);
        let black = table(&[("010010201001", 50.0), ("010010201002", 50.0)]);
        let white = table(&[("010010201001", 100.0), ("010010201002", 0.0)]);
        let income = table(&[("010010201001", 10_000.0), ("010010201002", 30_000.0)]);

        let summaries = catchments.summarize(
            &population,
            &[("black".into(), black.clone())],
            Some(&income),
            &[("black".into(), black), ("white".into(), white)],
        );
        assert_eq!(summaries.len(), 2);

        let s1 = &summaries[0];
        assert_eq!(s1.school_id, "s1");
        assert_eq!(s1.population, 400.0);
        assert_eq!(s1.shares, vec![("black".to_string(), Some(25.0))]);
        assert_eq!(s1.income, Some(25_000.0));
        // black: 100 / (50/1 + 50/4) = 1.6; white lives entirely at distance 1
        let (_, black_distance) = &s1.distances[0];
        assert!((black_distance.unwrap() - 1.6).abs() < 1e-12);
        assert_eq!(s1.distances[1], ("white".to_string(), Some(1.0)));

        let s2 = &summaries[1];
        assert_eq!(s2.shares[0].1, None);
        assert_eq!(s2.distances, vec![("black".to_string(), None), ("white".to_string(), None)]);
    }

    #[test]
    fn columns_default_to_census_names() {
        let columns: CatchmentColumns = serde_json::from_str(r#"{ "income": null }"#).unwrap();
        assert_eq!(columns.population, "total_population");
        assert_eq!(columns.distance_populations.len(), 4);
        assert_eq!(columns.income, None);
    }
}
