//! Built-in disparity schemes, underlay ramps, and map annotations for the
//! Georgia CS access maps.

use crate::classify::{BinError, BinScheme, ClassSpec, BinEdges, Extent, RightClosedBins, UnderlayBins, UnderlayScheme};
use crate::color::Rgb;
use crate::render::CityLabel;

/// Seven-class diverging palette: deep orange (under) through white
/// (parity) to deep blue (over).
pub const DIVERGING: [&str; 7] = ["#7f2704", "#d94801", "#fdae6b", "#ffffff", "#9ecae1", "#3182bd", "#08519c"];

pub const GRAY_RAMP: [&str; 5] = ["#f0f0f0", "#bdbdbd", "#969696", "#636363", "#252525"];

pub const BLUE_RAMP: [&str; 5] = ["#c6dbef", "#9ecae1", "#6baed6", "#3182bd", "#08519c"];

pub const QUINTILE_LABELS: [&str; 5] = ["Lowest 20%", "20–40%", "40–60%", "60–80%", "Highest 20%"];

pub const SCHEME_NAMES: [&str; 5] = ["ri_black", "ri_hispanic", "ri_white", "ri_female", "ri_asian"];

pub const UNDERLAY_NAMES: [&str; 6] = ["quintile_gray", "quintile_blue", "income", "education", "internet", "black_ratio"];

const RI_BLACK: [f64; 8] = [-0.864929, -0.168258, -0.088616, -0.050715, 0.049845, 0.088608, 0.139144, 0.684211];
const RI_HISPANIC: [f64; 8] = [-0.357664, -0.125772, -0.077977, -0.050622, 0.053994, 0.082208, 0.159554, 0.951422];
const RI_WHITE: [f64; 8] = [-0.627130, -0.168843, -0.082320, -0.050197, 0.049292, 0.090172, 0.162600, 0.981273];
const RI_FEMALE: [f64; 8] = [-0.864929, -0.296520, -0.211112, -0.051748, 0.032609, 0.257576, 0.497095, 0.652174];

/// Disparity scheme by name.
pub fn scheme(name: &str) -> Result<BinScheme, BinError> {
    match name {
        "ri_black" => BinScheme::from_colors(RI_BLACK.to_vec(), &DIVERGING),
        "ri_hispanic" => BinScheme::from_colors(RI_HISPANIC.to_vec(), &DIVERGING),
        "ri_white" => BinScheme::from_colors(RI_WHITE.to_vec(), &DIVERGING),
        "ri_female" => BinScheme::from_colors(RI_FEMALE.to_vec(), &DIVERGING),
        "ri_asian" => ri_asian(),
        _ => Err(BinError::UnknownPreset(name.to_string())),
    }
}

/// Five classes whose outer classes run to infinity.
fn ri_asian() -> Result<BinScheme, BinError> {
    let edges = BinEdges::new(vec![-1.0, -0.050279, 0.049733, 0.083157, 0.138494, 1.0])?;
    let classes = [
        ("#d94801", "≤ -0.050279"),
        ("#fdae6b", "-0.050278 – 0.049733"),
        ("#ffffff", "0.049734 – 0.083157"),
        ("#9ecae1", "0.083158 – 0.138494"),
        ("#3182bd", "≥ 0.138495"),
    ]
    .into_iter()
    .map(|(color, label)| Ok(ClassSpec::new(Rgb::parse(color)?, label)))
    .collect::<Result<Vec<_>, BinError>>()?;

    Ok(BinScheme::new(edges, classes)?.with_extent(Extent::Open))
}

/// Underlay scheme by name.
pub fn underlay(name: &str) -> Result<UnderlayScheme, BinError> {
    let breaks = |edges: &[f64], include_lowest| {
        RightClosedBins::new(edges.to_vec(), include_lowest).map(UnderlayBins::Breaks)
    };

    match name {
        "quintile_gray" => UnderlayScheme::new(UnderlayBins::Quantiles(5), &GRAY_RAMP, Some(&QUINTILE_LABELS)),
        "quintile_blue" => UnderlayScheme::new(UnderlayBins::Quantiles(5), &BLUE_RAMP, Some(&QUINTILE_LABELS)),
        "income" => UnderlayScheme::new(
            breaks(&[2499.0, 53240.0, 84175.0, 122700.0, 180134.0, 250001.0], true)?,
            &GRAY_RAMP,
            Some(&["$2,499–53,240", "$53,241–84,175", "$84,176–122,700", "$122,701–180,134", "$180,135–250,001"]),
        ),
        "education" => UnderlayScheme::new(
            breaks(&[0.0, 508.0, 832.0, 1199.0, 1711.0, 3965.0], true)?,
            &GRAY_RAMP,
            Some(&["0–508", "509–832", "833–1199", "1200–1711", "1712–3965"]),
        ),
        "internet" => UnderlayScheme::new(
            breaks(&[0.0, 288.0, 472.0, 679.0, 965.0, 2070.0], true)?,
            &GRAY_RAMP,
            Some(&["0–288", "289–472", "473–679", "680–965", "966–2070"]),
        ),
        "black_ratio" => UnderlayScheme::new(
            breaks(&[0.0, 0.1253, 0.3157, 0.5369, 0.7838, 1.0], false)?,
            &GRAY_RAMP,
            Some(&["0.000 – 0.1253", "0.1254 – 0.3157", "0.3158 – 0.5369", "0.5370 – 0.7838", "0.7839 – 1.000"]),
        ),
        _ => Err(BinError::UnknownPreset(name.to_string())),
    }
}

/// Labelled cities with their label offsets in projected meters.
pub fn georgia_cities() -> Vec<CityLabel> {
    vec![
        CityLabel::new("Atlanta", 33.7490, -84.3880, (-120_000.0, 5_000.0)),
        CityLabel::new("Savannah", 32.0809, -81.0912, (6_000.0, 40_000.0)),
        CityLabel::new("Augusta", 33.4735, -82.0105, (30_000.0, -8_000.0)),
        CityLabel::new("Macon", 32.8407, -83.6324, (-170_000.0, -60_000.0)),
    ]
}

/// Lon/lat window for the Atlanta metro close-up: `[min_lon, min_lat, max_lon, max_lat]`.
pub const ATLANTA_CLIP: [f64; 4] = [-85.5, 32.8, -82.8, 34.5];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_named_preset_builds() {
        for name in SCHEME_NAMES {
            let scheme = scheme(name).unwrap();
            assert!(scheme.num_classes() >= 5, "{name}");
        }
        for name in UNDERLAY_NAMES {
            assert!(underlay(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn unknown_names_are_errors() {
        assert_eq!(scheme("ri_martian").unwrap_err(), BinError::UnknownPreset("ri_martian".into()));
        assert!(underlay("rainfall").is_err());
    }

    #[test]
    fn ri_black_shared_edges_fall_low() {
        let scheme = scheme("ri_black").unwrap();
        assert_eq!(scheme.classify(Some(-0.050715)).color().map(|c| c.to_string()).as_deref(), Some("#fdae6b"));
        assert_eq!(scheme.classify(Some(-0.05)).color().map(|c| c.to_string()).as_deref(), Some("#ffffff"));
        assert_eq!(scheme.classify(Some(0.6)).color().map(|c| c.to_string()).as_deref(), Some("#08519c"));
        assert!(!scheme.classify(Some(-0.9)).is_classified());
    }

    #[test]
    fn ri_asian_is_open_ended() {
        let scheme = scheme("ri_asian").unwrap();
        assert_eq!(scheme.extent(), Extent::Open);
        assert_eq!(scheme.classify_index(Some(-3.0)), Some(0));
        assert_eq!(scheme.classify_index(Some(2.0)), Some(4));
        assert_eq!(scheme.classify_index(Some(f64::NAN)), None);
    }

    #[test]
    fn black_ratio_excludes_zero() {
        let underlay = underlay("black_ratio").unwrap();
        let resolved = underlay.resolve(std::iter::empty()).unwrap();
        assert_eq!(resolved.classify_index(Some(0.0)), None);
        assert_eq!(resolved.classify_index(Some(0.2)), Some(1));
        assert_eq!(resolved.label(1), "0.1254 – 0.3157");
    }
}
