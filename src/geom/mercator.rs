use anyhow::{anyhow, Context, Result};
use geo::{Coord, MapCoords};
use proj4rs::{proj::Proj as Proj4, transform::transform};

/// Geographic WGS84 lon/lat (EPSG:4326).
const WGS84: &str = "+proj=longlat +datum=WGS84 +no_defs +type=crs";

/// Spherical Web Mercator (EPSG:3857).
const WEB_MERCATOR: &str = "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs +type=crs";

/// Reprojection from lon/lat degrees to Web Mercator meters.
pub struct WebMercator {
    from: Proj4,
    to: Proj4,
}

impl WebMercator {
    pub fn new() -> Result<Self> {
        let from = Proj4::from_proj_string(WGS84)
            .with_context(|| anyhow!("[geom::mercator] failed to build source PROJ.4: {WGS84}"))?;
        let to = Proj4::from_proj_string(WEB_MERCATOR)
            .with_context(|| anyhow!("[geom::mercator] failed to build target PROJ.4: {WEB_MERCATOR}"))?;
        Ok(Self { from, to })
    }

    /// Project one lon/lat coordinate (degrees in, meters out).
    pub fn coord(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let mut point = (coord.x.to_radians(), coord.y.to_radians(), 0.0);
        transform(&self.from, &self.to, &mut point)
            .with_context(|| format!("[geom::mercator] transform failed at ({}, {})", coord.x, coord.y))?;
        Ok(Coord { x: point.0, y: point.1 })
    }

    /// Project every coordinate of a geometry.
    pub fn geometry<G>(&self, geometry: &G) -> Result<G::Output>
    where
        G: MapCoords<f64, f64>,
    {
        geometry.try_map_coords(|coord| self.coord(coord))
    }
}

#[cfg(test)]
mod tests {
    use geo::{coord, polygon, MultiPolygon};

    use super::*;

    #[test]
    fn origin_stays_at_origin() {
        let mercator = WebMercator::new().unwrap();
        let c = mercator.coord(coord! { x: 0.0, y: 0.0 }).unwrap();
        assert!(c.x.abs() < 1e-6 && c.y.abs() < 1e-6);
    }

    #[test]
    fn atlanta_lands_where_expected() {
        let mercator = WebMercator::new().unwrap();
        let c = mercator.coord(coord! { x: -84.3880, y: 33.7490 }).unwrap();
        // x = R·λ, y = R·ln(tan(π/4 + φ/2)) on the 6378137 m sphere
        let r = 6_378_137.0_f64;
        let x = r * (-84.3880_f64).to_radians();
        let y = r * (std::f64::consts::FRAC_PI_4 + 33.7490_f64.to_radians() / 2.0).tan().ln();
        assert!((c.x - x).abs() < 1.0, "{} vs {x}", c.x);
        assert!((c.y - y).abs() < 1.0, "{} vs {y}", c.y);
    }

    #[test]
    fn projects_polygons() {
        let mercator = WebMercator::new().unwrap();
        let shape = MultiPolygon(vec![polygon![(x: -85.0, y: 31.0), (x: -81.0, y: 31.0), (x: -81.0, y: 35.0)]]);
        let projected = mercator.geometry(&shape).unwrap();
        let exterior = projected.0[0].exterior();
        assert!(exterior.0[0].x < exterior.0[1].x);
        assert!(exterior.0[1].y < exterior.0[2].y);
    }
}
