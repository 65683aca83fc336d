//! Human-readable bands for index values.

use earthpulse_common::IndexKind;

const NO_DATA: &str = "No data available - check date range or cloud coverage";

pub fn describe(index: IndexKind, value: Option<f64>) -> String {
    match index {
        IndexKind::Vegetation => ndvi(value).to_string(),
        IndexKind::Water => ndwi(value).to_string(),
        IndexKind::ThermalAnomaly => match value {
            Some(count) => format!("Fire risk: {}", fire_risk(count)),
            None => NO_DATA.to_string(),
        },
    }
}

pub fn ndvi(value: Option<f64>) -> &'static str {
    let Some(v) = value else {
        return NO_DATA;
    };
    if v < -0.1 {
        "Water bodies"
    } else if v < 0.0 {
        "Clouds or snow"
    } else if v < 0.2 {
        "Barren land, rock, sand, or urban areas"
    } else if v < 0.35 {
        "Sparse vegetation, shrubland, or grassland"
    } else if v < 0.5 {
        "Moderate vegetation, agricultural land"
    } else if v < 0.7 {
        "Dense vegetation, healthy forests"
    } else {
        "Very dense, healthy vegetation"
    }
}

pub fn ndwi(value: Option<f64>) -> &'static str {
    let Some(v) = value else {
        return NO_DATA;
    };
    if v > 0.5 {
        "High water content - large water bodies or significant flooding"
    } else if v > 0.3 {
        "Moderate water content - potential flooding or wetlands"
    } else if v > 0.1 {
        "Low water content - moist soil or vegetation"
    } else if v > -0.1 {
        "Minimal water content - dry soil"
    } else {
        "Very low water content - barren land, potential drought conditions"
    }
}

/// Risk level from the number of thermal-anomaly pixels (~1 km² each).
pub fn fire_risk(pixel_count: f64) -> &'static str {
    if pixel_count <= 0.0 {
        "low"
    } else if pixel_count < 5.0 {
        "medium"
    } else if pixel_count < 15.0 {
        "high"
    } else {
        "critical"
    }
}
