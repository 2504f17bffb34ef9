/// ============================================================
///  Solar Position & Panel Efficiency Engine
///
///  Algorithm pipeline (one timestamp, strictly forward):
///   1. Clock        – day-of-year, decimal hour, DST-resolved UTC offset
///   2. Solar time   – equation of time, local standard time meridian,
///                     time correction factor, local solar time
///   3. Geometry     – declination, hour angle, elevation, azimuth
///   4. Atmosphere   – air mass, attenuation of the solar constant
///   5. Panels       – incidence per array, weighted by attenuation and
///                     panel count, summed over the site
/// ============================================================

use chrono::{Duration, NaiveDate};
use std::f64::consts::PI;

use crate::config::{DstTable, PanelArray, SiteConfig};
use crate::error::SolarError;
use crate::models::observation::{ArrayEfficiency, Observation};
use crate::services::clock::{self, LocalClock};

// ─── Physical constants ──────────────────────────────────────
const SOLAR_CONSTANT_KW_M2: f64 = 1.353;
const DEG: f64 = PI / 180.0;
const DAYS_PER_YEAR: f64 = 365.0;
/// Stand-in for an infinite air mass once the sun has set.
const NIGHT_AIR_MASS: f64 = 99_999_999_999.0;
pub const MAX_DECLINATION_DEG: f64 = 23.45;

fn check_day(day: i64) -> Result<f64, SolarError> {
    if (0..367).contains(&day) {
        Ok(day as f64)
    } else {
        Err(SolarError::DATE_OUT_OF_RANGE)
    }
}

// ─── 2. Solar time ───────────────────────────────────────────

/// Equation of time in minutes, accurate to about half a minute.
pub fn equation_of_time(day: i64) -> Result<f64, SolarError> {
    let d = check_day(day)?;
    let b = 360.0 / DAYS_PER_YEAR * (d - 81.0) * DEG;
    Ok(9.87 * (2.0 * b).sin() - 7.53 * b.cos() - 1.5 * b.sin())
}

/// Reference meridian (degrees) of a whole-hour UTC offset in (-13, 15).
pub fn local_standard_meridian(utc_offset: i32) -> Result<f64, SolarError> {
    if utc_offset > -13 && utc_offset < 15 {
        Ok(15.0 * utc_offset as f64)
    } else {
        Err(SolarError::UTC_OUT_OF_RANGE)
    }
}

/// Minutes between clock time and solar time inside the timezone.
pub fn time_correction(longitude_deg: f64, lstm_deg: f64, eot_min: f64) -> f64 {
    4.0 * (longitude_deg - lstm_deg) + eot_min
}

/// Hours after local solar midnight. May leave [0, 24) near midnight.
pub fn local_solar_time(hour_of_day: f64, time_correction_min: f64) -> f64 {
    hour_of_day + time_correction_min / 60.0
}

// ─── 3. Geometry ─────────────────────────────────────────────

pub fn declination(day: i64) -> Result<f64, SolarError> {
    let d = check_day(day)?;
    Ok(-MAX_DECLINATION_DEG * (360.0 / DAYS_PER_YEAR * (d + 10.0) * DEG).cos())
}

/// Zero at solar noon, negative before it. Not wrapped.
pub fn hour_angle(local_solar_time_h: f64) -> f64 {
    15.0 * (local_solar_time_h - 12.0)
}

pub fn elevation(declination_deg: f64, latitude_deg: f64, hour_angle_deg: f64) -> f64 {
    let dec = declination_deg * DEG;
    let lat = latitude_deg * DEG;
    let hra = hour_angle_deg * DEG;
    let sin_alpha = dec.sin() * lat.sin() + dec.cos() * lat.cos() * hra.cos();
    // Rounding can push the argument a hair past ±1.
    sin_alpha.clamp(-1.0, 1.0).asin() / DEG
}

/// Degrees clockwise from true north, in [0, 360).
pub fn azimuth(
    declination_deg: f64,
    latitude_deg: f64,
    hour_angle_deg: f64,
    elevation_deg: f64,
    local_solar_time_h: f64,
) -> f64 {
    let dec = declination_deg * DEG;
    let lat = latitude_deg * DEG;
    let hra = hour_angle_deg * DEG;
    let cos_alpha = (elevation_deg * DEG).cos();

    // Sun at the zenith: direction is undefined, report north.
    let cos_az = if cos_alpha.abs() > 1e-9 {
        (dec.sin() * lat.cos() - dec.cos() * lat.sin() * hra.cos()) / cos_alpha
    } else {
        1.0
    };
    let az_raw = cos_az.clamp(-1.0, 1.0).acos() / DEG;

    // acos loses the east/west sign; afternoon mirrors into the west.
    let az = if local_solar_time_h < 12.0 || hra < 0.0 {
        az_raw
    } else {
        360.0 - az_raw
    };
    normalize_degrees(az)
}

fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees % 360.0;
    if normalized < 0.0 { normalized + 360.0 } else { normalized }
}

// ─── 4. Atmosphere ───────────────────────────────────────────

pub fn air_mass(elevation_deg: f64) -> f64 {
    if elevation_deg <= 0.0 {
        NIGHT_AIR_MASS
    } else {
        1.0 / ((90.0 - elevation_deg) * DEG).cos()
    }
}

/// kW/m² reaching the ground out of the 1.353 kW/m² solar constant.
pub fn attenuation(air_mass: f64) -> f64 {
    SOLAR_CONSTANT_KW_M2 * 0.7_f64.powf(air_mass.powf(0.678))
}

// ─── 5. Panels ───────────────────────────────────────────────

/// Cosine of the angle between the sun and the panel normal, floored at 0.
///
/// * `tilt_deg` – panel slope from horizontal
/// * `panel_azimuth_deg` – panel rotation from true north
pub fn incidence(elevation_deg: f64, azimuth_deg: f64, tilt_deg: f64, panel_azimuth_deg: f64) -> f64 {
    if elevation_deg < 0.0 {
        // the sun has set
        return 0.0;
    }
    let a = elevation_deg * DEG;
    let b = tilt_deg * DEG;
    let t1 = a.cos() * b.sin() * ((azimuth_deg - panel_azimuth_deg) * DEG).cos();
    let t2 = a.sin() * b.cos();
    (t1 + t2).max(0.0)
}

pub fn array_efficiency(array: &PanelArray, elevation_deg: f64, azimuth_deg: f64, attenuation: f64) -> ArrayEfficiency {
    let incidence = incidence(elevation_deg, azimuth_deg, array.tilt_deg, array.azimuth_deg);
    ArrayEfficiency {
        name: array.name.clone(),
        panel_count: array.panel_count,
        incidence,
        efficiency: attenuation * array.panel_count as f64 * incidence,
    }
}

// ─── Pipeline ────────────────────────────────────────────────

/// Main entry point: one timestamp string in, one observation out.
pub fn compute_observation(timestamp: &str, site: &SiteConfig, dst: &DstTable) -> Result<Observation, SolarError> {
    let clock = clock::normalize(timestamp, dst)?;
    observe(&clock, site)
}

/// Runs stages 2–5 on an already normalized clock reading.
pub fn observe(clock: &LocalClock, site: &SiteConfig) -> Result<Observation, SolarError> {
    let eot = equation_of_time(clock.day_of_year)?;
    let lstm = local_standard_meridian(clock.utc_offset)?;
    let tc = time_correction(site.longitude, lstm, eot);
    let lst = local_solar_time(clock.hour_of_day, tc);

    let dec = declination(clock.day_of_year)?;
    let hra = hour_angle(lst);
    let elev = elevation(dec, site.latitude, hra);
    let azi = azimuth(dec, site.latitude, hra, elev, lst);

    let am = air_mass(elev);
    let atmos = attenuation(am);

    let arrays: Vec<ArrayEfficiency> = site
        .arrays
        .iter()
        .map(|array| array_efficiency(array, elev, azi, atmos))
        .collect();
    let total_efficiency: f64 = arrays.iter().map(|a| a.efficiency).sum();

    #[cfg(feature = "verbose_log")]
    tracing::debug!(
        timestamp = %clock.timestamp,
        day = clock.day_of_year,
        utc = clock.utc_offset,
        eot, tc, lst, dec, hra, elev, azi, am, atmos,
        "observation derived"
    );

    Ok(Observation {
        timestamp: clock.timestamp,
        day_of_year: clock.day_of_year,
        hour_of_day: clock.hour_of_day,
        utc_offset: clock.utc_offset,
        equation_of_time_min: eot,
        local_standard_meridian_deg: lstm,
        time_correction_min: tc,
        local_solar_time_h: lst,
        declination_deg: dec,
        hour_angle_deg: hra,
        elevation_deg: elev,
        azimuth_deg: azi,
        air_mass: am,
        attenuation: atmos,
        arrays,
        total_efficiency,
    })
}

/// Observations every `step_minutes` from 00:00 up to (not including) 24:00.
pub fn sweep_day(
    date: NaiveDate,
    step_minutes: u32,
    site: &SiteConfig,
    dst: &DstTable,
) -> Result<Vec<Observation>, SolarError> {
    if !(1..=720).contains(&step_minutes) {
        return Err(SolarError::Range("sweep step out of range"));
    }
    let midnight = date.and_hms_opt(0, 0, 0).ok_or(SolarError::DATE_OUT_OF_RANGE)?;
    (0..24 * 60)
        .step_by(step_minutes as usize)
        .map(|minute| {
            let clock = LocalClock::at(midnight + Duration::minutes(minute as i64), dst)?;
            observe(&clock, site)
        })
        .collect()
}
