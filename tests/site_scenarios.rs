use chrono::NaiveDate;
use solar_efficiency::services::solar_algorithm::sweep_day;
use solar_efficiency::{compute_observation, Config, DstTable, PanelArray, SiteConfig, SolarError};

fn shipped_config() -> Config {
    let json = include_str!("../config.json");
    Config::from_json(json).expect("config.json is valid")
}

#[test]
fn shipped_config_matches_built_in_defaults() {
    let config = shipped_config();
    assert_eq!(config.site, SiteConfig::default());
    assert_eq!(config.daylight_saving, DstTable::default());
}

#[test]
fn summer_noon_lights_both_arrays() {
    let config = shipped_config();
    let obs = compute_observation("2020-06-21 12:00:00", &config.site, &config.daylight_saving).unwrap();
    assert!(obs.elevation_deg > 0.0);
    assert_eq!(obs.arrays.len(), 2);
    for array in &obs.arrays {
        assert!(array.efficiency > 0.0, "{} is dark", array.name);
    }
    let sum: f64 = obs.arrays.iter().map(|a| a.efficiency).sum();
    assert_eq!(obs.total_efficiency, sum);
}

#[test]
fn winter_midnight_produces_nothing() {
    let config = shipped_config();
    let obs = compute_observation("2020-12-21 00:00:00", &config.site, &config.daylight_saving).unwrap();
    assert!(obs.elevation_deg < 0.0);
    assert_eq!(obs.total_efficiency, 0.0);
}

#[test]
fn errors_surface_to_the_caller() {
    let config = shipped_config();
    let site = &config.site;
    let dst = &config.daylight_saving;
    assert!(matches!(compute_observation("21/06/2020 12:00", site, dst), Err(SolarError::Parse { .. })));
    assert_eq!(
        compute_observation("2016-06-21 12:00:00", site, dst),
        Err(SolarError::Configuration(2016))
    );

    let mut far_east = dst.clone();
    far_east.standard_offset = 15;
    far_east.daylight_offset = 15;
    assert_eq!(
        compute_observation("2020-06-21 12:00:00", site, &far_east),
        Err(SolarError::UTC_OUT_OF_RANGE)
    );
}

#[test]
fn dst_switch_moves_solar_time_by_one_hour() {
    let config = shipped_config();
    let before = compute_observation("2020-03-07 12:00:00", &config.site, &config.daylight_saving).unwrap();
    let after = compute_observation("2020-03-08 12:00:00", &config.site, &config.daylight_saving).unwrap();
    assert_eq!(before.utc_offset, -5);
    assert_eq!(after.utc_offset, -4);
    let shift = before.local_solar_time_h - after.local_solar_time_h;
    // one day of equation-of-time drift is well under a minute
    assert!((shift - 1.0).abs() < 1.0 / 60.0, "shift {shift}");
}

#[test]
fn southern_site_sees_the_sun_in_the_north_at_noon() {
    let site = SiteConfig {
        latitude: -33.87,
        longitude: -75.0,
        arrays: vec![PanelArray {
            name: "north".to_string(),
            tilt_deg: 30.0,
            azimuth_deg: 0.0,
            panel_count: 10,
        }],
    };
    let mut dst = DstTable::default();
    dst.standard_offset = -5;
    dst.daylight_offset = -5;
    let date = NaiveDate::from_ymd_opt(2019, 6, 21).unwrap();
    let sweep = sweep_day(date, 10, &site, &dst).unwrap();
    let noon = sweep
        .iter()
        .max_by(|a, b| a.elevation_deg.total_cmp(&b.elevation_deg))
        .unwrap();
    assert!(noon.elevation_deg > 0.0);
    assert!(noon.azimuth_deg < 10.0 || noon.azimuth_deg > 350.0, "azimuth {}", noon.azimuth_deg);
    assert!(noon.arrays[0].efficiency > 0.0);
}
