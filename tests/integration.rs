use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use almanac_cache::config::{ConfigVars, EventSettings, SeasonalSettings, SuiteEnv};
use almanac_cache::ephemeris::Observer;
use almanac_cache::{cache, events, seasonal, sky, JulianDate, UniversalTime, JD};
use chrono::{DateTime, TimeZone, Utc};
use qtty::{Second, Seconds};

fn suite_env(root: &Path) -> SuiteEnv {
    SuiteEnv::from_vars(
        [
            ("CONKY_SUITE_DIR", root.join("suite").display().to_string()),
            ("CONKY_CACHE_DIR", root.join("cache").display().to_string()),
        ],
        Some(root.join("home")),
    )
}

fn event_settings(root: &Path, config: &str) -> EventSettings {
    let env = suite_env(root);
    let config = ConfigVars::parse(config, &env);
    EventSettings::resolve(&config, &env)
}

fn backdate(path: &Path, by: Duration) {
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(SystemTime::now() - by)
        .unwrap();
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 15, 18, 0, 0).unwrap()
}

#[test]
fn utc_roundtrip_j2000_is_stable() {
    let datetime = DateTime::from_timestamp(946_728_000, 0).unwrap();
    let jd = JulianDate::from_utc(datetime);
    let back = jd.to_utc().expect("to_utc");
    let delta_ns = back.timestamp_nanos_opt().unwrap() - datetime.timestamp_nanos_opt().unwrap();
    // One f64 ULP near JD 2.45e6 is about 40 µs.
    assert!(delta_ns.abs() < 100_000, "roundtrip error: {delta_ns} ns");
}

#[test]
fn ut_applies_delta_t_near_j2000() {
    let ut = UniversalTime::new(2_451_545.0);
    let jd: JulianDate = ut.to::<JD>();
    let offset = (jd.quantity() - ut.quantity()).to::<Second>();
    assert!((offset - Seconds::new(63.86)).abs() < Seconds::new(0.1));
    assert!((ut.delta_t() - offset).abs() < Seconds::new(1e-3));
}

#[test]
fn forced_event_runs_are_identical() {
    let dir = tempfile::tempdir().unwrap();
    let settings = event_settings(dir.path(), "TZ=America/Chicago\n");
    assert_eq!(
        settings.cache_path,
        dir.path().join("cache").join("events_cache.txt")
    );

    let first = events::refresh(&settings, true, now()).unwrap();
    assert!(first.was_written());
    let a = std::fs::read_to_string(first.path()).unwrap();

    let second = events::refresh(&settings, true, now()).unwrap();
    let b = std::fs::read_to_string(second.path()).unwrap();
    assert_eq!(a, b);

    let lines: Vec<&str> = a.lines().collect();
    let mut sorted = lines.clone();
    sorted.sort();
    assert_eq!(lines, sorted);
    assert!(a.contains("2026-03-08|DST Start|DST\n"));
    assert!(a.contains("|Vernal Equinox|Equinox\n"));
}

#[test]
fn fresh_event_cache_is_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let settings = event_settings(dir.path(), "EVENT_TTL=86400\n");
    std::fs::create_dir_all(settings.cache_path.parent().unwrap()).unwrap();
    std::fs::write(&settings.cache_path, "sentinel\n").unwrap();
    backdate(&settings.cache_path, Duration::from_secs(3_600));

    let outcome = events::refresh(&settings, false, Utc::now()).unwrap();
    assert!(!outcome.was_written());
    assert_eq!(outcome.path(), settings.cache_path.as_path());
    assert_eq!(
        std::fs::read_to_string(&settings.cache_path).unwrap(),
        "sentinel\n"
    );

    let forced = events::refresh(&settings, true, Utc::now()).unwrap();
    assert!(forced.was_written());
    assert_ne!(
        std::fs::read_to_string(&settings.cache_path).unwrap(),
        "sentinel\n"
    );
}

#[test]
fn stale_event_cache_is_regenerated() {
    let dir = tempfile::tempdir().unwrap();
    let settings = event_settings(dir.path(), "EVENT_TTL=60\nTZ=UTC\n");
    std::fs::create_dir_all(settings.cache_path.parent().unwrap()).unwrap();
    std::fs::write(&settings.cache_path, "sentinel\n").unwrap();
    backdate(&settings.cache_path, Duration::from_secs(3_600));

    assert!(events::refresh(&settings, false, Utc::now()).unwrap().was_written());
}

#[test]
fn extra_events_are_merged_and_filtered() {
    let dir = tempfile::tempdir().unwrap();
    let suite_config = dir.path().join("suite").join("config");
    std::fs::create_dir_all(&suite_config).unwrap();
    std::fs::write(
        suite_config.join("events_extra.txt"),
        "2026-07-04|Picnic\n2026-7-4|Bad date|x\n2026-10-31 | Costume Party | Holiday # spooky\n",
    )
    .unwrap();

    let settings = event_settings(dir.path(), "TZ=UTC\n");
    assert_eq!(settings.extra_path, suite_config.join("events_extra.txt"));
    let outcome = events::refresh(&settings, true, now()).unwrap();
    let text = std::fs::read_to_string(outcome.path()).unwrap();
    assert!(text.contains("2026-07-04|Picnic\n"));
    assert!(text.contains("2026-10-31|Costume Party|Holiday\n"));
    assert!(!text.contains("Bad date"));
}

#[test]
fn config_file_drives_paths() {
    let dir = tempfile::tempdir().unwrap();
    let env = suite_env(dir.path());
    let config_path = env.config_path();
    std::fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    std::fs::write(
        &config_path,
        "EVENT_CACHE=$CONKY_CACHE_DIR/custom/events.txt # moved\nSEASONAL_CACHE=${CONKY_CACHE_DIR}/s.vars\n",
    )
    .unwrap();

    let config = env.load_config();
    let events = EventSettings::resolve(&config, &env);
    let seasonal = SeasonalSettings::resolve(&config, &env);
    assert_eq!(
        events.cache_path,
        dir.path().join("cache").join("custom").join("events.txt")
    );
    assert_eq!(seasonal.cache_path, dir.path().join("cache").join("s.vars"));
}

#[test]
fn seasonal_cache_round() {
    let dir = tempfile::tempdir().unwrap();
    let env = suite_env(dir.path());
    let settings = SeasonalSettings::resolve(&ConfigVars::parse("TZ=Europe/Madrid\n", &env), &env);

    let outcome = seasonal::refresh(&settings, false, now()).unwrap();
    assert!(outcome.was_written());
    let text = std::fs::read_to_string(outcome.path()).unwrap();
    assert!(text.starts_with("YEAR=2026\nSPRING_EQ_DATE=2026-03-20\n"));
    assert!(text.contains("DST_START_DATE=2026-03-29\n"));
    assert!(text.contains("DST_END_DATE=2026-10-25\n"));
    assert!(text.ends_with(&format!("UPDATED_TS={}\n", now().timestamp())));

    // Written just now with a one-year TTL: the next run is a no-op.
    let again = seasonal::refresh(&settings, false, Utc::now()).unwrap();
    assert!(!again.was_written());
}

#[test]
fn sky_cache_is_written_under_cache_dir() {
    let dir = tempfile::tempdir().unwrap();
    let env = suite_env(dir.path());
    let outcome = sky::refresh(&env, Observer::new(32.9, -96.8), now()).unwrap();
    assert_eq!(outcome.path(), dir.path().join("cache").join("sky.vars"));

    let text = std::fs::read_to_string(outcome.path()).unwrap();
    assert!(text.starts_with("LAT=32.9\nLON=-96.8\n"));
    for key in ["MOON", "VENUS", "MARS", "JUPITER", "SATURN", "MERCURY"] {
        assert!(text.contains(&format!("\n{key}_THETA=")), "{key} missing");
    }
    assert!(cache::is_fresh(outcome.path(), 60, SystemTime::now()));
}

#[test]
fn moon_window_is_bounded_over_a_month() {
    let observer = Observer::new(32.9, -96.8);
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    for hours in (0..30 * 24).step_by(17) {
        let at = start + chrono::Duration::hours(hours);
        let snapshot = sky::SkySnapshot::compute(observer, at);
        if let Some(window) = snapshot.moon_window {
            assert!(window.is_forward());
            assert!(window.duration_seconds() <= sky::MAX_WINDOW_SECS);
        }
    }
}

#[cfg(unix)]
#[test]
fn location_helper_output_is_used() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let env = suite_env(dir.path());
    let helper: PathBuf = env.location_helper();
    std::fs::create_dir_all(helper.parent().unwrap()).unwrap();
    std::fs::write(&helper, "#!/bin/sh\necho \"LAT=40.4,LON=-3.7\"\n").unwrap();
    std::fs::set_permissions(&helper, std::fs::Permissions::from_mode(0o755)).unwrap();

    let observer = sky::resolve_location(&env).unwrap();
    assert_eq!((observer.latitude, observer.longitude), (40.4, -3.7));
}

#[cfg(unix)]
#[test]
fn non_executable_helper_falls_back_to_env() {
    let dir = tempfile::tempdir().unwrap();
    let suite = dir.path().join("suite");
    let env = SuiteEnv::from_vars(
        [
            ("CONKY_SUITE_DIR", suite.display().to_string()),
            ("LAT", "10.5".to_string()),
            ("LON", "20.25".to_string()),
        ],
        None,
    );
    let helper = env.location_helper();
    std::fs::create_dir_all(helper.parent().unwrap()).unwrap();
    std::fs::write(&helper, "#!/bin/sh\necho 1 2\n").unwrap();

    let observer = sky::resolve_location(&env).unwrap();
    assert_eq!((observer.latitude, observer.longitude), (10.5, 20.25));
}

#[cfg(feature = "serde")]
#[test]
fn serde_body_position_uses_field_names() {
    let snapshot = sky::SkySnapshot::compute(Observer::new(0.0, 0.0), now());
    let json = serde_json::to_string(&snapshot.positions[0]).unwrap();
    assert!(json.contains("\"body\":\"Moon\""));
    assert!(json.contains("\"theta\""));
}
