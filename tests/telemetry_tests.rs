use habitat::session::SessionState;
use habitat::subsystems::crew::DutyStatus;
use habitat::subsystems::environment::*;
use habitat::subsystems::power::*;
use habitat::subsystems::resources::*;
use habitat::telemetry::{HabitatSnapshot, SimulatedTelemetry, TelemetrySource};

#[test]
fn test_generated_metrics_stay_in_range() {
    let mut source = SimulatedTelemetry::seeded(2024);

    for _ in 0..200 {
        let snapshot = source.produce_snapshot();

        let r = &snapshot.resources;
        assert!(OXYGEN_RANGE.contains(r.oxygen));
        assert!(WATER_RANGE.contains(r.water));
        assert!(FOOD_RANGE.contains(r.food));
        assert!(POWER_RANGE.contains(r.power));
        assert!(FUEL_RANGE.contains(r.fuel));

        let e = &snapshot.environment;
        assert!(TEMPERATURE_RANGE_C.contains(e.temperature));
        assert!(PRESSURE_RANGE_KPA.contains(e.pressure));
        assert!(HUMIDITY_RANGE_PERCENT.contains(e.humidity));
        assert!(CO2_RANGE_PPM.contains(e.co2_level));
        assert!(RADIATION_RANGE_USV_H.contains(e.radiation));
        assert!(SOUND_RANGE_DB.contains(e.sound_level));

        let p = &snapshot.power;
        assert!(SOLAR_ARRAY_RANGE.contains(p.solar_array));
        assert!(MAIN_BATTERY_RANGE.contains(p.main_battery));
        assert!(BACKUP_GENERATOR_RANGE.contains(p.backup_generators));
        assert!(CONSUMPTION_RANGE.contains(p.power_consumption));
        assert!(EFFICIENCY_RANGE.contains(p.efficiency));
    }

    assert_eq!(source.get_metrics().snapshots_generated, 200);
}

#[test]
fn test_crew_statistics() {
    let mut session = SessionState::new(chrono::Utc::now());
    assert_eq!(session.average_crew_health(), None);

    session.apply_snapshot(SimulatedTelemetry::seeded(1).produce_snapshot());

    assert_eq!(session.crew.len(), 8);
    assert_eq!(session.crew_on_duty(), 6);
    assert_eq!(session.crew_by_status(Some(DutyStatus::OffDuty)).len(), 2);
    assert_eq!(session.crew_by_status(None).len(), 8);

    let average = session.average_crew_health().unwrap();
    assert!((average - 94.5).abs() < 1e-9);
}

#[test]
fn test_snapshot_json_round_trip() {
    let snapshot = SimulatedTelemetry::seeded(77).produce_snapshot();

    let json = serde_json::to_string(&snapshot).unwrap();
    let decoded: HabitatSnapshot = serde_json::from_str(&json).unwrap();

    assert_eq!(decoded, snapshot);
    assert!(json.contains("\"Oxygen\""));
}

#[test]
fn test_forecast_declines_from_current_levels() {
    let mut session = SessionState::new(chrono::Utc::now());
    session.apply_snapshot(SimulatedTelemetry::seeded(9).produce_snapshot());

    let forecast = session.resource_forecast(7);
    assert_eq!(forecast.oxygen.len(), 7);
    assert!(forecast.oxygen.windows(2).all(|w| w[1] <= w[0]));
    assert!(forecast.water[0] <= session.resources.water);
}
