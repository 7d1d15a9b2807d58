use super::{MetricRange, Subsystem};
use chrono::NaiveDateTime;
use rand::Rng;
use serde::{Deserialize, Serialize};

const FIRST_STORM_INTENSITY: MetricRange = MetricRange::new(1.5, 7.5);
const FIRST_STORM_PROBABILITY: MetricRange = MetricRange::new(0.6, 0.95);
const SECOND_STORM_INTENSITY: MetricRange = MetricRange::new(2.5, 5.5);
const SECOND_STORM_PROBABILITY: MetricRange = MetricRange::new(0.5, 0.85);

const RADIATION_INTENSITY: MetricRange = MetricRange::new(0.5, 3.5);
const RADIATION_PROBABILITY: MetricRange = MetricRange::new(0.7, 0.9);
const RADIATION_DURATION_HOURS: core::ops::RangeInclusive<u8> = 1..=5;

const NEO_ID_RANGE: core::ops::RangeInclusive<u32> = 10_000..=99_999;
const NEO_DISTANCE_LD: MetricRange = MetricRange::new(0.5, 3.5);
const NEO_DIAMETER_M: MetricRange = MetricRange::new(10.0, 100.0);
const NEO_PROBABILITY: MetricRange = MetricRange::new(0.01, 0.1);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarStorm {
    pub time: NaiveDateTime,
    pub intensity: f64,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CosmicRadiationEvent {
    pub time: NaiveDateTime,
    pub intensity: f64,
    pub duration_hours: u8,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidThreat {
    /// `NEO-#####`
    pub object_id: String,
    pub closest_approach: NaiveDateTime,
    pub distance_lunar: f64,
    pub diameter_m: f64,
    pub probability: f64,
}

/// Forecast space-weather and near-earth-object events.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Predictions {
    pub solar_storms: Vec<SolarStorm>,
    pub cosmic_radiation: Vec<CosmicRadiationEvent>,
    pub asteroid_threats: Vec<AsteroidThreat>,
}

fn at(date: (i32, u32, u32), time: (u32, u32)) -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(date.0, date.1, date.2)
        .and_then(|d| d.and_hms_opt(time.0, time.1, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

impl Predictions {
    /// Highest probability across every forecast event, if any.
    pub fn peak_probability(&self) -> Option<f64> {
        self.solar_storms
            .iter()
            .map(|s| s.probability)
            .chain(self.cosmic_radiation.iter().map(|r| r.probability))
            .chain(self.asteroid_threats.iter().map(|a| a.probability))
            .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |m| m.max(p))))
    }
}

impl Subsystem for Predictions {
    const NAME: &'static str = "Quantum";

    fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            solar_storms: vec![
                SolarStorm {
                    time: at((2025, 4, 2), (14, 35)),
                    intensity: FIRST_STORM_INTENSITY.sample(rng),
                    probability: FIRST_STORM_PROBABILITY.sample(rng),
                },
                SolarStorm {
                    time: at((2025, 4, 5), (8, 12)),
                    intensity: SECOND_STORM_INTENSITY.sample(rng),
                    probability: SECOND_STORM_PROBABILITY.sample(rng),
                },
            ],
            cosmic_radiation: vec![CosmicRadiationEvent {
                time: at((2025, 4, 1), (22, 45)),
                intensity: RADIATION_INTENSITY.sample(rng),
                duration_hours: rng.gen_range(RADIATION_DURATION_HOURS),
                probability: RADIATION_PROBABILITY.sample(rng),
            }],
            asteroid_threats: vec![AsteroidThreat {
                object_id: format!("NEO-{}", rng.gen_range(NEO_ID_RANGE)),
                closest_approach: at((2025, 4, 7), (11, 30)),
                distance_lunar: NEO_DISTANCE_LD.sample(rng),
                diameter_m: NEO_DIAMETER_M.sample(rng),
                probability: NEO_PROBABILITY.sample(rng),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_sampled_predictions_shape_and_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let p = Predictions::sample(&mut rng);
            assert_eq!(p.solar_storms.len(), 2);
            assert_eq!(p.cosmic_radiation.len(), 1);
            assert_eq!(p.asteroid_threats.len(), 1);

            assert!(FIRST_STORM_INTENSITY.contains(p.solar_storms[0].intensity));
            assert!(SECOND_STORM_PROBABILITY.contains(p.solar_storms[1].probability));
            assert!(RADIATION_DURATION_HOURS.contains(&p.cosmic_radiation[0].duration_hours));

            let neo = &p.asteroid_threats[0];
            let number: u32 = neo.object_id.trim_start_matches("NEO-").parse().unwrap();
            assert!(NEO_ID_RANGE.contains(&number));
            assert!(NEO_DIAMETER_M.contains(neo.diameter_m));
        }
    }

    #[test]
    fn test_peak_probability() {
        assert_eq!(Predictions::default().peak_probability(), None);

        let mut rng = StdRng::seed_from_u64(1);
        let p = Predictions::sample(&mut rng);
        let peak = p.peak_probability().unwrap();
        assert!(peak >= p.solar_storms[0].probability);
        assert!(peak >= p.asteroid_threats[0].probability);
    }
}
