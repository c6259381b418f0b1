//! Seeded synthetic dataset.
//!
//! When no dataset directory is configured we generate a plausible cohort so
//! the slides (and the line-drawing exercise) work out of the box. The
//! generator is deterministic for a given seed and student count.
//!
//! Shape of the fake world: each student has a latent ability and a stress
//! reactivity; each exam draws a stress level from the reactivity. Stress
//! pushes scores up a little (the original study observed a positive
//! HR/score correlation) and elevates all four signals during the in-test
//! window.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::{DataSource, SignalSeries, StudyDataset};
use crate::data::signals::SeriesPoint;
use crate::domain::{ExamKind, Observation, SignalKind, StudyConfig, TestPeriod};

/// Session layout: one hour of recording, with short pre/post windows.
const SESSION_SECONDS: f64 = 3600.0;
const SAMPLE_STEP_SECONDS: f64 = 30.0;
const PRE_TEST_END: f64 = 300.0;
const POST_TEST_START: f64 = 3300.0;

/// Per-signal generation parameters: baseline mean/sd, stress gain, noise sd,
/// and a hard floor (a skin conductance of -0.2 uS is not a thing).
fn signal_params(signal: SignalKind) -> (f64, f64, f64, f64, f64) {
    match signal {
        SignalKind::Hr => (72.0, 6.0, 9.0, 3.0, 40.0),
        SignalKind::Eda => (2.5, 0.6, 1.2, 0.25, 0.05),
        SignalKind::Temp => (33.2, 0.5, 0.5, 0.12, 30.0),
        SignalKind::Acc => (14.0, 3.0, 2.5, 1.2, 0.5),
    }
}

/// Generate the full synthetic dataset for the configured cohort.
pub fn generate_dataset(config: &StudyConfig) -> StudyDataset {
    let mut rng = StdRng::seed_from_u64(dataset_seed(config));
    let unit: Normal<f64> = Normal::new(0.0, 1.0).expect("unit normal is valid");

    let mut series = HashMap::new();
    let mut observations: HashMap<SignalKind, Vec<Observation>> = HashMap::new();
    for signal in SignalKind::ALL {
        observations.insert(signal, Vec::new());
    }

    for student in 1..=config.student_count {
        let ability = (75.0 + 10.0 * unit.sample(&mut rng)).clamp(40.0, 98.0);
        let reactivity = unit.sample(&mut rng);

        for exam in ExamKind::ALL {
            let stress = 0.6 * reactivity + 0.8 * unit.sample(&mut rng);
            let score =
                (ability + 4.5 * stress + 4.0 * unit.sample(&mut rng)).clamp(30.0, 100.0);

            for signal in SignalKind::ALL {
                let s = generate_series(&mut rng, &unit, student, exam, signal, stress);
                if let Some(avg) = s.in_test_average() {
                    observations
                        .get_mut(&signal)
                        .expect("all signals pre-inserted")
                        .push(Observation {
                            student,
                            exam,
                            signal_avg: avg,
                            score,
                        });
                }
                series.insert((student, exam, signal), s);
            }
        }
    }

    StudyDataset {
        observations,
        series,
        row_errors: Vec::new(),
        source: DataSource::Synthetic {
            seed: config.sample_seed,
        },
    }
}

fn generate_series(
    rng: &mut StdRng,
    unit: &Normal<f64>,
    student: u32,
    exam: ExamKind,
    signal: SignalKind,
    stress: f64,
) -> SignalSeries {
    let (base_mean, base_sd, gain, noise_sd, floor) = signal_params(signal);
    let baseline = base_mean + base_sd * unit.sample(rng);

    let n = (SESSION_SECONDS / SAMPLE_STEP_SECONDS) as usize + 1;
    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        let t = i as f64 * SAMPLE_STEP_SECONDS;
        let period = if t < PRE_TEST_END {
            TestPeriod::PreTest
        } else if t >= POST_TEST_START {
            TestPeriod::PostTest
        } else {
            TestPeriod::InTest
        };

        // Stress elevation ramps in over the first in-test minutes and decays
        // after the exam ends.
        let elevation = match period {
            TestPeriod::PreTest => 0.0,
            TestPeriod::InTest => {
                let ramp = ((t - PRE_TEST_END) / 300.0).min(1.0);
                gain * stress.max(0.0) * ramp
            }
            TestPeriod::PostTest => 0.3 * gain * stress.max(0.0),
        };

        let value = (baseline + elevation + noise_sd * unit.sample(rng)).max(floor);
        points.push(SeriesPoint {
            time_seconds: t,
            timestamp: None,
            value,
            period,
        });
    }

    SignalSeries {
        student,
        exam,
        signal,
        points,
    }
}

fn dataset_seed(config: &StudyConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    config.sample_seed.hash(&mut hasher);
    config.student_count.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regress;

    fn test_config() -> StudyConfig {
        StudyConfig {
            data_dir: None,
            synthetic: true,
            student_count: 10,
            sample_seed: 42,
            accuracy_threshold: 70.0,
            scroll_debounce_ms: 500,
            plot: true,
            plot_width: 100,
            plot_height: 25,
            export_results: None,
            export_fit: None,
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let config = test_config();
        let a = generate_dataset(&config);
        let b = generate_dataset(&config);
        let oa = a.observations_for(SignalKind::Hr);
        let ob = b.observations_for(SignalKind::Hr);
        assert_eq!(oa.len(), ob.len());
        for (x, y) in oa.iter().zip(ob) {
            assert_eq!(x.signal_avg, y.signal_avg);
            assert_eq!(x.score, y.score);
        }
    }

    #[test]
    fn every_signal_gets_one_observation_per_student_exam() {
        let dataset = generate_dataset(&test_config());
        for signal in SignalKind::ALL {
            assert_eq!(dataset.observations_for(signal).len(), 30);
        }
    }

    #[test]
    fn generated_observations_are_fittable() {
        // The whole point of the demo dataset: the scatter slides must be
        // able to fit a best-fit line without hitting degenerate inputs.
        let dataset = generate_dataset(&test_config());
        for signal in SignalKind::ALL {
            let samples: Vec<_> = dataset
                .observations_for(signal)
                .iter()
                .map(|o| o.sample())
                .collect();
            regress::fit(&samples).unwrap();
        }
    }

    #[test]
    fn series_cover_all_periods() {
        let dataset = generate_dataset(&test_config());
        let s = dataset
            .series_for(1, ExamKind::Midterm1, SignalKind::Hr)
            .unwrap();
        assert!(s.points.iter().any(|p| p.period == TestPeriod::PreTest));
        assert!(s.points.iter().any(|p| p.period == TestPeriod::InTest));
        assert!(s.points.iter().any(|p| p.period == TestPeriod::PostTest));
    }
}
