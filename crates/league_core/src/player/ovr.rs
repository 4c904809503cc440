//! Overall rating, potential, position and skill labels.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::models::{RatingSnapshot, Skill};

const OVR_WEIGHTS_YAML: &str = include_str!("ovr_weights.yaml");
static OVR_WEIGHTS: OnceLock<OvrWeights> = OnceLock::new();

/// Age at which players are assumed to stop improving.
pub const PEAK_AGE: u8 = 29;

#[derive(Debug, Clone, Deserialize)]
struct SkillLabelFile {
    ratings: Vec<String>,
    threshold: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct OvrWeightsFile {
    version: u8,
    intercept: f64,
    scale: f64,
    weights: BTreeMap<String, f64>,
    skills: BTreeMap<String, SkillLabelFile>,
}

#[derive(Debug, Clone)]
pub struct SkillLabel {
    pub label: String,
    pub ratings: Vec<Skill>,
    pub threshold: f64,
}

#[derive(Debug, Clone)]
pub struct OvrWeights {
    pub version: u8,
    intercept: f64,
    scale: f64,
    weights: Vec<(Skill, f64)>,
    total_weight: f64,
    pub labels: Vec<SkillLabel>,
}

impl TryFrom<OvrWeightsFile> for OvrWeights {
    type Error = String;

    fn try_from(file: OvrWeightsFile) -> Result<Self, Self::Error> {
        let mut weights = Vec::with_capacity(file.weights.len());
        for skill in Skill::ALL {
            let w = file
                .weights
                .get(skill.key())
                .copied()
                .ok_or_else(|| format!("missing weight for {}", skill.key()))?;
            if w < 0.0 {
                return Err(format!("negative weight for {}", skill.key()));
            }
            weights.push((skill, w));
        }
        if let Some(unknown) = file.weights.keys().find(|k| Skill::from_key(k).is_none()) {
            return Err(format!("unknown rating {}", unknown));
        }
        let total_weight: f64 = weights.iter().map(|(_, w)| w).sum();
        if total_weight <= 0.0 {
            return Err("weights sum to zero".to_string());
        }

        let mut labels = Vec::new();
        for (label, def) in file.skills {
            let ratings = def
                .ratings
                .iter()
                .map(|k| Skill::from_key(k).ok_or_else(|| format!("label {} uses unknown rating {}", label, k)))
                .collect::<Result<Vec<_>, _>>()?;
            if ratings.is_empty() {
                return Err(format!("label {} has no ratings", label));
            }
            labels.push(SkillLabel { label, ratings, threshold: def.threshold });
        }

        Ok(Self {
            version: file.version,
            intercept: file.intercept,
            scale: file.scale,
            weights,
            total_weight,
            labels,
        })
    }
}

pub fn get_ovr_weights() -> &'static OvrWeights {
    OVR_WEIGHTS.get_or_init(|| {
        let file: OvrWeightsFile =
            serde_yaml::from_str(OVR_WEIGHTS_YAML).expect("ovr weights YAML invalid");
        OvrWeights::try_from(file).expect("ovr weights failed validation")
    })
}

/// Overall rating of a snapshot, in [0, 100].
pub fn ovr(r: &RatingSnapshot) -> u8 {
    let w = get_ovr_weights();
    let weighted: f64 = w.weights.iter().map(|(skill, weight)| weight * r.get(*skill) as f64).sum();
    let value = w.intercept + w.scale * weighted / w.total_weight;
    value.round().clamp(0.0, 100.0) as u8
}

/// Projected peak overall. Players past [`PEAK_AGE`] are what they are.
pub fn pot(ovr: u8, age: u8) -> u8 {
    if age >= PEAK_AGE {
        return ovr;
    }
    let years = (PEAK_AGE - age) as f64;
    // Growth slows as the player approaches the ceiling.
    let headroom = (100.0 - ovr as f64) / 100.0;
    let projected = ovr as f64 + years * 3.0 * headroom;
    projected.round().clamp(ovr as f64, 100.0) as u8
}

pub fn position(r: &RatingSnapshot) -> &'static str {
    let guard_skill = (r.drb as u16 + r.pss as u16) / 2;
    match r.hgt {
        h if h >= 68 => "C",
        h if h >= 60 => "PF",
        h if h >= 52 => "SF",
        h if h >= 44 || guard_skill < 55 => "SG",
        _ => "PG",
    }
}

pub fn skill_labels(r: &RatingSnapshot) -> Vec<String> {
    get_ovr_weights()
        .labels
        .iter()
        .filter(|label| {
            let sum: f64 = label.ratings.iter().map(|s| r.get(*s) as f64).sum();
            sum / label.ratings.len() as f64 >= label.threshold
        })
        .map(|label| label.label.clone())
        .collect()
}

/// Recomputes the derived fields of a snapshot (ovr, pot, pos, skills).
pub fn refresh(r: &mut RatingSnapshot, age: u8) {
    r.ovr = ovr(r);
    r.pot = pot(r.ovr, age);
    r.pos = position(r).to_string();
    r.skills = skill_labels(r);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(value: u8) -> RatingSnapshot {
        let mut r = RatingSnapshot::default();
        for skill in Skill::ALL {
            r.set(skill, value);
        }
        r
    }

    #[test]
    fn test_weights_load() {
        let w = get_ovr_weights();
        assert_eq!(w.version, 1);
        assert_eq!(w.weights.len(), Skill::ALL.len());
        assert!(!w.labels.is_empty());
    }

    #[test]
    fn test_ovr_of_flat_ratings() {
        assert_eq!(ovr(&flat(50)), 45);
        assert_eq!(ovr(&flat(0)), 0);
        assert!(ovr(&flat(100)) <= 100);
    }

    #[test]
    fn test_ovr_is_monotonic_in_each_rating() {
        let base = flat(50);
        for skill in Skill::ALL {
            let mut better = base.clone();
            better.set(skill, 90);
            assert!(ovr(&better) >= ovr(&base), "{:?}", skill);
        }
    }

    #[test]
    fn test_pot_never_below_ovr() {
        for age in 18..40 {
            for ovr in [20u8, 45, 70, 95] {
                let p = pot(ovr, age);
                assert!(p >= ovr);
                if age >= PEAK_AGE {
                    assert_eq!(p, ovr);
                }
            }
        }
        assert!(pot(40, 19) > pot(40, 25));
    }

    #[test]
    fn test_skill_labels() {
        let mut shooter = flat(45);
        shooter.tp = 85;
        shooter.fg = 75;
        shooter.oiq = 70;
        assert_eq!(skill_labels(&shooter), vec!["3".to_string()]);
        assert!(skill_labels(&flat(30)).is_empty());
    }

    #[test]
    fn test_refresh_sets_position() {
        let mut big = flat(50);
        big.hgt = 80;
        refresh(&mut big, 22);
        assert_eq!(big.pos, "C");
        assert!(big.pot >= big.ovr);
    }
}
