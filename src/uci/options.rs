//! The integer option table: every tunable is an integer with a
//! default and bounds, and out-of-range values clamp silently.

use crate::board::search::SearchParams;
use crate::board::EvalWeights;

/// Declared bounds of one option.
#[derive(Clone, Copy, Debug)]
pub struct OptionSpec {
    pub name: &'static str,
    pub default: i32,
    pub min: i32,
    pub max: i32,
}

const WEIGHT_MIN: i32 = -50_000;
const WEIGHT_MAX: i32 = 50_000;
const MAX_HASH_MB: i32 = 4096;
const MAX_MOVES: i32 = 256;

pub const OPTION_SPECS: &[OptionSpec] = &[
    OptionSpec { name: "ptouch", default: 1029, min: WEIGHT_MIN, max: WEIGHT_MAX },
    OptionSpec { name: "pprox", default: 2231, min: WEIGHT_MIN, max: WEIGHT_MAX },
    OptionSpec { name: "mface", default: 4186, min: WEIGHT_MIN, max: WEIGHT_MAX },
    OptionSpec { name: "mcede", default: 1204, min: WEIGHT_MIN, max: WEIGHT_MAX },
    OptionSpec { name: "lcoverage", default: 175, min: WEIGHT_MIN, max: WEIGHT_MAX },
    OptionSpec { name: "pmid", default: -1234, min: WEIGHT_MIN, max: WEIGHT_MAX },
    OptionSpec { name: "mmid", default: -1227, min: WEIGHT_MIN, max: WEIGHT_MAX },
    OptionSpec { name: "relqi", default: 12006, min: WEIGHT_MIN, max: WEIGHT_MAX },
    OptionSpec { name: "absqi", default: 106, min: WEIGHT_MIN, max: WEIGHT_MAX },
    OptionSpec { name: "hash", default: 1040, min: 1, max: MAX_HASH_MB },
    OptionSpec { name: "draw", default: 0, min: -100, max: 100 },
    OptionSpec { name: "randomize", default: 0, min: 0, max: 10_000 },
    OptionSpec { name: "reset_rng", default: 0, min: 0, max: 1 },
    OptionSpec { name: "lmr_r1", default: 10, min: 1, max: MAX_MOVES },
    OptionSpec { name: "lmr_r2", default: 20, min: 1, max: MAX_MOVES },
    OptionSpec { name: "hmb", default: 0, min: 0, max: 100 },
    OptionSpec { name: "fut_depth", default: 3, min: 0, max: 5 },
    OptionSpec { name: "use_nmm", default: 1, min: 0, max: 1 },
    OptionSpec { name: "detect_draws", default: 1, min: 0, max: 1 },
    OptionSpec { name: "use_tt", default: 1, min: 0, max: 1 },
    OptionSpec { name: "use_ob", default: 1, min: 0, max: 1 },
    OptionSpec { name: "trace_moves", default: 0, min: 0, max: 1 },
    OptionSpec { name: "nmoves_draw", default: 100, min: 1, max: 1_000_000 },
];

#[must_use]
pub fn spec(name: &str) -> Option<&'static OptionSpec> {
    OPTION_SPECS.iter().find(|s| s.name == name)
}

/// All configurable engine state behind `setoption`.
#[derive(Clone, Debug)]
pub struct EngineOptions {
    pub weights: EvalWeights,
    pub search: SearchParams,
    pub hash_mb: i32,
    /// Accepted and stored; the evaluator does not consume it.
    pub randomize: i32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            weights: EvalWeights::default(),
            search: SearchParams::default(),
            hash_mb: spec("hash").map_or(1040, |s| s.default),
            randomize: 0,
        }
    }
}

impl EngineOptions {
    /// Current value of a named option, or `None` if unrecognized.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<i32> {
        let value = match name {
            "ptouch" => self.weights.ptouch,
            "pprox" => self.weights.pprox,
            "mface" => self.weights.mface,
            "mcede" => self.weights.mcede,
            "lcoverage" => self.weights.lcoverage,
            "pmid" => self.weights.pmid,
            "mmid" => self.weights.mmid,
            "relqi" => self.weights.relqi,
            "absqi" => self.weights.absqi,
            "hash" => self.hash_mb,
            "draw" => i32::from(self.search.draw),
            "randomize" => self.randomize,
            "reset_rng" => 0,
            "lmr_r1" => self.search.lmr_r1,
            "lmr_r2" => self.search.lmr_r2,
            "hmb" => i32::from(self.search.hmb),
            "fut_depth" => self.search.fut_depth,
            "use_nmm" => i32::from(self.search.use_nmm),
            "detect_draws" => i32::from(self.search.detect_draws),
            "use_tt" => i32::from(self.search.use_tt),
            "use_ob" => i32::from(self.search.use_ob),
            "trace_moves" => i32::from(self.search.trace_moves),
            "nmoves_draw" => self.search.nmoves_draw as i32,
            _ => return None,
        };
        Some(value)
    }

    /// Set a named option, clamping into its declared bounds.
    /// Returns the applied value, or `None` if unrecognized.
    pub fn set(&mut self, name: &str, value: i32) -> Option<i32> {
        let spec = spec(name)?;
        let v = value.clamp(spec.min, spec.max);
        match name {
            "ptouch" => self.weights.ptouch = v,
            "pprox" => self.weights.pprox = v,
            "mface" => self.weights.mface = v,
            "mcede" => self.weights.mcede = v,
            "lcoverage" => self.weights.lcoverage = v,
            "pmid" => self.weights.pmid = v,
            "mmid" => self.weights.mmid = v,
            "relqi" => self.weights.relqi = v,
            "absqi" => self.weights.absqi = v,
            "hash" => self.hash_mb = v,
            "draw" => self.search.draw = v as i16,
            "randomize" => self.randomize = v,
            "reset_rng" => {}
            "lmr_r1" => self.search.lmr_r1 = v,
            "lmr_r2" => self.search.lmr_r2 = v,
            "hmb" => self.search.hmb = v as i16,
            "fut_depth" => self.search.fut_depth = v,
            "use_nmm" => self.search.use_nmm = v != 0,
            "detect_draws" => self.search.detect_draws = v != 0,
            "use_tt" => self.search.use_tt = v != 0,
            "use_ob" => self.search.use_ob = v != 0,
            "trace_moves" => self.search.trace_moves = v != 0,
            "nmoves_draw" => self.search.nmoves_draw = v as u32,
            _ => return None,
        }
        Some(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_specs() {
        let opts = EngineOptions::default();
        for spec in OPTION_SPECS {
            assert_eq!(
                opts.get(spec.name),
                Some(spec.default),
                "default mismatch for {}",
                spec.name
            );
            assert!(spec.min <= spec.default && spec.default <= spec.max);
        }
    }

    #[test]
    fn test_out_of_range_clamps_silently() {
        let mut opts = EngineOptions::default();
        assert_eq!(opts.set("fut_depth", 99), Some(5));
        assert_eq!(opts.set("fut_depth", -7), Some(0));
        assert_eq!(opts.set("draw", 5000), Some(100));
        assert_eq!(opts.get("draw"), Some(100));
    }

    #[test]
    fn test_unknown_option_rejected() {
        let mut opts = EngineOptions::default();
        assert_eq!(opts.set("bogus", 1), None);
        assert_eq!(opts.get("bogus"), None);
    }
}
