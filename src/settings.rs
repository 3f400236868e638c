//! Run configuration: which methods to run, with which budgets and
//! parameters. Missing mandatory entries fail fast before any search
//! starts.

use std::path::Path;
use std::time::Duration;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::search::{
    Budget, CoolingSchedule, GeneticAlgorithm, HeuristicSpec, LocalSearch, SimulatedAnnealing,
    TabuSearch,
};

#[derive(Debug, Clone)]
pub struct Settings {
    pub seed: u64,
    pub verbose_level: u8,
    pub greedy: GreedySettings,
    pub heuristic: Option<HeuristicSettings>,
    pub binary_search: BinarySearchSettings,
}

#[derive(Debug, Clone)]
pub struct GreedySettings {
    pub budget: Budget,
    /// Size of the K-best seed pool (the heuristic's startingPointNumber).
    pub k_best: usize,
}

#[derive(Debug, Clone)]
pub struct HeuristicSettings {
    pub spec: HeuristicSpec,
    pub budget: Budget,
}

#[derive(Debug, Clone)]
pub struct BinarySearchSettings {
    pub upper_bound_lambda: f64,
    pub epsilon: f64,
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::MissingInput(format!("{}: {e}", path.display())))?;
        let value: Value = serde_json::from_str(&text)?;
        Self::from_json(&value)
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        let verbose_level = value
            .get("VerboseLevel")
            .and_then(Value::as_u64)
            .ok_or_else(|| Error::Config("VerboseLevel does not exist".into()))?
            as u8;
        let seed = value
            .get("Seed")
            .and_then(Value::as_u64)
            .ok_or_else(|| Error::Config("Seed does not exist".into()))?;
        let methods = value
            .get("Methods")
            .and_then(Value::as_object)
            .ok_or_else(|| Error::Config("Methods does not exist".into()))?;

        let mut greedy_budget = None;
        let mut binary_search = None;
        let mut heuristic: Option<HeuristicSettings> = None;
        let mut k_best = 1usize;

        for (key, entry) in methods {
            let name = entry
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| Error::Config(format!("method {key} has no name")))?;
            match name {
                "RG" => {
                    greedy_budget = Some(method_budget(entry, name)?);
                }
                "BS" => {
                    binary_search = Some(BinarySearchSettings {
                        upper_bound_lambda: require_f64(entry, "upperBoundLambda", name)?,
                        epsilon: require_f64(entry, "epsilon", name)?,
                    });
                }
                "LS" | "TS" | "SA" | "GA" => {
                    if heuristic.is_some() {
                        return Err(Error::Config(
                            "at most one heuristic method may be configured".into(),
                        ));
                    }
                    k_best = require_f64(entry, "startingPointNumber", name)? as usize;
                    if k_best == 0 {
                        return Err(Error::Config(
                            "startingPointNumber must be at least 1".into(),
                        ));
                    }
                    heuristic = Some(HeuristicSettings {
                        spec: heuristic_spec(entry, name)?,
                        budget: method_budget(entry, name)?,
                    });
                }
                other => {
                    return Err(Error::Config(format!("unknown method name: {other}")));
                }
            }
        }

        let greedy_budget = greedy_budget.ok_or_else(|| {
            Error::Config("Random Greedy (RG) is a mandatory method".into())
        })?;
        let binary_search = binary_search
            .ok_or_else(|| Error::Config("Binary Search (BS) is a mandatory method".into()))?;
        if binary_search.epsilon <= 0.0 {
            return Err(Error::Config("epsilon must be positive".into()));
        }

        Ok(Settings {
            seed,
            verbose_level,
            greedy: GreedySettings {
                budget: greedy_budget,
                k_best,
            },
            heuristic,
            binary_search,
        })
    }
}

fn require_f64(entry: &Value, key: &str, name: &str) -> Result<f64> {
    entry.get(key).and_then(Value::as_f64).ok_or_else(|| {
        Error::Config(format!("{key} is a mandatory parameter for {name}"))
    })
}

fn method_budget(entry: &Value, name: &str) -> Result<Budget> {
    let iterations = entry.get("iterations").and_then(Value::as_u64);
    let duration = entry
        .get("duration")
        .and_then(Value::as_f64)
        .map(Duration::from_secs_f64);
    if iterations.is_none() && duration.is_none() {
        return Err(Error::Config(format!(
            "at least one of duration or iterations should be specified for {name}"
        )));
    }
    Ok(Budget::new(iterations, duration))
}

fn heuristic_spec(entry: &Value, name: &str) -> Result<HeuristicSpec> {
    let special = entry.get("specialParameters");
    let optional_f64 =
        |key: &str| -> Option<f64> { special.and_then(|s| s.get(key)).and_then(Value::as_f64) };
    let required_f64 = |key: &str| -> Result<f64> {
        optional_f64(key).ok_or_else(|| Error::Config(format!("{key} should be specified for {name}")))
    };

    match name {
        "LS" => Ok(HeuristicSpec::LocalSearch(LocalSearch::new(
            optional_f64("minScore"),
        ))),
        "TS" => Ok(HeuristicSpec::TabuSearch(TabuSearch::new(
            required_f64("tabuSize")? as usize,
            optional_f64("minScore"),
        ))),
        "SA" => {
            let schedule = special
                .and_then(|s| s.get("schedule"))
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    Error::Config(format!("schedule should be specified for {name}"))
                })?;
            let schedule = match schedule {
                "exponential" => CoolingSchedule::Exponential,
                "linear" => CoolingSchedule::Linear,
                other => {
                    return Err(Error::Config(format!(
                        "schedule must be 'exponential' or 'linear', got '{other}'"
                    )))
                }
            };
            Ok(HeuristicSpec::SimulatedAnnealing(SimulatedAnnealing {
                temp_begin: required_f64("tempBegin")?,
                schedule_constant: required_f64("scheduleConstant")?,
                schedule,
                min_energy: optional_f64("minEnergy"),
            }))
        }
        "GA" => Ok(HeuristicSpec::Genetic(GeneticAlgorithm {
            crossover_rate: required_f64("crossoverRate")?,
            mutation_rate: required_f64("mutationRate")?,
            min_fitness: optional_f64("minFitness"),
        })),
        other => Err(Error::Config(format!("unknown heuristic: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_config() -> Value {
        json!({
            "Methods": {
                "method1": {"name": "RG", "iterations": 100},
                "method2": {"name": "BS", "upperBoundLambda": 50.0, "epsilon": 0.01}
            },
            "Seed": 2,
            "VerboseLevel": 0
        })
    }

    #[test]
    fn parses_the_mandatory_pair() {
        let s = Settings::from_json(&base_config()).unwrap();
        assert_eq!(s.seed, 2);
        assert_eq!(s.greedy.budget.max_steps, Some(100));
        assert_eq!(s.greedy.k_best, 1);
        assert!(s.heuristic.is_none());
        assert_eq!(s.binary_search.upper_bound_lambda, 50.0);
    }

    #[test]
    fn missing_rg_is_a_configuration_error() {
        let mut cfg = base_config();
        cfg["Methods"].as_object_mut().unwrap().remove("method1");
        assert!(matches!(
            Settings::from_json(&cfg),
            Err(Error::Config(msg)) if msg.contains("Random Greedy")
        ));
    }

    #[test]
    fn missing_bs_parameters_are_rejected() {
        let mut cfg = base_config();
        cfg["Methods"]["method2"] = json!({"name": "BS", "epsilon": 0.01});
        assert!(Settings::from_json(&cfg).is_err());
    }

    #[test]
    fn parses_a_tabu_heuristic() {
        let mut cfg = base_config();
        cfg["Methods"]["method3"] = json!({
            "name": "TS", "iterations": 500, "startingPointNumber": 4,
            "specialParameters": {"tabuSize": 20, "minScore": 1.5}
        });
        let s = Settings::from_json(&cfg).unwrap();
        assert_eq!(s.greedy.k_best, 4);
        match s.heuristic.unwrap().spec {
            HeuristicSpec::TabuSearch(ts) => {
                assert_eq!(ts.tabu_size, 20);
                assert_eq!(ts.min_score, Some(1.5));
            }
            other => panic!("expected TS, got {}", other.name()),
        }
    }

    #[test]
    fn rejects_two_heuristics() {
        let mut cfg = base_config();
        cfg["Methods"]["method3"] = json!({
            "name": "LS", "iterations": 10, "startingPointNumber": 1
        });
        cfg["Methods"]["method4"] = json!({
            "name": "SA", "iterations": 10, "startingPointNumber": 1,
            "specialParameters": {"tempBegin": 5.0, "scheduleConstant": 0.9,
                                   "schedule": "exponential"}
        });
        assert!(Settings::from_json(&cfg).is_err());
    }

    #[test]
    fn rejects_budgetless_methods() {
        let mut cfg = base_config();
        cfg["Methods"]["method1"] = json!({"name": "RG"});
        assert!(matches!(
            Settings::from_json(&cfg),
            Err(Error::Config(msg)) if msg.contains("duration or iterations")
        ));
    }

    #[test]
    fn sa_schedule_must_be_a_known_keyword() {
        let mut cfg = base_config();
        cfg["Methods"]["method3"] = json!({
            "name": "SA", "iterations": 10, "startingPointNumber": 1,
            "specialParameters": {"tempBegin": 5.0, "scheduleConstant": 0.9,
                                   "schedule": "quadratic"}
        });
        assert!(Settings::from_json(&cfg).is_err());
    }
}
