//! Opaque response-time predictor backed by a coefficient file.
//!
//! The file is JSON with an intercept and named weights:
//! `{"intercept": 0.1, "coefficients": {"lambda": 0.004, "cores": -0.02}}`.
//! Only the `predict(features) -> time` contract matters to the search;
//! missing features contribute nothing.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use serde::Deserialize;
use tracing::error;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
struct Coefficients {
    intercept: f64,
    #[serde(default)]
    coefficients: BTreeMap<String, f64>,
}

#[derive(Debug, Clone)]
pub struct Regressor {
    path: PathBuf,
    coeffs: OnceCell<Coefficients>,
}

impl Regressor {
    /// Reference a coefficient file. The file must exist (missing inputs
    /// are fatal at load time); parsing happens on first prediction.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(Error::MissingInput(format!(
                "regressor file {}",
                path.display()
            )));
        }
        Ok(Self {
            path,
            coeffs: OnceCell::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Evaluate the regressor on a feature map. A file that turns out to
    /// be unreadable yields an infinite time, so the affected candidate is
    /// discarded as infeasible instead of aborting the search.
    pub fn predict(&self, features: &[(&str, f64)]) -> f64 {
        let coeffs = self.coeffs.get_or_try_init(|| self.load());
        match coeffs {
            Ok(c) => {
                let mut time = c.intercept;
                for (name, value) in features {
                    if let Some(w) = c.coefficients.get(*name) {
                        time += w * value;
                    }
                }
                time.max(0.0)
            }
            Err(e) => {
                error!(path = %self.path.display(), "regressor unusable: {e}");
                f64::INFINITY
            }
        }
    }

    fn load(&self) -> Result<Coefficients> {
        let text = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&text).map_err(|e| Error::Regressor(format!("{}: {e}", self.path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_rejected_up_front() {
        assert!(Regressor::open("/nonexistent/model.json").is_err());
    }

    #[test]
    fn predicts_linear_combination() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"intercept": 0.1, "coefficients": {{"lambda": 0.01, "cores": -0.02}}}}"#
        )
        .unwrap();
        let r = Regressor::open(file.path()).unwrap();
        let t = r.predict(&[("lambda", 10.0), ("cores", 2.0), ("unused", 5.0)]);
        assert!((t - (0.1 + 0.1 - 0.04)).abs() < 1e-12);
    }

    #[test]
    fn corrupt_file_degrades_to_infinite_time() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let r = Regressor::open(file.path()).unwrap();
        assert!(r.predict(&[("lambda", 1.0)]).is_infinite());
    }
}
