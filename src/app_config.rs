//! Command-line interface and application-directory layout.
//!
//! The optimizer works inside an application directory prepared by the
//! surrounding toolchain: the transcoded system description and run
//! configuration live under `space4ai-d/`, and the solution documents are
//! written back there.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::error::{Error, Result};

/// Command-line interface definition for EdgePlan
#[derive(Parser, Debug)]
#[command(name = "edgeplan")]
#[command(about = "Design-time placement optimizer for DAG applications")]
pub struct Cli {
    /// Application directory containing the transcoded manifests
    #[arg(short = 'C', long)]
    pub application_dir: String,

    /// Tracing filter, e.g. "info" or "edgeplan=debug"
    #[arg(long, default_value = "info")]
    pub verbosity: String,

    /// Number of search workers (defaults to one per core)
    #[arg(long)]
    pub workers: Option<usize>,
}

/// Input and output files inside an application directory.
#[derive(Debug, Clone)]
pub struct ApplicationPaths {
    pub system_file: PathBuf,
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub max_lambda_file: PathBuf,
}

impl ApplicationPaths {
    /// Resolve and validate the layout. Both input files must already
    /// exist; missing inputs are fatal.
    pub fn resolve(application_dir: &Path) -> Result<Self> {
        if !application_dir.is_dir() {
            return Err(Error::MissingInput(format!(
                "application directory {}",
                application_dir.display()
            )));
        }
        let space4aid = application_dir.join("space4ai-d");
        let paths = Self {
            system_file: space4aid.join("SystemFile.json"),
            input_file: space4aid.join("Input.json"),
            output_file: space4aid.join("Output.json"),
            max_lambda_file: space4aid.join("Output_max_Lambda.json"),
        };
        for input in [&paths.system_file, &paths.input_file] {
            if !input.is_file() {
                return Err(Error::MissingInput(input.display().to_string()));
            }
        }
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_is_reported() {
        let err = ApplicationPaths::resolve(Path::new("/nonexistent/app")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/app"));
    }

    #[test]
    fn resolves_a_prepared_directory() {
        let dir = tempfile::tempdir().unwrap();
        let space4aid = dir.path().join("space4ai-d");
        std::fs::create_dir(&space4aid).unwrap();
        std::fs::write(space4aid.join("SystemFile.json"), "{}").unwrap();
        std::fs::write(space4aid.join("Input.json"), "{}").unwrap();

        let paths = ApplicationPaths::resolve(dir.path()).unwrap();
        assert!(paths.system_file.ends_with("space4ai-d/SystemFile.json"));
        assert!(paths.output_file.ends_with("space4ai-d/Output.json"));
    }

    #[test]
    fn missing_input_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("space4ai-d")).unwrap();
        assert!(ApplicationPaths::resolve(dir.path()).is_err());
    }
}
