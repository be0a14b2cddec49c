//! Driver configuration structures and loaders.
use std::env;
use std::path::PathBuf;

use gear_core::SolverConfig;
use gear_runtime::RuntimeConfig;

use crate::dirs;

/// Configuration required to bootstrap the runtime from the command line.
#[derive(Clone, Debug)]
pub struct CliConfig {
    /// Directory holding `items.ron`, `materia.ron`, `sources.ron` and
    /// `solver.toml`.
    pub data_dir: PathBuf,
    /// Directory gearsets are saved to.
    pub save_dir: PathBuf,
    /// Also write logs to files in this directory.
    pub log_dir: Option<PathBuf>,
    pub command_buffer: usize,
    /// Overrides for the solver policy loaded from `solver.toml`.
    pub strict_materia: Option<bool>,
    pub prerequisite_materia: Option<bool>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::bundled_data_dir(),
            save_dir: dirs::save_dir(),
            log_dir: None,
            command_buffer: RuntimeConfig::default().command_buffer_size,
            strict_materia: None,
            prerequisite_materia: None,
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `GEARPLAN_DATA_DIR` - Static content directory (default: bundled data)
    /// - `GEARPLAN_SAVE_DIR` - Gearset save directory (default: platform-specific)
    /// - `GEARPLAN_LOG_DIR` - Enables file logging into this directory
    /// - `GEARPLAN_COMMAND_BUFFER` - Worker command queue size (default: 32)
    /// - `GEARPLAN_STRICT_MATERIA` - Override `strict_materia_matching`
    /// - `GEARPLAN_PREREQ_MATERIA` - Override `include_prerequisite_materia`
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an explicit variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = var("GEARPLAN_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var("GEARPLAN_SAVE_DIR") {
            config.save_dir = PathBuf::from(dir);
        }
        config.log_dir = var("GEARPLAN_LOG_DIR").map(PathBuf::from);

        if let Some(capacity) = parse(&var, "GEARPLAN_COMMAND_BUFFER") {
            config.command_buffer = usize::max(capacity, 1);
        }
        config.strict_materia = parse(&var, "GEARPLAN_STRICT_MATERIA");
        config.prerequisite_materia = parse(&var, "GEARPLAN_PREREQ_MATERIA");

        config
    }

    /// Applies the environment overrides on top of `base`.
    pub fn solver(&self, base: SolverConfig) -> SolverConfig {
        let mut solver = base;
        if let Some(strict) = self.strict_materia {
            solver = solver.with_strict_materia_matching(strict);
        }
        if let Some(include) = self.prerequisite_materia {
            solver = solver.with_prerequisite_materia(include);
        }
        solver
    }

    pub fn runtime(&self, base: SolverConfig) -> RuntimeConfig {
        RuntimeConfig {
            solver: self.solver(base),
            command_buffer_size: self.command_buffer,
            ..RuntimeConfig::default()
        }
    }
}

fn parse<T>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    var(key)?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> CliConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        CliConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let config = config(&[]);

        assert_eq!(config.command_buffer, 32);
        assert!(config.log_dir.is_none());
        assert_eq!(config.solver(SolverConfig::default()), SolverConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = config(&[
            ("GEARPLAN_SAVE_DIR", "/tmp/sets"),
            ("GEARPLAN_COMMAND_BUFFER", "0"),
            ("GEARPLAN_STRICT_MATERIA", "true"),
            ("GEARPLAN_PREREQ_MATERIA", "false"),
        ]);

        assert_eq!(config.save_dir, PathBuf::from("/tmp/sets"));
        assert_eq!(config.command_buffer, 1);

        let solver = config.solver(SolverConfig::default());
        assert!(solver.strict_materia_matching);
        assert!(!solver.include_prerequisite_materia);
    }

    #[test]
    fn unparsable_values_are_ignored() {
        let config = config(&[("GEARPLAN_STRICT_MATERIA", "maybe")]);
        assert_eq!(config.strict_materia, None);
    }
}
