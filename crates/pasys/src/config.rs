//! Study configuration loading.
//!
//! A study file (YAML or JSON) declares the architecture, the scenario,
//! optional requirements, and for batch studies a design space and
//! objectives.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, eyre};
use serde::Deserialize;

use pasys_core::{
    Architecture, DesignSpace, Objective, Requirement, RequirementSet, Scenario, Variable,
};

#[derive(Debug, Clone, Deserialize)]
pub struct StudyConfig {
    pub name: String,
    #[serde(default)]
    pub architecture: Architecture,
    pub scenario: Scenario,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub design_space: Vec<Variable>,
    #[serde(default)]
    pub objectives: Vec<Objective>,
}

impl StudyConfig {
    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("reading config {}", path.display()))?;

        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&text)
                .wrap_err_with(|| format!("parsing {}", path.display()))?,
            Some("yaml" | "yml") => serde_saphyr::from_str(&text)
                .map_err(|e| eyre!("parsing {}: {e}", path.display()))?,
            other => {
                return Err(eyre!(
                    "unsupported config extension {:?} (expected json, yaml or yml)",
                    other
                ));
            }
        };

        config.architecture.validate()?;
        config.scenario.validate()?;
        Ok(config)
    }

    /// Requirement set, or None when the study declares no requirements.
    pub fn requirement_set(&self) -> color_eyre::Result<Option<RequirementSet>> {
        if self.requirements.is_empty() {
            return Ok(None);
        }
        let set = RequirementSet::new(self.name.clone(), self.requirements.clone())?;
        Ok(Some(set))
    }

    /// Design space declared for batch studies.
    pub fn design_space(&self) -> color_eyre::Result<DesignSpace> {
        if self.design_space.is_empty() {
            return Err(eyre!("study '{}' declares no design_space", self.name));
        }
        Ok(DesignSpace::from_variables(self.design_space.clone())?)
    }
}
