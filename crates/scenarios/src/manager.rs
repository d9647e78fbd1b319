use std::sync::Arc;

use eta_core::{DeliveryOrder, Scenario};
use eta_predictors::DeliveryEstimator;

use crate::presets::Preset;
use crate::store::SessionStore;
use crate::{Result, ScenarioError};

/// Scores what-if orders through an injected estimator and files them in a
/// session store.
pub struct ScenarioManager {
    estimator: Arc<dyn DeliveryEstimator>,
}

impl ScenarioManager {
    pub fn new(estimator: Arc<dyn DeliveryEstimator>) -> Self {
        Self { estimator }
    }

    pub fn score(&self, name: &str, order: DeliveryOrder) -> Result<Scenario> {
        if name.trim().is_empty() {
            return Err(ScenarioError::EmptyName);
        }
        let estimate = self.estimator.estimate(&order.to_record())?;
        Ok(Scenario {
            name: name.to_string(),
            order,
            estimate,
        })
    }

    /// Scores and stores a named scenario. The name is checked before scoring.
    pub fn add_scenario<'s>(
        &self,
        store: &'s mut SessionStore,
        name: &str,
        order: DeliveryOrder,
    ) -> Result<&'s Scenario> {
        if store.contains_scenario(name) {
            return Err(ScenarioError::DuplicateName(name.to_string()));
        }
        let scenario = self.score(name, order)?;
        tracing::info!(scenario = name, minutes = scenario.minutes(), "scenario added");
        store.add_scenario(scenario)?;
        let idx = store.scenarios().len() - 1;
        Ok(&store.scenarios()[idx])
    }

    /// Adds a preset unless a scenario with its name is already present.
    /// Returns whether anything was added.
    pub fn add_preset(&self, store: &mut SessionStore, preset: Preset) -> Result<bool> {
        if store.contains_scenario(preset.name()) {
            tracing::debug!(preset = preset.name(), "preset already present");
            return Ok(false);
        }
        self.add_scenario(store, preset.name(), preset.order())?;
        Ok(true)
    }
}
