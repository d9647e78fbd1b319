use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use eta_core::{DeliveryOrder, Estimate, HistoryRecord, Scenario};

use crate::{Result, ScenarioError};

/// History and scenarios for one session. History is append-only until
/// cleared; scenario names are unique.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionStore {
    history: Vec<HistoryRecord>,
    scenarios: Vec<Scenario>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_prediction(&mut self, order: DeliveryOrder, estimate: Estimate) -> &HistoryRecord {
        self.record_prediction_at(Utc::now(), order, estimate)
    }

    pub fn record_prediction_at(
        &mut self,
        timestamp: DateTime<Utc>,
        order: DeliveryOrder,
        estimate: Estimate,
    ) -> &HistoryRecord {
        self.history.push(HistoryRecord {
            timestamp,
            estimate,
            order,
        });
        &self.history[self.history.len() - 1]
    }

    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn scenario(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }

    pub fn contains_scenario(&self, name: &str) -> bool {
        self.scenario(name).is_some()
    }

    pub fn add_scenario(&mut self, scenario: Scenario) -> Result<()> {
        if scenario.name.trim().is_empty() {
            return Err(ScenarioError::EmptyName);
        }
        if self.contains_scenario(&scenario.name) {
            return Err(ScenarioError::DuplicateName(scenario.name));
        }
        self.scenarios.push(scenario);
        Ok(())
    }

    pub fn remove_scenario(&mut self, name: &str) -> Result<Scenario> {
        let idx = self
            .scenarios
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| ScenarioError::UnknownScenario(name.to_string()))?;
        Ok(self.scenarios.remove(idx))
    }

    pub fn clear_scenarios(&mut self) {
        self.scenarios.clear();
    }
}
