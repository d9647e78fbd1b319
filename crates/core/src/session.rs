//! Entries kept per interactive session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::order::DeliveryOrder;
use crate::{Estimate, Minutes};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    pub timestamp: DateTime<Utc>,
    pub estimate: Estimate,
    pub order: DeliveryOrder,
}

impl HistoryRecord {
    pub fn minutes(&self) -> Minutes {
        self.estimate.minutes
    }
}

/// A named what-if order. Names are unique within a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub order: DeliveryOrder,
    pub estimate: Estimate,
}

impl Scenario {
    pub fn minutes(&self) -> Minutes {
        self.estimate.minutes
    }
}
