use serde::{Deserialize, Serialize};

use eta_core::{PipelineError, Result};

use crate::NumericScaler;

/// `(x - mean) / scale`, per column. A zero scale passes the centred value through.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// `x * scale + min`, per column, as fitted onto a target range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MinMaxScaler {
    pub min: Vec<f64>,
    pub scale: Vec<f64>,
}

impl NumericScaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, values: &[f64]) -> Result<Vec<f64>> {
        check_width(self.n_features(), values)?;
        Ok(values
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (m, s))| if *s == 0.0 { x - m } else { (x - m) / s })
            .collect())
    }
}

impl NumericScaler for MinMaxScaler {
    fn n_features(&self) -> usize {
        self.min.len()
    }

    fn transform(&self, values: &[f64]) -> Result<Vec<f64>> {
        check_width(self.n_features(), values)?;
        Ok(values
            .iter()
            .zip(self.min.iter().zip(&self.scale))
            .map(|(x, (m, s))| x * s + m)
            .collect())
    }
}

fn check_width(expected: usize, values: &[f64]) -> Result<()> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(PipelineError::Inference {
            expected,
            actual: values.len(),
        })
    }
}
