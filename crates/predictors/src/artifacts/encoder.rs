use serde::{Deserialize, Serialize};

use eta_core::{PipelineError, Result};

use crate::{CategoricalEncoder, EncodedRow};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UnknownPolicy {
    /// Reject values not seen at fit time.
    #[default]
    Error,
    /// Encode unseen values as an all-zero block.
    Ignore,
}

/// One indicator column per fitted category, blocks concatenated in column order.
/// Category matching is exact; no case folding or trimming happens here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OneHotEncoder {
    pub categories: Vec<Vec<String>>,
    #[serde(default)]
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub handle_unknown: UnknownPolicy,
    #[serde(default = "default_sparse")]
    pub sparse_output: bool,
}

fn default_sparse() -> bool {
    true
}

impl CategoricalEncoder for OneHotEncoder {
    fn output_width(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    fn transform(&self, row: &[(&str, String)]) -> Result<EncodedRow> {
        if row.len() != self.categories.len() {
            return Err(PipelineError::Inference {
                expected: self.categories.len(),
                actual: row.len(),
            });
        }
        if let Some((idx, (column, _))) = row
            .iter()
            .enumerate()
            .find(|(idx, (column, _))| self.feature_names.get(*idx).is_some_and(|name| name.as_str() != *column))
        {
            return Err(PipelineError::Encoding {
                column: column.to_string(),
                value: String::new(),
                reason: format!("encoder expects column {} at position {idx}", self.feature_names[idx]),
            });
        }

        let mut entries = Vec::with_capacity(row.len());
        let mut offset = 0;
        for ((column, value), categories) in row.iter().zip(&self.categories) {
            match categories.iter().position(|c| c == value) {
                Some(pos) => entries.push((offset + pos, 1.0)),
                None if self.handle_unknown == UnknownPolicy::Ignore => {}
                None => {
                    return Err(PipelineError::Encoding {
                        column: column.to_string(),
                        value: value.clone(),
                        reason: "category not seen during fit".to_string(),
                    })
                }
            }
            offset += categories.len();
        }

        let encoded = EncodedRow::Sparse {
            width: offset,
            entries,
        };
        Ok(if self.sparse_output {
            encoded
        } else {
            EncodedRow::Dense(encoded.into_dense())
        })
    }
}
