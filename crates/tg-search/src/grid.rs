//! Parameter grid declaration and Cartesian expansion.

use serde::{Deserialize, Serialize};

use tg_types::{InvalidGridError, ParamSet, ParamValue};

/// Declared search space: an ordered list of parameter names, each with
/// a non-empty sequence of candidate values.
///
/// Declaration order is significant: combinations are enumerated with
/// the last-declared parameter varying fastest, so results are stable
/// across runs given the same grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ParamGrid {
    parameters: Vec<(String, Vec<ParamValue>)>,
}

impl ParamGrid {
    pub fn new() -> Self {
        Self {
            parameters: Vec::new(),
        }
    }

    pub fn add(mut self, name: impl Into<String>, values: Vec<ParamValue>) -> Self {
        self.parameters.push((name.into(), values));
        self
    }

    pub fn add_floats(self, name: impl Into<String>, values: &[f64]) -> Self {
        self.add(name, values.iter().map(|&v| ParamValue::Float(v)).collect())
    }

    pub fn add_ints(self, name: impl Into<String>, values: &[i64]) -> Self {
        self.add(name, values.iter().map(|&v| ParamValue::Int(v)).collect())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|(n, _)| n.as_str())
    }

    pub fn n_parameters(&self) -> usize {
        self.parameters.len()
    }

    /// Candidate values declared for `name`, in declaration order.
    pub fn values(&self, name: &str) -> Option<&[ParamValue]> {
        self.parameters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Reject grids that cannot expand: no parameters, an empty
    /// candidate list, or a duplicated parameter name.
    pub fn validate(&self) -> Result<(), InvalidGridError> {
        if self.parameters.is_empty() {
            return Err(InvalidGridError::NoParameters);
        }
        for (i, (name, values)) in self.parameters.iter().enumerate() {
            if values.is_empty() {
                return Err(InvalidGridError::EmptyValueList {
                    parameter: name.clone(),
                });
            }
            if self.parameters[..i].iter().any(|(n, _)| n == name) {
                return Err(InvalidGridError::DuplicateParameter {
                    parameter: name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Number of combinations the grid expands to: the product of each
    /// candidate list's length.
    pub fn size(&self) -> Result<usize, InvalidGridError> {
        self.validate()?;
        let mut total: usize = 1;
        for (_, values) in &self.parameters {
            total = total
                .checked_mul(values.len())
                .ok_or(InvalidGridError::TooLarge)?;
        }
        Ok(total)
    }

    /// Materialize every combination in enumeration order.
    ///
    /// Pure function of the grid; validation failures surface here
    /// before any training can occur.
    pub fn expand(&self) -> Result<Vec<ParamSet>, InvalidGridError> {
        self.size()?;

        // Cartesian product, axis by axis: each declared parameter
        // multiplies the partial combinations built so far, so the
        // last-declared parameter varies fastest.
        let mut result: Vec<ParamSet> = vec![ParamSet::new()];
        for (name, values) in &self.parameters {
            let mut next = Vec::with_capacity(result.len() * values.len());
            for existing in &result {
                for value in values {
                    let mut combo = existing.clone();
                    combo.insert(name.clone(), value.clone());
                    next.push(combo);
                }
            }
            result = next;
        }
        Ok(result)
    }
}
