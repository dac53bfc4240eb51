//! Statuses and the rules that constrain their values.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{HouseMateError, Result, ValueRejected};

/// Separator between the allowed values of an enum status.
pub const ENUM_VALUE_SEPARATOR: char = '|';

/// A named value attached to a sensor, appliance or occupant.
///
/// Identified as `owner:name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub value: Option<String>,
    pub options: Option<StatusOptions>,
}

impl Status {
    /// Create an unset status with no constraints.
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            id: format!("{owner}:{name}"),
            name: name.to_string(),
            owner: owner.to_string(),
            value: None,
            options: None,
        }
    }

    /// The value that storing `requested` would actually produce.
    pub fn resolve(&self, requested: &str) -> std::result::Result<String, ValueRejected> {
        match &self.options {
            Some(options) => options.apply(requested, self.value.as_deref()),
            None => Ok(requested.to_string()),
        }
    }
}

/// Constraints on the values of a status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StatusOptions {
    /// Only the listed values are accepted.
    Enum { values: Vec<String> },
    /// An integer clamped to `[min, max]`.
    Range(RangeOptions),
}

/// Bounds and keywords of a range status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeOptions {
    pub min: i64,
    pub max: i64,

    /// Keyword that raises the value by one.
    pub incrementor: Option<String>,

    /// Keyword that lowers the value by one.
    pub decrementor: Option<String>,

    /// Keyword that jumps to `min`.
    pub min_label: Option<String>,

    /// Keyword that jumps to `max`.
    pub max_label: Option<String>,
}

impl RangeOptions {
    pub fn new(min: i64, max: i64) -> Self {
        Self {
            min,
            max,
            incrementor: None,
            decrementor: None,
            min_label: None,
            max_label: None,
        }
    }

    pub fn with_incrementor(mut self, keyword: impl Into<String>) -> Self {
        self.incrementor = Some(keyword.into());
        self
    }

    pub fn with_decrementor(mut self, keyword: impl Into<String>) -> Self {
        self.decrementor = Some(keyword.into());
        self
    }

    pub fn with_labels(
        mut self,
        min_label: impl Into<String>,
        max_label: impl Into<String>,
    ) -> Self {
        self.min_label = Some(min_label.into());
        self.max_label = Some(max_label.into());
        self
    }

    fn apply(
        &self,
        requested: &str,
        current: Option<&str>,
    ) -> std::result::Result<i64, ValueRejected> {
        let is = |keyword: &Option<String>| {
            keyword
                .as_deref()
                .is_some_and(|keyword| keyword.eq_ignore_ascii_case(requested))
        };
        let current_value = || match current {
            Some(value) => value.parse::<i64>().map_err(|_| ValueRejected::NoCurrentValue),
            None => Ok(self.min),
        };

        let value = if is(&self.incrementor) {
            current_value()?.saturating_add(1)
        } else if is(&self.decrementor) {
            current_value()?.saturating_sub(1)
        } else if is(&self.min_label) {
            self.min
        } else if is(&self.max_label) {
            self.max
        } else {
            requested
                .trim()
                .parse::<i64>()
                .map_err(|_| ValueRejected::NotANumber)?
        };

        Ok(value.clamp(self.min, self.max))
    }
}

impl StatusOptions {
    /// Build options from `set options` key/value parameters.
    ///
    /// `type enum` needs `values a|b|c`. `type range` needs `min` and `max`
    /// and accepts `incrementor`, `decrementor`, `minlabel` and `maxlabel`.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self> {
        let kind = params
            .get("type")
            .ok_or_else(|| HouseMateError::invalid_command("set options must include `type`", ""))?;

        match kind.to_lowercase().as_str() {
            "enum" => {
                let values = params.get("values").ok_or_else(|| {
                    HouseMateError::invalid_command(
                        "enum options must include `values`",
                        kind.as_str(),
                    )
                })?;
                let values: Vec<String> = values
                    .split(ENUM_VALUE_SEPARATOR)
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
                    .collect();
                if values.is_empty() {
                    return Err(HouseMateError::invalid_command(
                        "enum options need at least one value",
                        kind.as_str(),
                    ));
                }
                Ok(StatusOptions::Enum { values })
            }
            "range" => {
                let bound = |key: &str| -> Result<i64> {
                    let raw = params.get(key).ok_or_else(|| {
                        HouseMateError::invalid_command(
                            "range options must include `min` and `max`",
                            kind.as_str(),
                        )
                    })?;
                    raw.parse().map_err(|_| {
                        HouseMateError::invalid_command(
                            format!("`{key}` must be an integer"),
                            raw.as_str(),
                        )
                    })
                };
                let (min, max) = (bound("min")?, bound("max")?);
                if min > max {
                    return Err(HouseMateError::invalid_command(
                        "`min` must not exceed `max`",
                        format!("{min} {max}"),
                    ));
                }
                Ok(StatusOptions::Range(RangeOptions {
                    min,
                    max,
                    incrementor: params.get("incrementor").cloned(),
                    decrementor: params.get("decrementor").cloned(),
                    min_label: params.get("minlabel").cloned(),
                    max_label: params.get("maxlabel").cloned(),
                }))
            }
            _ => Err(HouseMateError::invalid_command(
                "options type must be `enum` or `range`",
                kind.as_str(),
            )),
        }
    }

    /// Check `requested` against the options and return the value to store.
    pub fn apply(
        &self,
        requested: &str,
        current: Option<&str>,
    ) -> std::result::Result<String, ValueRejected> {
        match self {
            StatusOptions::Enum { values } => values
                .iter()
                .find(|value| value.eq_ignore_ascii_case(requested))
                .cloned()
                .ok_or_else(|| ValueRejected::NotInEnum(values.join("|"))),
            StatusOptions::Range(range) => {
                range.apply(requested, current).map(|value| value.to_string())
            }
        }
    }
}
