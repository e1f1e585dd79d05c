//! Operation arguments: the declared schema and the parsed values.
//!
//! The host hands arguments over as an ordered list, `[Width, Height, Units]`,
//! matching the order of [`arg_specs`]. Missing trailing entries fall back to
//! the declared defaults.

use super::OperationError;
use crate::imaging::Units;
use serde::Serialize;
use serde_json::Value;

pub const NEGATIVE_DIMENSION: &str = "Width and height must be greater than or equal to 0";

const AUTO_SCALE_HINT: &str = "0 = auto scale";

/// Kind of input a declared argument expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgType {
    Number,
    Option,
}

/// Default value of a declared argument. For options, the list of choices
/// with the default first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ArgDefault {
    Number(f64),
    Options(Vec<&'static str>),
}

/// One entry of the argument schema surfaced to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArgSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: ArgType,
    pub value: ArgDefault,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

/// The declared arguments, in the order the host passes them.
pub fn arg_specs() -> Vec<ArgSpec> {
    vec![
        ArgSpec {
            name: "Width",
            kind: ArgType::Number,
            value: ArgDefault::Number(0.0),
            hint: Some(AUTO_SCALE_HINT),
        },
        ArgSpec {
            name: "Height",
            kind: ArgType::Number,
            value: ArgDefault::Number(0.0),
            hint: Some(AUTO_SCALE_HINT),
        },
        ArgSpec {
            name: "Units",
            kind: ArgType::Option,
            value: ArgDefault::Options(Units::LABELS.to_vec()),
            hint: None,
        },
    ]
}

/// Parsed sizing arguments.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResizeArgs {
    pub width: f64,
    pub height: f64,
    pub units: Units,
}

impl ResizeArgs {
    pub fn new(width: f64, height: f64, units: Units) -> Self {
        Self {
            width,
            height,
            units,
        }
    }

    pub fn pixels(width: f64, height: f64) -> Self {
        Self::new(width, height, Units::Pixels)
    }

    pub fn percentage(width: f64, height: f64) -> Self {
        Self::new(width, height, Units::Percentage)
    }

    /// Parse the host's ordered argument list.
    pub fn from_values(values: &[Value]) -> Result<Self, OperationError> {
        let width = number_arg(values.first(), "Width")?;
        let height = number_arg(values.get(1), "Height")?;
        let units = match values.get(2) {
            None | Some(Value::Null) => Units::default(),
            Some(Value::String(label)) => Units::from_label(label).ok_or_else(|| {
                OperationError::InvalidArgument(format!(
                    "Units must be one of {}, got \"{label}\"",
                    Units::LABELS.join(", ")
                ))
            })?,
            Some(other) => {
                return Err(OperationError::InvalidArgument(format!(
                    "Units must be a string, got {other}"
                )));
            }
        };
        Ok(Self::new(width, height, units))
    }

    /// Reject negative or non-finite sizes.
    pub fn validate(&self) -> Result<(), OperationError> {
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        if !valid(self.width) || !valid(self.height) {
            return Err(OperationError::InvalidArgument(NEGATIVE_DIMENSION.into()));
        }
        Ok(())
    }
}

fn number_arg(value: Option<&Value>, name: &str) -> Result<f64, OperationError> {
    match value {
        None | Some(Value::Null) => Ok(0.0),
        Some(Value::Number(n)) => n.as_f64().ok_or_else(|| {
            OperationError::InvalidArgument(format!("{name} must be a number, got {n}"))
        }),
        Some(other) => Err(OperationError::InvalidArgument(format!(
            "{name} must be a number, got {other}"
        ))),
    }
}
