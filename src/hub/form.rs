//! Parameter form model: widget dispatch and string-to-value coercion
//!
//! Kept free of egui so the same form drives both the GUI and `run`.

use thiserror::Error;

use crate::constants::hub::{FLOAT_RANGE, FLOAT_STEP, INT_RANGE};
use crate::hub::function::Args;
use crate::types::{FunctionSpec, ParamKind, ParamSpec, Value, format_float};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoerceError {
    #[error("Parameter '{0}' must be an integer")]
    Integer(String),
    #[error("Parameter '{0}' must be a float")]
    Float(String),
    #[error("Parameter '{0}' must be true or false")]
    Bool(String),
    #[error("Unknown parameter '{0}'")]
    Unknown(String),
}

/// Input widget chosen for a parameter kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Widget {
    Checkbox,
    IntSpin { min: i64, max: i64 },
    FloatSpin { min: f64, max: f64, step: f64 },
    Entry,
}

impl Widget {
    pub fn for_kind(kind: ParamKind) -> Self {
        match kind {
            ParamKind::Bool => Self::Checkbox,
            ParamKind::Int => Self::IntSpin {
                min: INT_RANGE.0,
                max: INT_RANGE.1,
            },
            ParamKind::Float => Self::FloatSpin {
                min: FLOAT_RANGE.0,
                max: FLOAT_RANGE.1,
                step: FLOAT_STEP,
            },
            ParamKind::Str => Self::Entry,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    Flag(bool),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub spec: ParamSpec,
    pub input: FieldInput,
}

impl Field {
    pub fn new(spec: ParamSpec) -> Self {
        let input = match spec.kind {
            ParamKind::Bool => FieldInput::Flag(spec.default_text() == "True"),
            _ => FieldInput::Text(spec.default_text()),
        };
        Self { spec, input }
    }

    pub fn widget(&self) -> Widget {
        Widget::for_kind(self.spec.kind)
    }

    /// Spin the value up (`direction > 0`) or down, clamped to the widget range.
    /// Unparseable text restarts from zero.
    pub fn step(&mut self, direction: i32) {
        let FieldInput::Text(text) = &mut self.input else {
            return;
        };
        match Widget::for_kind(self.spec.kind) {
            Widget::IntSpin { min, max } => {
                let current = text.trim().parse::<i64>().unwrap_or(0);
                let next = current.saturating_add(i64::from(direction.signum())).clamp(min, max);
                *text = next.to_string();
            }
            Widget::FloatSpin { min, max, step } => {
                let current = text.trim().parse::<f64>().unwrap_or(0.0);
                let next = (current + step * f64::from(direction.signum())).clamp(min, max);
                *text = format_float((next * 10.0).round() / 10.0);
            }
            Widget::Checkbox | Widget::Entry => {}
        }
    }

    /// Set from free text, as given on a command line
    pub fn set_text(&mut self, raw: &str) -> Result<(), CoerceError> {
        match &mut self.input {
            FieldInput::Flag(flag) => {
                *flag = parse_flag(raw).ok_or_else(|| CoerceError::Bool(self.spec.name.clone()))?;
            }
            FieldInput::Text(text) => *text = raw.to_string(),
        }
        Ok(())
    }

    pub fn coerce(&self) -> Result<Value, CoerceError> {
        let name = &self.spec.name;
        match (&self.input, self.spec.kind) {
            (FieldInput::Flag(flag), _) => Ok(Value::Bool(*flag)),
            (FieldInput::Text(text), ParamKind::Int) => text
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| CoerceError::Integer(name.clone())),
            (FieldInput::Text(text), ParamKind::Float) => text
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| CoerceError::Float(name.clone())),
            (FieldInput::Text(text), ParamKind::Bool) => parse_flag(text)
                .map(Value::Bool)
                .ok_or_else(|| CoerceError::Bool(name.clone())),
            (FieldInput::Text(text), ParamKind::Str) => Ok(Value::Str(text.clone())),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// One input row per parameter of the selected function
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamForm {
    fields: Vec<Field>,
}

impl ParamForm {
    pub fn for_function(spec: &FunctionSpec) -> Self {
        let fields = spec
            .params
            .iter()
            .filter(|p| p.name != "self")
            .cloned()
            .map(Field::new)
            .collect();
        Self { fields }
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn set(&mut self, name: &str, raw: &str) -> Result<(), CoerceError> {
        self.fields
            .iter_mut()
            .find(|f| f.spec.name == name)
            .ok_or_else(|| CoerceError::Unknown(name.to_string()))?
            .set_text(raw)
    }

    /// Convert every field in order, stopping at the first failure
    pub fn coerce(&self) -> Result<Args, CoerceError> {
        let mut args = Args::new();
        for field in &self.fields {
            args.insert(field.spec.name.clone(), field.coerce()?);
        }
        Ok(args)
    }
}
