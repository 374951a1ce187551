//! Linear multi-step form wizard.
//!
//! A form moves one step at a time; leaving a step requires that step to
//! validate. Publishing requires every step to validate. The form travels as
//! `multipart/form-data`, so each form also knows how to flatten itself into
//! ordered name/value pairs and read itself back.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;

/// Validation failure on one wizard step
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{step_title}: {message}")]
pub struct StepError {
    pub step: usize,
    pub step_title: &'static str,
    pub field: &'static str,
    pub message: String,
}

/// A submitted field that could not be read back into the form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field `{field}`: {message}")]
pub struct FormFieldError {
    pub field: String,
    pub message: String,
}

pub trait WizardForm: Sized {
    /// Step titles, in order
    fn steps() -> &'static [&'static str];

    fn validate_step(&self, step: usize) -> Result<(), StepError>;

    /// Text parts of the `multipart/form-data` body. Lists go as JSON arrays.
    fn to_form_fields(&self) -> Vec<(String, String)>;

    fn from_form_fields(fields: &[(String, String)]) -> Result<Self, FormFieldError>;

    fn step_error(step: usize, field: &'static str, message: impl Into<String>) -> StepError {
        StepError {
            step,
            step_title: Self::steps().get(step).copied().unwrap_or("Unknown step"),
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Wizard<F: WizardForm> {
    form: F,
    current_step: usize,
}

impl<F: WizardForm> Wizard<F> {
    pub fn new(form: F) -> Self {
        Self {
            form,
            current_step: 0,
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn step_count(&self) -> usize {
        F::steps().len()
    }

    pub fn step_title(&self) -> &'static str {
        F::steps().get(self.current_step).copied().unwrap_or("")
    }

    pub fn is_first_step(&self) -> bool {
        self.current_step == 0
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step + 1 >= self.step_count()
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub fn into_form(self) -> F {
        self.form
    }

    /// Validate the current step and advance. Stays put on the last step.
    pub fn next(&mut self) -> Result<usize, StepError> {
        self.form.validate_step(self.current_step)?;
        if !self.is_last_step() {
            self.current_step += 1;
        }
        Ok(self.current_step)
    }

    pub fn back(&mut self) -> usize {
        self.current_step = self.current_step.saturating_sub(1);
        self.current_step
    }

    /// Jump to a step. Going forward requires every step before the target
    /// to validate; the first failing step becomes current.
    pub fn go_to(&mut self, step: usize) -> Result<usize, StepError> {
        let target = step.min(self.step_count().saturating_sub(1));
        if target <= self.current_step {
            self.current_step = target;
            return Ok(target);
        }
        for s in 0..target {
            if let Err(e) = self.form.validate_step(s) {
                self.current_step = s;
                return Err(e);
            }
        }
        self.current_step = target;
        Ok(target)
    }

    /// Publish guard
    pub fn validate_all(&self) -> Result<(), StepError> {
        (0..self.step_count()).try_for_each(|s| self.form.validate_step(s))
    }
}

/// Read access to submitted form fields. Missing fields read as defaults;
/// present but unparsable ones are errors.
pub struct FormFields<'a> {
    fields: &'a [(String, String)],
}

impl<'a> FormFields<'a> {
    pub fn new(fields: &'a [(String, String)]) -> Self {
        Self { fields }
    }

    fn raw(&self, name: &str) -> Option<&'a str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn text(&self, name: &str) -> String {
        self.raw(name).map(|v| v.trim().to_string()).unwrap_or_default()
    }

    pub fn opt_text(&self, name: &str) -> Option<String> {
        self.raw(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn number<T>(&self, name: &str) -> Result<T, FormFieldError>
    where
        T: FromStr + Default,
    {
        Ok(self.opt_number(name)?.unwrap_or_default())
    }

    pub fn opt_number<T: FromStr>(&self, name: &str) -> Result<Option<T>, FormFieldError> {
        match self.opt_text(name) {
            None => Ok(None),
            Some(v) => v.parse::<T>().map(Some).map_err(|_| FormFieldError {
                field: name.to_string(),
                message: format!("`{}` is not a valid number", v),
            }),
        }
    }

    pub fn flag(&self, name: &str) -> Result<bool, FormFieldError> {
        match self.opt_text(name).as_deref() {
            None => Ok(false),
            Some("true") | Some("1") | Some("on") => Ok(true),
            Some("false") | Some("0") | Some("off") => Ok(false),
            Some(other) => Err(FormFieldError {
                field: name.to_string(),
                message: format!("`{}` is not a boolean", other),
            }),
        }
    }

    pub fn json<T>(&self, name: &str) -> Result<T, FormFieldError>
    where
        T: DeserializeOwned + Default,
    {
        match self.opt_text(name) {
            None => Ok(T::default()),
            Some(v) => serde_json::from_str(&v).map_err(|e| FormFieldError {
                field: name.to_string(),
                message: e.to_string(),
            }),
        }
    }

    pub fn parsed<T>(&self, name: &str) -> Result<Option<T>, FormFieldError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.opt_text(name) {
            None => Ok(None),
            Some(v) => v.parse::<T>().map(Some).map_err(|e| FormFieldError {
                field: name.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

/// Builder for the ordered field list of `to_form_fields`
#[derive(Default)]
pub struct FormFieldsWriter {
    fields: Vec<(String, String)>,
}

impl FormFieldsWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl ToString) -> Self {
        self.fields.push((name.to_string(), value.to_string()));
        self
    }

    pub fn opt<T: ToString>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.text(name, v),
            None => self,
        }
    }

    pub fn json<T: Serialize>(self, name: &str, value: &T) -> Self {
        let encoded = serde_json::to_string(value).unwrap_or_else(|_| "null".to_string());
        self.text(name, encoded)
    }

    pub fn finish(self) -> Vec<(String, String)> {
        self.fields
    }
}
