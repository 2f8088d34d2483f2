//! Template interpreter
//!
//! Converts one raw template document into a [`FormTemplate`]. Per field,
//! in precedence order:
//!
//! 1. `&name` string values dispatch to a named lookup
//! 2. non-string values under `@` keys are embedded as indented JSON text
//! 3. keys containing `Epoch` are stamped with the current Unix time
//! 4. everything else goes through type classification
//!
//! Finally any text value starting with `#` becomes a disabled constant.
//!
//! Interpretation is synchronous and never fails as a whole: a field that
//! cannot be resolved gets a placeholder value and a [`FieldDiagnostic`].

use crate::directive::{Directive, Lookup, LookupKind, CONSTANT_PREFIX, EMBED_PREFIX};
use crate::error::{FieldDiagnostic, FieldError, LookupError};
use crate::field::{FieldSpec, FormTemplate, ResolvedValue, SelectMode};
use crate::value::{RawTemplate, RawValue, SequenceShape};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// Key substring that requests a live Unix timestamp
pub const EPOCH_MARKER: &str = "Epoch";

/// Key substring that truncates floats to integers
pub const DURATION_MARKER: &str = "duration";

/// Lookup results resolved ahead of interpretation
#[derive(Debug, Clone, Default)]
pub struct ResolvedLookups {
    entries: HashMap<Lookup, Result<Arc<[String]>, LookupError>>,
}

impl ResolvedLookups {
    /// Create empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one lookup
    #[inline]
    pub fn insert(&mut self, lookup: Lookup, result: Result<Arc<[String]>, LookupError>) {
        self.entries.insert(lookup, result);
    }

    /// Builder-style insert of a successful result
    #[must_use]
    pub fn with(mut self, lookup: Lookup, values: &[&str]) -> Self {
        let values: Arc<[String]> = values.iter().map(ToString::to_string).collect();
        self.insert(lookup, Ok(values));
        self
    }

    /// Outcome of a lookup; unresolved lookups are errors
    pub fn get(&self, lookup: Lookup) -> Result<Arc<[String]>, LookupError> {
        self.entries
            .get(&lookup)
            .cloned()
            .unwrap_or_else(|| Err(LookupError::unresolved(lookup)))
    }

    /// Number of recorded lookups
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no lookup was recorded
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-field result before assembly
struct FieldOutcome {
    spec: FieldSpec,
    lookup_driven: bool,
    error: Option<FieldError>,
}

impl FieldOutcome {
    fn resolved(spec: FieldSpec) -> Self {
        Self {
            spec,
            lookup_driven: false,
            error: None,
        }
    }

    fn degraded(placeholder: String, error: FieldError) -> Self {
        Self {
            spec: FieldSpec::editable(ResolvedValue::Text(placeholder)),
            lookup_driven: false,
            error: Some(error),
        }
    }
}

/// Template interpreter bound to a lookup table and a point in time
#[derive(Debug, Clone)]
pub struct Interpreter<'a> {
    lookups: &'a ResolvedLookups,
    now: i64,
}

impl<'a> Interpreter<'a> {
    /// Create interpreter
    #[inline]
    #[must_use]
    pub fn new(lookups: &'a ResolvedLookups, now: DateTime<Utc>) -> Self {
        Self {
            lookups,
            now: now.timestamp(),
        }
    }

    /// Interpret a raw template document
    pub fn interpret(&self, name: impl Into<String>, raw: &RawTemplate) -> FormTemplate {
        let mut template = FormTemplate::new(name);

        for (key, value) in raw {
            let outcome = self.interpret_field(key, value);

            if outcome.lookup_driven {
                template.select_mode = SelectMode::LookupDriven;
            }
            if let Some(error) = outcome.error {
                tracing::warn!(
                    template = %template.name,
                    field = %key,
                    error = %error,
                    "field degraded to placeholder"
                );
                template.diagnostics.push(FieldDiagnostic {
                    field: key.clone(),
                    error,
                });
            }
            template.fields.insert(key.clone(), apply_constant(outcome.spec));
        }

        tracing::debug!(
            template = %template.name,
            fields = template.fields.len(),
            select_mode = %template.select_mode,
            "template interpreted"
        );
        template
    }

    fn interpret_field(&self, key: &str, value: &RawValue) -> FieldOutcome {
        match value {
            RawValue::String(text) => {
                if let Some(directive) = Directive::parse(text) {
                    return self.dispatch(directive);
                }
                if is_epoch_key(key) && !text.starts_with(CONSTANT_PREFIX) {
                    return FieldOutcome::resolved(self.timestamp());
                }
                FieldOutcome::resolved(FieldSpec::editable(ResolvedValue::Text(text.clone())))
            }
            _ if key.starts_with(EMBED_PREFIX) => embed_json(value),
            _ if is_epoch_key(key) => FieldOutcome::resolved(self.timestamp()),
            _ => FieldOutcome::resolved(classify(key, value)),
        }
    }

    fn dispatch(&self, directive: Directive) -> FieldOutcome {
        let lookup = match directive {
            Directive::Lookup(lookup) => lookup,
            Directive::Unknown(name) => {
                return FieldOutcome::degraded(
                    format!("Unknown function: {name}"),
                    FieldError::UnknownDirective(name),
                );
            }
        };

        let kind = lookup.kind();
        let mut outcome = match self.lookups.get(lookup) {
            Ok(values) => {
                let values = values.to_vec();
                let spec = match kind {
                    LookupKind::Enumeration => {
                        FieldSpec::selectable(ResolvedValue::Texts(values.clone()), values)
                    }
                    LookupKind::Identifier => FieldSpec::editable(ResolvedValue::Texts(values)),
                };
                FieldOutcome::resolved(spec)
            }
            Err(error) => FieldOutcome::degraded(
                format!("Error retrieving {}", lookup.label()),
                FieldError::LookupFailure(error),
            ),
        };
        outcome.lookup_driven = kind == LookupKind::Enumeration;
        outcome
    }

    fn timestamp(&self) -> FieldSpec {
        FieldSpec::editable(ResolvedValue::Integer(self.now))
    }
}

/// Interpret a raw template against pre-resolved lookups at time `now`
pub fn interpret(
    name: impl Into<String>,
    raw: &RawTemplate,
    lookups: &ResolvedLookups,
    now: DateTime<Utc>,
) -> FormTemplate {
    Interpreter::new(lookups, now).interpret(name, raw)
}

fn is_epoch_key(key: &str) -> bool {
    key.contains(EPOCH_MARKER)
}

fn truncates_floats(key: &str) -> bool {
    key.contains(EPOCH_MARKER) || key.contains(DURATION_MARKER)
}

#[allow(clippy::cast_possible_truncation)]
fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

fn embed_json(value: &RawValue) -> FieldOutcome {
    match serde_json::to_string_pretty(value) {
        Ok(text) => FieldOutcome::resolved(FieldSpec::editable(ResolvedValue::Text(text))),
        Err(e) => FieldOutcome::degraded(format!("Error: {e}"), FieldError::serialization(e.to_string())),
    }
}

fn apply_constant(spec: FieldSpec) -> FieldSpec {
    match spec.value.as_text().and_then(|t| t.strip_prefix(CONSTANT_PREFIX)) {
        Some(constant) => FieldSpec::constant(constant),
        None => spec,
    }
}

/// Type classification of a non-directive value
fn classify(key: &str, value: &RawValue) -> FieldSpec {
    match value {
        RawValue::Integer(i) => FieldSpec::editable(ResolvedValue::Integer(*i)),
        RawValue::Bool(b) => FieldSpec::editable(ResolvedValue::Boolean(*b)),
        RawValue::Float(f) if truncates_floats(key) => {
            FieldSpec::editable(ResolvedValue::Integer(truncate(*f)))
        }
        RawValue::Float(f) => FieldSpec::editable(ResolvedValue::Text(format!("{f:.6}"))),
        RawValue::String(s) => FieldSpec::editable(ResolvedValue::Text(s.clone())),
        RawValue::Sequence(items) => classify_sequence(key, items),
        RawValue::Null | RawValue::Mapping(_) => {
            FieldSpec::editable(ResolvedValue::Text(value.render()))
        }
    }
}

fn classify_sequence(key: &str, items: &[RawValue]) -> FieldSpec {
    match RawValue::classify_sequence(items) {
        SequenceShape::Strings(values) => {
            FieldSpec::selectable(ResolvedValue::Texts(values.clone()), values)
        }
        SequenceShape::Integers(values) => {
            let options = values.iter().map(ToString::to_string).collect();
            FieldSpec::selectable(ResolvedValue::Integers(values), options)
        }
        SequenceShape::Floats(values) if truncates_floats(key) => {
            let values: Vec<i64> = values.into_iter().map(truncate).collect();
            let options = values.iter().map(ToString::to_string).collect();
            FieldSpec::selectable(ResolvedValue::Integers(values), options)
        }
        SequenceShape::Floats(values) => {
            let options = values.iter().map(ToString::to_string).collect();
            FieldSpec::selectable(ResolvedValue::Floats(values), options)
        }
        SequenceShape::Mixed => {
            let options = items.iter().map(RawValue::render).collect();
            FieldSpec::selectable(ResolvedValue::empty(), options)
        }
    }
}
