//! Field expansion.
//!
//! Definitions resolve strictly in the order written. Each expression sees the
//! base container plus the definitions above it, never the ones below: a
//! reference to a later field gets whatever the base holds for that name, or
//! empty text when the base has nothing.

use crate::expander::{ExpandError, TemplateExpander};
use crate::manifest::{FieldList, FieldSource};
use crate::value::{FieldValue, ValueContainer};

/// Failure to resolve one field.
#[derive(Debug, thiserror::Error)]
#[error("failed to expand field '{field}': {source}")]
pub struct FieldError {
    pub field: String,
    pub source: ExpandError,
}

/// Resolve `fields` on top of `base`, returning a new container.
///
/// The result holds every entry of `base` plus one entry per definition;
/// `base` itself is left untouched.
pub fn expand_fields(
    expander: &TemplateExpander<'_>,
    fields: &FieldList,
    base: &ValueContainer,
) -> Result<ValueContainer, FieldError> {
    let mut accumulated = base.clone();

    for definition in fields.iter() {
        let value = match &definition.source {
            FieldSource::Literal(value) => value.clone(),
            FieldSource::Expression(expression) => {
                let rendered = expander
                    .render_str(&definition.name, expression, &accumulated)
                    .map_err(|e| FieldError {
                        field: definition.name.clone(),
                        source: e,
                    })?;
                FieldValue::Scalar(rendered)
            }
        };
        tracing::trace!(field = %definition.name, ?value, "expanded field");
        accumulated.insert(definition.name.clone(), value);
    }

    Ok(accumulated)
}
