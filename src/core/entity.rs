use crate::core::error::GraphError;
use crate::core::value::{AttributeSource, Attrs};

/// A graph entity that can be built from named attributes.
pub trait Entity: AttributeSource + Sized {
    type Id: Copy;

    /// Attributes copied from a template when no explicit list is given.
    const ATTRS: &'static [&'static str];

    /// Construct from named attributes. Unknown names and wrongly typed values fail.
    fn from_attrs(id: Option<Self::Id>, attrs: Attrs) -> Result<Self, GraphError>;

    /// Build a new instance, copying attributes from `template`.
    ///
    /// For every name in `allowed` (or `ATTRS` when `allowed` is `None` or empty)
    /// a non-null template value replaces whatever `overrides` holds for that name.
    /// Overrides only survive where the template is null. `template` is never modified.
    fn create<T>(
        template: Option<&T>,
        allowed: Option<&[&str]>,
        id: Option<Self::Id>,
        mut overrides: Attrs,
    ) -> Result<Self, GraphError>
    where
        T: AttributeSource + ?Sized,
    {
        let allowed = match allowed {
            Some(names) if !names.is_empty() => names,
            _ => Self::ATTRS,
        };

        if let Some(template) = template {
            for &name in allowed {
                if let Some(value) = template.attr(name) {
                    overrides.insert(name.to_string(), value);
                }
            }
        }

        Self::from_attrs(id, overrides)
    }
}
