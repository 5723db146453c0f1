#![forbid(unsafe_code)]

//! Modifier identities.
//!
//! Built-in modifiers are executed by the engine, which has host access.
//! Custom modifiers are pure functions over [`OffsetData`].

use std::fmt;
use std::rc::Rc;

use crate::data::OffsetData;
use crate::options::PopperOptions;

/// The engine's own modifiers, in their default order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuiltinModifier {
    Shift,
    Offset,
    PreventOverflow,
    KeepTogether,
    Arrow,
    Flip,
    ApplyStyle,
}

impl BuiltinModifier {
    /// Default pipeline order.
    pub const DEFAULT_ORDER: [Self; 7] = [
        Self::Shift,
        Self::Offset,
        Self::PreventOverflow,
        Self::KeepTogether,
        Self::Arrow,
        Self::Flip,
        Self::ApplyStyle,
    ];

    /// Name used in ignore lists and diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Shift => "shift",
            Self::Offset => "offset",
            Self::PreventOverflow => "preventOverflow",
            Self::KeepTogether => "keepTogether",
            Self::Arrow => "arrow",
            Self::Flip => "flip",
            Self::ApplyStyle => "applyStyle",
        }
    }

    /// Look a modifier up by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::DEFAULT_ORDER.into_iter().find(|m| m.name() == name)
    }
}

/// Signature of a user-supplied modifier.
pub type ModifierFn = dyn Fn(OffsetData, &PopperOptions) -> OffsetData;

/// A named user-supplied modifier.
#[derive(Clone)]
pub struct CustomModifier {
    name: String,
    run: Rc<ModifierFn>,
}

impl CustomModifier {
    /// Wrap `run` under `name`.
    pub fn new(
        name: impl Into<String>,
        run: impl Fn(OffsetData, &PopperOptions) -> OffsetData + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            run: Rc::new(run),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply the modifier.
    pub fn apply(&self, data: OffsetData, options: &PopperOptions) -> OffsetData {
        (self.run)(data, options)
    }
}

impl fmt::Debug for CustomModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomModifier")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// One step of the pipeline.
#[derive(Debug, Clone)]
pub enum Modifier {
    Builtin(BuiltinModifier),
    Custom(CustomModifier),
}

impl Modifier {
    /// Shorthand for a custom modifier.
    pub fn custom(
        name: impl Into<String>,
        run: impl Fn(OffsetData, &PopperOptions) -> OffsetData + 'static,
    ) -> Self {
        Self::Custom(CustomModifier::new(name, run))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Builtin(builtin) => builtin.name(),
            Self::Custom(custom) => custom.name(),
        }
    }

    /// The built-in identity, if any.
    #[must_use]
    pub const fn builtin(&self) -> Option<BuiltinModifier> {
        match self {
            Self::Builtin(builtin) => Some(*builtin),
            Self::Custom(_) => None,
        }
    }
}

impl From<BuiltinModifier> for Modifier {
    fn from(builtin: BuiltinModifier) -> Self {
        Self::Builtin(builtin)
    }
}

/// Default modifier list.
#[must_use]
pub fn default_modifiers() -> Vec<Modifier> {
    BuiltinModifier::DEFAULT_ORDER
        .into_iter()
        .map(Modifier::Builtin)
        .collect()
}

/// Whether `requested` appears before `requesting` in `modifiers`.
///
/// A `requesting` modifier that is absent from the list has nothing before it.
#[must_use]
pub fn is_required(
    modifiers: &[Modifier],
    requesting: BuiltinModifier,
    requested: BuiltinModifier,
) -> bool {
    let Some(index) = modifiers
        .iter()
        .position(|m| m.builtin() == Some(requesting))
    else {
        return false;
    };
    modifiers[..index]
        .iter()
        .any(|m| m.builtin() == Some(requested))
}
