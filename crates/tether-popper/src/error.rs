#![forbid(unsafe_code)]

//! Configuration errors and non-fatal warnings raised by the engine.

use std::fmt;

use crate::modifier::BuiltinModifier;

/// Fatal configuration errors; construction is aborted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopperError {
    /// No reference element, or the handle is not live.
    MissingReference,
    /// The popper element handle is not live.
    MissingPopper,
    /// The declarative parent resolved to no element.
    ParentNotFound { selector: String },
    /// A placement string could not be parsed.
    InvalidPlacement(String),
}

impl fmt::Display for PopperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingReference => write!(f, "reference element is missing"),
            Self::MissingPopper => write!(f, "popper element is missing"),
            Self::ParentNotFound { selector } if selector.is_empty() => {
                write!(f, "popper parent list is empty")
            }
            Self::ParentNotFound { selector } => {
                write!(f, "no element matches popper parent selector `{selector}`")
            }
            Self::InvalidPlacement(s) => write!(f, "invalid placement `{s}`"),
        }
    }
}

impl std::error::Error for PopperError {}

/// Non-fatal problems; the engine keeps going with a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopperWarning {
    /// A parent selector matched several elements; the first was used.
    ParentSelectorAmbiguous { selector: String, matches: usize },
    /// A parent list held several elements; the first was used.
    ParentListAmbiguous { len: usize },
    /// The arrow element is not a descendant of the popper.
    ArrowOutsidePopper,
    /// A modifier ran without the modifier it depends on running first.
    MissingDependency {
        modifier: BuiltinModifier,
        requires: BuiltinModifier,
    },
}

impl fmt::Display for PopperWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParentSelectorAmbiguous { selector, matches } => write!(
                f,
                "parent selector `{selector}` matched {matches} elements, using the first"
            ),
            Self::ParentListAmbiguous { len } => {
                write!(f, "parent list has {len} elements, using the first")
            }
            Self::ArrowOutsidePopper => write!(f, "arrow element must be a child of its popper"),
            Self::MissingDependency { modifier, requires } => write!(
                f,
                "`{}` modifier requires `{}` to run before it",
                modifier.name(),
                requires.name()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            PopperError::ParentNotFound {
                selector: ".menu".into()
            }
            .to_string(),
            "no element matches popper parent selector `.menu`"
        );
        assert_eq!(
            PopperWarning::MissingDependency {
                modifier: BuiltinModifier::Flip,
                requires: BuiltinModifier::PreventOverflow,
            }
            .to_string(),
            "`flip` modifier requires `preventOverflow` to run before it"
        );
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&PopperError::MissingReference);
    }
}
