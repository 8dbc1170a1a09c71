//! Activation functions for the trunk and branch transforms.

use crate::error::{OperatorError, OperatorResult};

/// Closed set of element-wise activations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    Identity,
    Cosine,
    Tanh,
}

impl Activation {
    /// Parse a tag from a model file. Matching ignores case and surrounding whitespace.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "identity" | "linear" => Some(Self::Identity),
            "cos" | "cosine" => Some(Self::Cosine),
            "tanh" => Some(Self::Tanh),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Cosine => "cos",
            Self::Tanh => "tanh",
        }
    }

    #[inline]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Self::Identity => x,
            Self::Cosine => x.cos(),
            Self::Tanh => x.tanh(),
        }
    }

    /// Trunk features are random tanh features; nothing else is accepted.
    pub fn check_trunk(self) -> OperatorResult<Self> {
        match self {
            Self::Tanh => Ok(self),
            other => Err(unsupported("trunk", other.tag())),
        }
    }

    pub fn check_branch(self) -> OperatorResult<Self> {
        match self {
            Self::Identity | Self::Cosine => Ok(self),
            other => Err(unsupported("branch", other.tag())),
        }
    }
}

/// Resolve a trunk tag, rejecting unknown and unsupported activations.
pub fn resolve_trunk(tag: &str) -> OperatorResult<Activation> {
    Activation::from_tag(tag)
        .ok_or_else(|| unsupported("trunk", tag))?
        .check_trunk()
}

/// Resolve a branch tag, rejecting unknown and unsupported activations.
pub fn resolve_branch(tag: &str) -> OperatorResult<Activation> {
    Activation::from_tag(tag)
        .ok_or_else(|| unsupported("branch", tag))?
        .check_branch()
}

fn unsupported(role: &'static str, tag: &str) -> OperatorError {
    OperatorError::UnsupportedConfiguration {
        role,
        tag: tag.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_parse_with_aliases() {
        assert_eq!(Activation::from_tag("tanh"), Some(Activation::Tanh));
        assert_eq!(Activation::from_tag(" Cos "), Some(Activation::Cosine));
        assert_eq!(Activation::from_tag("cosine"), Some(Activation::Cosine));
        assert_eq!(Activation::from_tag("linear"), Some(Activation::Identity));
        assert_eq!(Activation::from_tag("relu"), None);
    }

    #[test]
    fn trunk_only_accepts_tanh() {
        assert_eq!(resolve_trunk("tanh").unwrap(), Activation::Tanh);
        let err = resolve_trunk("cos").unwrap_err();
        assert!(matches!(
            err,
            OperatorError::UnsupportedConfiguration { role: "trunk", .. }
        ));
        assert!(resolve_trunk("sigmoid").is_err());
    }

    #[test]
    fn branch_accepts_identity_and_cosine() {
        assert_eq!(resolve_branch("identity").unwrap(), Activation::Identity);
        assert_eq!(resolve_branch("cos").unwrap(), Activation::Cosine);
        let err = resolve_branch("tanh").unwrap_err();
        assert!(err.to_string().contains("branch activation 'tanh'"));
    }

    #[test]
    fn apply_matches_std() {
        let x = 0.3;
        assert_eq!(Activation::Identity.apply(x), x);
        assert_eq!(Activation::Cosine.apply(x), x.cos());
        assert_eq!(Activation::Tanh.apply(x), x.tanh());
    }
}
