//! Process-wide code relation.
//!
//! Library code should take a [`CodeRelation`] explicitly and call
//! [`CodeError::matches`](crate::CodeError::matches). This registry exists
//! for application entry points that register their code hierarchy once at
//! startup and rely on [`BaseError::is`](crate::BaseError::is).

use once_cell::sync::Lazy;

use crate::CodeRelation;

static DEFAULT_RELATION: Lazy<CodeRelation> = Lazy::new(CodeRelation::new);

/// The process-wide relation consulted by `CodeError::is`.
#[must_use]
pub fn default_relation() -> &'static CodeRelation {
    &DEFAULT_RELATION
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BaseError, CodeError};

    #[test]
    fn test_default_relation_drives_is() {
        default_relation().add(&[8800, 8801, 8802]).unwrap();
        let parent = CodeError::new(8800, "parent");
        let grandchild = CodeError::new(8802, "grandchild").wrap();
        assert!(parent.is(&grandchild));
        assert!(!CodeError::new(8802, "grandchild").is(&parent));
    }
}
