//! Declared parameter shapes, checked by the driver at the instant of a call.

use std::fmt;

use crate::backend::errors::{RuntimeError, RuntimeResult};
use crate::backend::models::Kwargs;

/// Accepted number of positional arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    Range(usize, usize),
}

impl Arity {
    pub fn accepts(&self, n: usize) -> bool {
        match *self {
            Arity::Exact(k) => n == k,
            Arity::AtLeast(k) => n >= k,
            Arity::Range(lo, hi) => lo <= n && n <= hi,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(k) => write!(f, "exactly {}", k),
            Arity::AtLeast(k) => write!(f, "at least {}", k),
            Arity::Range(lo, hi) => write!(f, "from {} to {}", lo, hi),
        }
    }
}

/// Positional arity plus the keyword names a callable understands.
///
/// The continuation keyword is not listed here; whether a callable takes part
/// in the convention is a property of the callable itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    arity: Arity,
    keywords: Vec<String>,
    open_keywords: bool,
}

impl Signature {
    pub fn exact(n: usize) -> Self {
        Self::new(Arity::Exact(n))
    }

    pub fn at_least(n: usize) -> Self {
        Self::new(Arity::AtLeast(n))
    }

    pub fn range(lo: usize, hi: usize) -> Self {
        Self::new(Arity::Range(lo, hi))
    }

    /// Any number of positionals, no keywords
    pub fn variadic() -> Self {
        Self::at_least(0)
    }

    fn new(arity: Arity) -> Self {
        Signature {
            arity,
            keywords: Vec::new(),
            open_keywords: false,
        }
    }

    pub fn with_keyword(mut self, name: impl Into<String>) -> Self {
        self.keywords.push(name.into());
        self
    }

    /// Accept keywords of any name (`**kwargs`)
    pub fn with_any_keywords(mut self) -> Self {
        self.open_keywords = true;
        self
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn check(&self, target: &str, positional: usize, kwargs: &Kwargs) -> RuntimeResult<()> {
        if !self.arity.accepts(positional) {
            return Err(RuntimeError::ArityMismatch {
                target: target.to_string(),
                expected: self.arity,
                received: positional,
            });
        }
        if !self.open_keywords {
            if let Some(unknown) = kwargs.names().find(|n| !self.keywords.iter().any(|k| k == n)) {
                return Err(RuntimeError::UnexpectedKeyword {
                    target: target.to_string(),
                    keyword: unknown.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_accepts() {
        assert!(Arity::Exact(2).accepts(2));
        assert!(!Arity::Exact(2).accepts(1));
        assert!(Arity::AtLeast(1).accepts(9));
        assert!(!Arity::AtLeast(1).accepts(0));
        assert!(Arity::Range(1, 3).accepts(3));
        assert!(!Arity::Range(1, 3).accepts(4));
    }

    #[test]
    fn test_check_rejects_wrong_count() {
        let sig = Signature::exact(2);
        let err = sig.check("fact", 1, &Kwargs::new()).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::ArityMismatch { expected: Arity::Exact(2), received: 1, .. }
        ));
    }

    #[test]
    fn test_check_keywords() {
        let sig = Signature::exact(1).with_keyword("acc");
        assert!(sig.check("fact", 1, &Kwargs::new().with("acc", 1i64)).is_ok());
        let err = sig
            .check("fact", 1, &Kwargs::new().with("total", 1i64))
            .unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::UnexpectedKeyword { ref keyword, .. } if keyword == "total"
        ));

        let open = Signature::variadic().with_any_keywords();
        assert!(open.check("bar", 0, &Kwargs::new().with("c", 0i64)).is_ok());
    }
}
