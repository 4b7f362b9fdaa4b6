//! Identifier interning.
//!
//! Identifier text is interned once per compilation job so that later
//! phases compare names by handle instead of by string. The front end is
//! single-threaded (one job per instance), so the interner shares its
//! storage through a reference-counted cell rather than a lock.

use lasso::{Rodeo, Spur};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Handle to an interned identifier. Two atoms are equal exactly when
/// the texts they were interned from are equal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Atom(Spur);

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Atom({:?})", self.0)
    }
}

/// The identifier interner shared by every source of a compilation job.
/// Cloning is cheap and every clone talks to the same storage.
#[derive(Clone)]
pub struct Interner {
    names: Rc<RefCell<Rodeo>>,
}

impl Interner {
    pub fn new() -> Self {
        Self {
            names: Rc::new(RefCell::new(Rodeo::new())),
        }
    }

    /// Intern `text`, returning its atom. Equal text yields the same
    /// atom, through any clone of this interner.
    pub fn intern(&self, text: &str) -> Atom {
        Atom(self.names.borrow_mut().get_or_intern(text))
    }

    /// The atom for `text`, if it has been interned before.
    pub fn lookup(&self, text: &str) -> Option<Atom> {
        self.names.borrow().get(text).map(Atom)
    }

    /// The text an atom stands for. Returns an owned copy since the
    /// storage sits behind a runtime borrow that must not escape.
    pub fn text_of(&self, atom: Atom) -> String {
        self.names.borrow().resolve(&atom.0).to_string()
    }

    /// The number of distinct names interned so far.
    pub fn len(&self) -> usize {
        self.names.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interner").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_storage() {
        let interner = Interner::new();
        let clone = interner.clone();
        let a = interner.intern("square");
        let b = clone.intern("square");
        assert_eq!(a, b);
        assert_eq!(interner.len(), 1);
        assert_eq!(clone.text_of(a), "square");
    }

    #[test]
    fn distinct_text_yields_distinct_atoms() {
        let interner = Interner::new();
        let a = interner.intern("left");
        let b = interner.intern("right");
        assert_ne!(a, b);
        assert_eq!(interner.text_of(a), "left");
        assert_eq!(interner.text_of(b), "right");
    }

    #[test]
    fn lookup_does_not_intern() {
        let interner = Interner::new();
        assert!(interner.lookup("later").is_none());
        assert!(interner.is_empty());
        let atom = interner.intern("later");
        assert_eq!(interner.lookup("later"), Some(atom));
        assert_eq!(interner.len(), 1);
    }
}
