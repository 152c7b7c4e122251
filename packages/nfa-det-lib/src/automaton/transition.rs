use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::automaton::{Letter, State};

/// The label of a transition. Epsilon is its own variant, so it can never be
/// confused with a letter of the alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransitionLabel<L: Letter> {
    Symbol(L),
    Epsilon,
}

impl<L: Letter> TransitionLabel<L> {
    pub fn is_epsilon(&self) -> bool {
        matches!(self, TransitionLabel::Epsilon)
    }

    /// Checks whether this label reads the given letter. Epsilon matches
    /// nothing.
    pub fn matches(&self, letter: &L) -> bool {
        match self {
            TransitionLabel::Symbol(s) => s == letter,
            TransitionLabel::Epsilon => false,
        }
    }

    pub fn symbol(&self) -> Option<&L> {
        match self {
            TransitionLabel::Symbol(s) => Some(s),
            TransitionLabel::Epsilon => None,
        }
    }
}

impl<L: Letter> From<Option<L>> for TransitionLabel<L> {
    fn from(value: Option<L>) -> Self {
        match value {
            Some(l) => TransitionLabel::Symbol(l),
            None => TransitionLabel::Epsilon,
        }
    }
}

impl<L: Letter + Display> Display for TransitionLabel<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionLabel::Symbol(s) => write!(f, "{}", s),
            TransitionLabel::Epsilon => write!(f, "ε"),
        }
    }
}

/// A transition `start --label--> end`. Equality and hashing cover the whole
/// triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Transition<L: Letter> {
    pub start: State,
    pub label: TransitionLabel<L>,
    pub end: State,
}

impl<L: Letter> Transition<L> {
    pub fn new(start: State, label: TransitionLabel<L>, end: State) -> Self {
        Transition { start, label, end }
    }

    pub fn symbol(start: State, letter: L, end: State) -> Self {
        Transition::new(start, TransitionLabel::Symbol(letter), end)
    }

    pub fn epsilon(start: State, end: State) -> Self {
        Transition::new(start, TransitionLabel::Epsilon, end)
    }

    pub fn is_epsilon(&self) -> bool {
        self.label.is_epsilon()
    }
}

impl<L: Letter + Display> Display for Transition<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} --{}--> {}", self.start, self.label, self.end)
    }
}

#[test]
fn test_label_matches() {
    let a = TransitionLabel::Symbol('a');
    assert!(a.matches(&'a'));
    assert!(!a.matches(&'b'));
    assert!(!TransitionLabel::<char>::Epsilon.matches(&'a'));
    assert_eq!(TransitionLabel::from(None::<char>), TransitionLabel::Epsilon);
}

#[test]
fn test_transition_display() {
    assert_eq!(Transition::symbol(0, 'a', 1).to_string(), "0 --a--> 1");
    assert_eq!(Transition::<char>::epsilon(2, 3).to_string(), "2 --ε--> 3");
}
