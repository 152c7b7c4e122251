use itertools::Itertools;

use crate::automaton::{Automaton, Letter};

/// Simulates the automaton on `word`: starting in the epsilon closure of the
/// initial states, each letter is read with [Automaton::accessible] followed
/// by an epsilon closure. The word is accepted if a final state is reached.
pub fn accepts<L: Letter>(automaton: &Automaton<L>, word: &[L]) -> bool {
    let mut current = automaton.epsilon_accessible(automaton.initials());

    for letter in word {
        if current.is_empty() {
            return false;
        }
        current = automaton.epsilon_accessible(&automaton.accessible(&current, letter));
    }

    automaton.contains_final(&current)
}

/// All words over `alphabet` of exactly `length` letters.
fn words_of_length<L: Letter>(alphabet: &[L], length: usize) -> Vec<Vec<L>> {
    if length == 0 {
        return vec![vec![]];
    }

    std::iter::repeat_n(alphabet.iter(), length)
        .multi_cartesian_product()
        .map(|word| word.into_iter().cloned().collect_vec())
        .collect_vec()
}

fn union_alphabet<L: Letter>(a: &Automaton<L>, b: &Automaton<L>) -> Vec<L> {
    a.get_alphabet()
        .union(&b.get_alphabet())
        .cloned()
        .sorted()
        .collect_vec()
}

/// Finds the shortest word up to `max_word_length` letters on which the two
/// automata disagree. Words range over the union of both alphabets.
pub fn find_counterexample<L: Letter>(
    a: &Automaton<L>,
    b: &Automaton<L>,
    max_word_length: usize,
) -> Option<Vec<L>> {
    let alphabet = union_alphabet(a, b);

    (0..=max_word_length)
        .flat_map(|length| words_of_length(&alphabet, length))
        .find(|word| accepts(a, word) != accepts(b, word))
}

/// Checks if two automata accept the same words up to a certain length.
pub fn same_language<L: Letter>(a: &Automaton<L>, b: &Automaton<L>, max_word_length: usize) -> bool {
    find_counterexample(a, b, max_word_length).is_none()
}

pub fn assert_same_language<L: Letter>(
    a: &Automaton<L>,
    b: &Automaton<L>,
    max_word_length: usize,
) {
    if let Some(word) = find_counterexample(a, b, max_word_length) {
        if accepts(a, &word) {
            panic!(
                "{:?} is accepted by automaton `{}` but not by automaton `{}`. Thus their languages are not equal.",
                word,
                a.name(),
                b.name()
            );
        } else {
            panic!(
                "{:?} is accepted by automaton `{}` but not by automaton `{}`. Thus their languages are not equal.",
                word,
                b.name(),
                a.name()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Transition;

    #[test]
    fn test_accepts() {
        let mut nfa = Automaton::new("a*b")
            .with_initials([0])
            .with_finals([1])
            .with_transitions([Transition::symbol(0, 'a', 0), Transition::symbol(0, 'b', 1)]);

        assert!(accepts(&nfa, &['b']));
        assert!(accepts(&nfa, &['a', 'a', 'b']));
        assert!(!accepts(&nfa, &[]));
        assert!(!accepts(&nfa, &['b', 'a']));

        nfa.add_epsilon_transition(0, 1);
        assert!(accepts(&nfa, &[]));
        assert!(accepts(&nfa, &['a']));
    }

    #[test]
    fn test_words_of_length() {
        assert_eq!(words_of_length(&['a', 'b'], 0), vec![Vec::<char>::new()]);
        assert_eq!(words_of_length(&['a', 'b'], 2).len(), 4);
        assert!(words_of_length::<char>(&[], 1).is_empty());
    }

    #[test]
    fn test_counterexample() {
        let a = Automaton::new("a")
            .with_initials([0])
            .with_finals([1])
            .with_transitions([Transition::symbol(0, 'a', 1)]);
        let aa = Automaton::new("aa")
            .with_initials([0])
            .with_finals([2])
            .with_transitions([Transition::symbol(0, 'a', 1), Transition::symbol(1, 'a', 2)]);

        assert_eq!(find_counterexample(&a, &aa, 3), Some(vec!['a']));
        assert!(!same_language(&a, &aa, 3));
        assert!(same_language(&a, &a.clone(), 3));
    }

    #[test]
    #[should_panic(expected = "is accepted by automaton `a`")]
    fn test_assert_same_language_panics() {
        let a = Automaton::new("a")
            .with_initials([0])
            .with_finals([1])
            .with_transitions([Transition::symbol(0, 'a', 1)]);
        let b = Automaton::new("b")
            .with_initials([0])
            .with_finals([1])
            .with_transitions([Transition::symbol(0, 'b', 1)]);

        assert_same_language(&a, &b, 2);
    }
}
