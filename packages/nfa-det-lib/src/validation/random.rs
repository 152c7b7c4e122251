use rand::{RngExt, SeedableRng, rngs::StdRng};

use crate::automaton::{Automaton, State, Transition};

pub struct RandomOptions {
    pub seed: u64,
    pub count: usize,
    pub state_count: u32,
    pub transition_count: usize,
    pub alphabet: Vec<char>,
    /// Chance in percent that a generated transition is an epsilon transition.
    pub epsilon_percent: u32,
    /// Chance in percent that a state is final.
    pub final_percent: u32,
    pub max_initials: usize,
}

impl Default for RandomOptions {
    fn default() -> Self {
        RandomOptions {
            seed: 1,
            count: 10,
            state_count: 5,
            transition_count: 10,
            alphabet: vec!['a', 'b'],
            epsilon_percent: 15,
            final_percent: 30,
            max_initials: 2,
        }
    }
}

impl RandomOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_state_count(mut self, state_count: u32) -> Self {
        self.state_count = state_count;
        self
    }

    pub fn with_transition_count(mut self, transition_count: usize) -> Self {
        self.transition_count = transition_count;
        self
    }

    pub fn with_alphabet(mut self, alphabet: Vec<char>) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn with_epsilon_percent(mut self, epsilon_percent: u32) -> Self {
        self.epsilon_percent = epsilon_percent;
        self
    }

    pub fn with_max_initials(mut self, max_initials: usize) -> Self {
        self.max_initials = max_initials;
        self
    }
}

/// Generates `options.count` random automata. The same options always yield
/// the same automata.
pub fn generate_random_automata(options: &RandomOptions) -> Vec<Automaton> {
    assert!(options.state_count > 0, "Need at least one state");
    assert!(!options.alphabet.is_empty(), "Need a non empty alphabet");

    let mut r = StdRng::seed_from_u64(options.seed);

    (0..options.count)
        .map(|i| {
            let mut automaton = Automaton::new(format!("random_{}_{}", options.seed, i));

            let initial_count = r.random_range(1..=options.max_initials.max(1));
            for _ in 0..initial_count {
                automaton.add_initial(r.random_range(0..options.state_count));
            }

            for state in 0..options.state_count {
                if r.random_range(0..100) < options.final_percent {
                    automaton.add_final(state);
                }
            }

            for _ in 0..options.transition_count {
                let start: State = r.random_range(0..options.state_count);
                let end: State = r.random_range(0..options.state_count);

                let transition = if r.random_range(0..100) < options.epsilon_percent {
                    Transition::epsilon(start, end)
                } else {
                    let letter = options.alphabet[r.random_range(0..options.alphabet.len())];
                    Transition::symbol(start, letter, end)
                };

                automaton.add_transition(transition.start, transition.label, transition.end);
            }

            automaton
        })
        .collect()
}

#[test]
fn test_generation_is_reproducible() {
    let options = RandomOptions::default().with_seed(7).with_count(3);

    let first = generate_random_automata(&options);
    let second = generate_random_automata(&options);

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
    assert!(first.iter().all(|a| !a.initials().is_empty()));
}
