use nfa_det_lib::{
    automaton::DeterminizeError,
    validation::{
        random::{RandomOptions, generate_random_automata},
        same_language::{assert_same_language, same_language},
    },
};

fn options() -> RandomOptions {
    RandomOptions::default().with_count(40)
}

#[test]
fn test_random_determinize_preserves_language() {
    for seed in 0..5 {
        for nfa in generate_random_automata(&options().with_seed(seed)) {
            let dfa = nfa.determine();

            assert!(dfa.is_deterministic(), "{} is not deterministic", dfa.name());
            assert_same_language(&nfa, &dfa, 6);
        }
    }
}

#[test]
fn test_random_determinize_is_idempotent() {
    for nfa in generate_random_automata(&options().with_seed(11).with_alphabet(vec!['a', 'b', 'c']))
    {
        // rebuild without the deterministic short-circuit
        let once = nfa.subset_construction(None).unwrap().into_automaton();
        let twice = once.subset_construction(None).unwrap().into_automaton();

        assert!(twice.is_deterministic());
        assert_eq!(twice.initials(), once.initials());
        assert_eq!(twice.finals(), once.finals());
        assert_eq!(twice.transitions(), once.transitions());
        assert!(same_language(&once, &twice, 5));
    }
}

#[test]
fn test_random_reconstruction_creates_no_new_states() {
    for nfa in generate_random_automata(&options().with_seed(23)) {
        let dfa = nfa.subset_construction(None).unwrap().into_automaton();
        // every state of a subset construction is reachable, so building the
        // subsets again only finds the singletons of the existing states
        let rebuilt = dfa.subset_construction(None).unwrap();

        assert_eq!(rebuilt.macro_states().len(), dfa.state_count());
        assert!(rebuilt.macro_states().iter().all(|s| s.len() == 1));
        assert_same_language(&dfa, rebuilt.automaton(), 5);
    }
}

#[test]
fn test_random_epsilon_heavy() {
    let options = options()
        .with_seed(3)
        .with_epsilon_percent(60)
        .with_state_count(6)
        .with_transition_count(14)
        .with_max_initials(3);

    for nfa in generate_random_automata(&options) {
        let dfa = nfa.determine();

        assert!(dfa.is_deterministic());
        assert!(!dfa.transitions().iter().any(|t| t.is_epsilon()));
        assert_same_language(&nfa, &dfa, 6);
    }
}

#[test]
fn test_random_limit_is_respected() {
    for nfa in generate_random_automata(&options().with_seed(42)) {
        let full = nfa.subset_construction(None).unwrap();
        let needed = full.macro_states().len();

        assert!(nfa.subset_construction(Some(needed)).is_ok());

        let err = nfa.subset_construction(Some(needed - 1)).unwrap_err();
        assert_eq!(
            err,
            DeterminizeError::TooManyMacroStates {
                name: nfa.name().to_string(),
                limit: needed - 1,
            }
        );
    }
}
