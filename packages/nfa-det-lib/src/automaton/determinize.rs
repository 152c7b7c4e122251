use std::convert::Infallible;

use colored::Colorize;
use hashbrown::HashMap;
use itertools::Itertools;
use thiserror::Error;

use crate::automaton::{Automaton, Letter, State, StateSet};

/// Appended to the name of an automaton to name its deterministic version.
pub const DETERMINISTIC_SUFFIX: &str = " (deterministic)";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeterminizeError {
    #[error("determinizing `{name}` needs more than {limit} macro-states")]
    TooManyMacroStates { name: String, limit: usize },
}

/// The result of a subset construction: the deterministic automaton together
/// with the set of source states that every one of its states stands for.
/// State `i` of the automaton is the macro-state at index `i`.
#[derive(Debug, Clone)]
pub struct Determinization<L: Letter> {
    automaton: Automaton<L>,
    macro_states: Vec<StateSet>,
}

impl<L: Letter> Determinization<L> {
    pub fn automaton(&self) -> &Automaton<L> {
        &self.automaton
    }

    pub fn into_automaton(self) -> Automaton<L> {
        self.automaton
    }

    pub fn macro_states(&self) -> &[StateSet] {
        &self.macro_states
    }

    pub fn macro_state(&self, state: State) -> Option<&StateSet> {
        self.macro_states.get(state as usize)
    }

    /// Finds the state of the deterministic automaton standing for exactly
    /// the given set of source states.
    pub fn index_of(&self, subset: &StateSet) -> Option<State> {
        self.macro_states
            .iter()
            .position(|s| s == subset)
            .map(|i| i as State)
    }

    /// A human readable table of all macro-states.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{} ({} macro-states, {} transitions)\n",
            self.automaton.name().bold(),
            self.macro_states.len(),
            self.automaton.transition_count()
        );

        for (index, subset) in self.macro_states.iter().enumerate() {
            let state = index as State;
            let mut flags = vec![];
            if self.automaton.is_initial(state) {
                flags.push("initial".yellow().to_string());
            }
            if self.automaton.is_final(state) {
                flags.push("final".bright_green().to_string());
            }

            out.push_str(&format!(
                "{} {{{}}} {}\n",
                format!("{:>4}", state).bright_cyan(),
                subset.iter().sorted().join(", "),
                flags.join(" ")
            ));
        }

        out
    }
}

/// Append only storage of macro-states, looked up by their canonical (sorted)
/// form.
#[derive(Debug, Default)]
struct MacroStateArena {
    sets: Vec<StateSet>,
    index: HashMap<Vec<State>, State>,
}

impl MacroStateArena {
    fn key(set: &StateSet) -> Vec<State> {
        set.iter().copied().sorted().collect_vec()
    }

    fn len(&self) -> usize {
        self.sets.len()
    }

    fn get(&self, state: usize) -> &StateSet {
        &self.sets[state]
    }

    fn find(&self, set: &StateSet) -> Option<State> {
        self.index.get(&Self::key(set)).copied()
    }

    fn push(&mut self, set: StateSet) -> State {
        let state = self.sets.len() as State;
        self.index.insert(Self::key(&set), state);
        self.sets.push(set);
        state
    }
}

impl<L: Letter> Automaton<L> {
    /// Determinizes the automaton using the subset construction. The result
    /// accepts the same language and is deterministic.
    ///
    /// If the automaton already is deterministic, it is returned unchanged.
    pub fn determine(&self) -> Automaton<L> {
        if self.skip_determinization() {
            return self.clone();
        }

        match self.construct(|_| Ok::<(), Infallible>(())) {
            Ok(determinization) => determinization.into_automaton(),
            Err(never) => match never {},
        }
    }

    /// Like [Automaton::determine], but gives up once more than `limit`
    /// macro-states would be needed.
    pub fn try_determine(&self, limit: Option<usize>) -> Result<Automaton<L>, DeterminizeError> {
        if self.skip_determinization() {
            return Ok(self.clone());
        }

        Ok(self.subset_construction(limit)?.into_automaton())
    }

    /// Runs the subset construction, even on deterministic automata, and
    /// keeps the macro-states around.
    pub fn subset_construction(
        &self,
        limit: Option<usize>,
    ) -> Result<Determinization<L>, DeterminizeError> {
        self.construct(|count| match limit {
            Some(limit) if count > limit => {
                tracing::warn!(
                    "Aborting determinization of `{}`, more than {} macro-states needed",
                    self.name(),
                    limit
                );
                Err(DeterminizeError::TooManyMacroStates {
                    name: self.name().to_string(),
                    limit,
                })
            }
            _ => Ok(()),
        })
    }

    fn skip_determinization(&self) -> bool {
        let deterministic = self.is_deterministic();
        if deterministic {
            tracing::info!(
                "Automaton `{}` is already deterministic, there is nothing to determinize",
                self.name()
            );
        }
        deterministic
    }

    /// `admit` is called with the new number of macro-states before each one
    /// is created.
    fn construct<E>(
        &self,
        mut admit: impl FnMut(usize) -> Result<(), E>,
    ) -> Result<Determinization<L>, E> {
        let alphabet = self.sorted_alphabet();
        let mut arena = MacroStateArena::default();
        let mut result = Automaton::new(format!("{}{}", self.name(), DETERMINISTIC_SUFFIX));

        let start_set = self.epsilon_accessible(self.initials());
        admit(1)?;
        let start_is_final = self.contains_final(&start_set);
        let start = arena.push(start_set);
        result.add_initial(start);
        if start_is_final {
            result.add_final(start);
        }

        // macro-states are processed in the order they are discovered
        let mut current = 0;
        while current < arena.len() {
            for letter in &alphabet {
                let next = self.epsilon_accessible(&self.accessible(arena.get(current), letter));

                if next.is_empty() {
                    continue;
                }

                let target = match arena.find(&next) {
                    Some(existing) => existing,
                    None => {
                        admit(arena.len() + 1)?;
                        let is_final = self.contains_final(&next);
                        tracing::debug!(
                            "New macro-state {} = {:?} (final: {})",
                            arena.len(),
                            next.iter().sorted().collect_vec(),
                            is_final
                        );
                        let created = arena.push(next);
                        if is_final {
                            result.add_final(created);
                        }
                        created
                    }
                };

                result.add_symbol_transition(current as State, letter.clone(), target);
            }

            current += 1;
        }

        tracing::debug!(
            "Determinized `{}`: {} states became {} macro-states",
            self.name(),
            self.state_count(),
            arena.len()
        );

        Ok(Determinization {
            automaton: result,
            macro_states: arena.sets,
        })
    }
}
