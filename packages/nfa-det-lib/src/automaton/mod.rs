use std::{fmt::Debug, fmt::Display, hash::Hash, path::Path};

use anyhow::Context;
use hashbrown::{HashMap, HashSet};
use itertools::Itertools;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

pub mod determinize;
pub mod transition;

pub use determinize::{Determinization, DeterminizeError};
pub use transition::{Transition, TransitionLabel};

/// A state is identified by its position only, it carries no data.
pub type State = u32;

/// An unordered, duplicate free set of states.
pub type StateSet = HashSet<State>;

/// Types that can be used as letters along the transitions of an automaton.
pub trait Letter: Debug + Clone + PartialEq + Eq + Hash + Ord {}

impl<T: Debug + Clone + PartialEq + Eq + Hash + Ord> Letter for T {}

/// A finite automaton, possibly nondeterministic and with epsilon transitions.
///
/// There is no explicit set of states. The states of an automaton are the ones
/// mentioned by its initials, finals or transitions, see
/// [Automaton::get_states].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Automaton<L: Letter = char> {
    name: String,
    initials: StateSet,
    finals: StateSet,
    transitions: HashSet<Transition<L>>,
}

impl<L: Letter> Automaton<L> {
    pub fn new(name: impl Into<String>) -> Self {
        Automaton {
            name: name.into(),
            initials: StateSet::new(),
            finals: StateSet::new(),
            transitions: HashSet::new(),
        }
    }

    pub fn with_initials(mut self, initials: impl IntoIterator<Item = State>) -> Self {
        self.initials.extend(initials);
        self
    }

    pub fn with_finals(mut self, finals: impl IntoIterator<Item = State>) -> Self {
        self.finals.extend(finals);
        self
    }

    pub fn with_transitions(mut self, transitions: impl IntoIterator<Item = Transition<L>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    pub fn add_initial(&mut self, state: State) -> bool {
        self.initials.insert(state)
    }

    pub fn add_final(&mut self, state: State) -> bool {
        self.finals.insert(state)
    }

    /// Adds a transition. Returns false if the exact same transition was
    /// already present.
    pub fn add_transition(&mut self, start: State, label: TransitionLabel<L>, end: State) -> bool {
        self.transitions.insert(Transition::new(start, label, end))
    }

    pub fn add_symbol_transition(&mut self, start: State, letter: L, end: State) -> bool {
        self.add_transition(start, TransitionLabel::Symbol(letter), end)
    }

    pub fn add_epsilon_transition(&mut self, start: State, end: State) -> bool {
        self.add_transition(start, TransitionLabel::Epsilon, end)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn initials(&self) -> &StateSet {
        &self.initials
    }

    pub fn finals(&self) -> &StateSet {
        &self.finals
    }

    pub fn transitions(&self) -> &HashSet<Transition<L>> {
        &self.transitions
    }

    pub fn is_initial(&self, state: State) -> bool {
        self.initials.contains(&state)
    }

    pub fn is_final(&self, state: State) -> bool {
        self.finals.contains(&state)
    }

    /// Checks if a set of states contains a final state.
    pub fn contains_final(&self, states: &StateSet) -> bool {
        states.iter().any(|s| self.finals.contains(s))
    }

    /// An automaton is deterministic iff it has exactly one initial state, no
    /// epsilon transitions and no two transitions with the same start and
    /// letter but different ends.
    pub fn is_deterministic(&self) -> bool {
        if self.initials.len() != 1 {
            return false;
        }

        let mut targets: HashMap<(State, &L), State> = HashMap::new();

        for transition in &self.transitions {
            let TransitionLabel::Symbol(letter) = &transition.label else {
                return false;
            };

            // the transition set holds no duplicates, so an equal end means
            // this is the transition that was inserted
            if *targets
                .entry((transition.start, letter))
                .or_insert(transition.end)
                != transition.end
            {
                return false;
            }
        }

        true
    }

    /// Calculates the epsilon closure of a set of states, i.e. `from` plus
    /// every state reachable from it using only epsilon transitions.
    pub fn epsilon_accessible(&self, from: &StateSet) -> StateSet {
        let mut result = from.clone();
        let mut stack = from.iter().copied().collect_vec();

        while let Some(state) = stack.pop() {
            for transition in &self.transitions {
                if transition.start == state
                    && transition.is_epsilon()
                    && result.insert(transition.end)
                {
                    stack.push(transition.end);
                }
            }
        }

        result
    }

    /// Returns the end states of all transitions that start in `from` and read
    /// `letter`. Epsilon transitions are not followed, neither before nor
    /// after reading the letter.
    pub fn accessible(&self, from: &StateSet, letter: &L) -> StateSet {
        self.transitions
            .iter()
            .filter(|t| from.contains(&t.start) && t.label.matches(letter))
            .map(|t| t.end)
            .collect()
    }

    /// The set of letters that label at least one transition.
    pub fn get_alphabet(&self) -> HashSet<L> {
        self.transitions
            .iter()
            .filter_map(|t| t.label.symbol())
            .cloned()
            .collect()
    }

    /// The alphabet in ascending order.
    pub fn sorted_alphabet(&self) -> Vec<L> {
        self.get_alphabet().into_iter().sorted().collect()
    }

    /// All states mentioned by the initials, the finals or any transition.
    pub fn get_states(&self) -> StateSet {
        let mut states: StateSet = self.initials.union(&self.finals).copied().collect();

        for transition in &self.transitions {
            states.insert(transition.start);
            states.insert(transition.end);
        }

        states
    }

    pub fn state_count(&self) -> usize {
        self.get_states().len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }
}

impl<L: Letter + Serialize> Automaton<L> {
    pub fn to_json(&self, pretty: bool) -> anyhow::Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

impl<L: Letter + DeserializeOwned> Automaton<L> {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read automaton file {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("invalid automaton file {}", path.display()))
    }
}

/// Escapes text for use inside a double quoted DOT string.
fn escape_dot(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

impl<L: Letter + Display> Automaton<L> {
    pub fn to_graphviz(&self) -> String {
        let mut dot = String::new();
        dot.push_str("digraph finite_state_machine {\n");
        dot.push_str("fontname=\"Helvetica,Arial,sans-serif\"\n");
        dot.push_str("node [fontname=\"Helvetica,Arial,sans-serif\"]\n");
        dot.push_str("edge [fontname=\"Helvetica,Arial,sans-serif\"]\n");
        dot.push_str(&format!("label=\"{}\";\n", escape_dot(&self.name)));
        dot.push_str("rankdir=LR;\n");
        dot.push_str("node [shape=point,label=\"\"]START\n");

        if !self.finals.is_empty() {
            dot.push_str(&format!(
                "node [shape = doublecircle]; {};\n",
                self.finals.iter().sorted().join(" ")
            ));
        }
        dot.push_str("node [shape = circle];\n");

        for initial in self.initials.iter().sorted() {
            dot.push_str(&format!("START -> {};\n", initial));
        }

        for transition in self.transitions.iter().sorted() {
            dot.push_str(&format!(
                "{} -> {} [ label = \"{}\" ];\n",
                transition.start,
                transition.end,
                escape_dot(&transition.label.to_string())
            ));
        }

        dot.push('}');
        dot
    }
}
