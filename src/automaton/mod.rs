//! The automaton model.
//!
//! An [`Automaton`] is an arena of states and transitions addressed by stable
//! indices. Deleting an element only tombstones it (and unlinks transitions
//! from their endpoints), so indices held by an algorithm mid-traversal stay
//! valid. Every id carries the tag of the automaton that issued it, which is
//! how foreign states are detected.

mod condition;

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use log::debug;

pub use condition::Condition;

use crate::error::{Element, Error, Result};

static NEXT_TAG: AtomicU32 = AtomicU32::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId {
    owner: u32,
    index: u32,
}

impl StateId {
    /// Dense index, unique within the owning automaton.
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId {
    owner: u32,
    index: u32,
}

impl TransitionId {
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.index)
    }
}

#[derive(Debug)]
pub struct State {
    id: StateId,
    accepting: bool,
    deleted: bool,
    incoming: Vec<TransitionId>,
    outgoing: Vec<TransitionId>,
}

impl State {
    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn incoming(&self) -> &[TransitionId] {
        &self.incoming
    }

    pub fn outgoing(&self) -> &[TransitionId] {
        &self.outgoing
    }
}

#[derive(Debug)]
pub struct Transition {
    id: TransitionId,
    from: StateId,
    to: StateId,
    condition: Condition,
    deleted: bool,
}

impl Transition {
    pub fn id(&self) -> TransitionId {
        self.id
    }

    pub fn from(&self) -> StateId {
        self.from
    }

    pub fn to(&self) -> StateId {
        self.to
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Duplicate suppression key: same endpoints and equal conditions.
    pub fn same_edge(&self, other: &Transition) -> bool {
        self.from.index == other.from.index
            && self.to.index == other.to.index
            && self.condition == other.condition
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.deleted { "X" } else { "" };
        write!(f, "{mark}{}[{} --{}--> {}]", self.id, self.from, self.condition, self.to)
    }
}

#[derive(Debug)]
pub struct Automaton {
    tag: u32,
    states: Vec<State>,
    transitions: Vec<Transition>,
    initial: Option<StateId>,
}

impl Default for Automaton {
    fn default() -> Self {
        Self::new()
    }
}

impl Automaton {
    pub fn new() -> Self {
        Self {
            tag: NEXT_TAG.fetch_add(1, Ordering::Relaxed),
            states: Vec::new(),
            transitions: Vec::new(),
            initial: None,
        }
    }

    pub fn add_state(&mut self) -> StateId {
        let id = StateId {
            owner: self.tag,
            index: self.states.len() as u32,
        };
        self.states.push(State {
            id,
            accepting: false,
            deleted: false,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        });
        id
    }

    pub fn set_accepting(&mut self, id: StateId) -> Result<()> {
        self.live_state(id)?;
        self.states[id.index()].accepting = true;
        Ok(())
    }

    pub fn set_initial(&mut self, id: StateId) -> Result<()> {
        self.live_state(id)?;
        self.initial = Some(id);
        Ok(())
    }

    pub fn initial(&self) -> Option<StateId> {
        self.initial
    }

    pub(crate) fn require_initial(&self) -> Result<StateId> {
        self.initial.ok_or(Error::MissingInitialState)
    }

    pub fn add_transition(
        &mut self,
        from: StateId,
        to: StateId,
        condition: Condition,
    ) -> Result<TransitionId> {
        self.live_state(from)?;
        self.live_state(to)?;

        let id = TransitionId {
            owner: self.tag,
            index: self.transitions.len() as u32,
        };
        self.transitions.push(Transition {
            id,
            from,
            to,
            condition,
            deleted: false,
        });
        self.states[from.index()].outgoing.push(id);
        self.states[to.index()].incoming.push(id);
        Ok(id)
    }

    /// Like [`Automaton::add_transition`], but returns the existing transition
    /// when an equal edge is already present.
    pub fn add_transition_dedup(
        &mut self,
        from: StateId,
        to: StateId,
        condition: Condition,
    ) -> Result<TransitionId> {
        self.live_state(from)?;
        let existing = self
            .outgoing(from)
            .find(|t| t.to == to && t.condition == condition)
            .map(|t| t.id);
        match existing {
            Some(id) => Ok(id),
            None => self.add_transition(from, to, condition),
        }
    }

    pub fn delete_transition(&mut self, id: TransitionId) -> Result<()> {
        if id.owner != self.tag {
            return Err(Error::ForeignTransition(id));
        }
        let transition = &mut self.transitions[id.index()];
        if transition.deleted {
            return Err(Error::AlreadyDeleted(Element::Transition(id)));
        }
        transition.deleted = true;
        let (from, to) = (transition.from, transition.to);
        self.states[from.index()].outgoing.retain(|t| *t != id);
        self.states[to.index()].incoming.retain(|t| *t != id);
        Ok(())
    }

    /// Deletes every transition of the state, then the state itself. The
    /// initial state cannot be deleted.
    pub fn delete_state(&mut self, id: StateId) -> Result<()> {
        self.check_owner(id)?;
        let state = &self.states[id.index()];
        if state.deleted {
            return Err(Error::AlreadyDeleted(Element::State(id)));
        }
        if self.initial == Some(id) {
            return Err(Error::InitialStateDeletion(id));
        }
        let attached: Vec<TransitionId> = state
            .incoming
            .iter()
            .chain(state.outgoing.iter())
            .copied()
            .collect();
        for transition in attached {
            // Self loops show up in both lists.
            if !self.transitions[transition.index()].deleted {
                self.delete_transition(transition)?;
            }
        }
        self.states[id.index()].deleted = true;
        Ok(())
    }

    /// The state with this id, deleted or not. `None` for foreign ids.
    pub fn state(&self, id: StateId) -> Option<&State> {
        if id.owner != self.tag {
            return None;
        }
        self.states.get(id.index())
    }

    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        if id.owner != self.tag {
            return None;
        }
        self.transitions.get(id.index())
    }

    /// Live states, in creation order.
    pub fn states(&self) -> impl Iterator<Item = &State> + '_ {
        self.states.iter().filter(|s| !s.deleted)
    }

    /// Live transitions, in creation order.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> + '_ {
        self.transitions.iter().filter(|t| !t.deleted)
    }

    pub fn outgoing(&self, id: StateId) -> impl Iterator<Item = &Transition> + '_ {
        self.state(id)
            .into_iter()
            .flat_map(move |s| s.outgoing.iter().map(move |t| &self.transitions[t.index()]))
    }

    pub fn incoming(&self, id: StateId) -> impl Iterator<Item = &Transition> + '_ {
        self.state(id)
            .into_iter()
            .flat_map(move |s| s.incoming.iter().map(move |t| &self.transitions[t.index()]))
    }

    pub fn is_accepting(&self, id: StateId) -> bool {
        self.state(id).is_some_and(|s| s.accepting && !s.deleted)
    }

    pub fn state_count(&self) -> usize {
        self.states().count()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions().count()
    }

    pub fn has_sigma(&self) -> bool {
        self.transitions().any(|t| t.condition.is_sigma())
    }

    /// Number of state slots, deleted ones included. Bounds every `StateId::index`.
    pub(crate) fn slot_count(&self) -> usize {
        self.states.len()
    }

    pub(crate) fn state_at(&self, index: usize) -> StateId {
        self.states[index].id
    }

    /// Compacted copy: only live states that take part in a transition (plus
    /// the initial state) survive, renumbered densely, and duplicate edges
    /// are dropped.
    pub fn optimize(&self) -> Result<Automaton> {
        let mut optimized = Automaton::new();
        let mut new_state_by_old: Vec<Option<StateId>> = vec![None; self.states.len()];

        for state in self.states() {
            let used = !state.incoming.is_empty()
                || !state.outgoing.is_empty()
                || self.initial == Some(state.id);
            if used {
                let new_state = optimized.add_state();
                if state.accepting {
                    optimized.set_accepting(new_state)?;
                }
                new_state_by_old[state.id.index()] = Some(new_state);
            }
        }

        for transition in self.transitions() {
            let (Some(from), Some(to)) = (
                new_state_by_old[transition.from.index()],
                new_state_by_old[transition.to.index()],
            ) else {
                continue;
            };
            optimized.add_transition_dedup(from, to, transition.condition.clone())?;
        }

        if let Some(Some(initial)) = self.initial.map(|s| new_state_by_old[s.index()]) {
            optimized.set_initial(initial)?;
        }

        debug!(
            "optimize: {} -> {} states, {} -> {} transitions",
            self.states.len(),
            optimized.states.len(),
            self.transitions.len(),
            optimized.transitions.len()
        );
        Ok(optimized)
    }

    fn check_owner(&self, id: StateId) -> Result<()> {
        if id.owner != self.tag || id.index() >= self.states.len() {
            return Err(Error::ForeignState(id));
        }
        Ok(())
    }

    fn live_state(&self, id: StateId) -> Result<&State> {
        self.check_owner(id)?;
        let state = &self.states[id.index()];
        if state.deleted {
            return Err(Error::DeletedState(id));
        }
        Ok(state)
    }
}
