//! Subset construction.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::Arc;

use log::debug;

use crate::automaton::{Automaton, Condition, StateId};
use crate::class::{CharSet, scalar_range};
use crate::error::Result;
use crate::runner::RunnerMode;

/// A set of source states, sorted and deduplicated.
type Group = Vec<usize>;

/// A state of the result: the source states it stands for, and the lookahead
/// outcomes decided since the last consumed character as
/// `(check, nested automaton matched)`, sorted by check.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Node {
    group: Group,
    decided: Vec<(usize, bool)>,
}

struct Subset<'a> {
    source: &'a Automaton,
    /// Distinct nested automata, identified by pointer and mode. Both
    /// polarities of a lookahead share one entry.
    checks: Vec<(Arc<Automaton>, RunnerMode)>,
    result: Automaton,
    nodes: HashMap<Node, StateId>,
    queue: VecDeque<(Node, StateId)>,
}

/// Builds a deterministic automaton whose states stand for groups of source
/// states.
///
/// Consuming transitions are split into disjoint character atoms first, so
/// every resulting state has at most one consuming transition per character.
///
/// Check transitions are resolved one nested automaton at a time: a state
/// whose group still has an undecided lookahead gets exactly two edges, the
/// check and its negation, leading to the group with and without the targets
/// the lookahead lets through. Consuming edges only leave states with nothing
/// left to decide, so at most one transition matches at any step. Sigma
/// transitions, which callers should eliminate beforehand, are grouped into
/// one edge.
pub fn determinize(automaton: &Automaton) -> Result<Automaton> {
    let initial = automaton.require_initial()?;
    let mut subset = Subset {
        source: automaton,
        checks: Vec::new(),
        result: Automaton::new(),
        nodes: HashMap::new(),
        queue: VecDeque::new(),
    };

    let start = subset.intern(Node {
        group: vec![initial.index()],
        decided: Vec::new(),
    });
    subset.result.set_initial(start)?;

    while let Some((node, from)) = subset.queue.pop_front() {
        subset.expand(node, from)?;
    }

    debug!(
        "determinize: {} -> {} states, {} -> {} transitions, {} lookaheads",
        automaton.state_count(),
        subset.result.state_count(),
        automaton.transition_count(),
        subset.result.transition_count(),
        subset.checks.len()
    );
    Ok(subset.result)
}

impl Subset<'_> {
    fn intern(&mut self, node: Node) -> StateId {
        if let Some(&id) = self.nodes.get(&node) {
            return id;
        }
        let id = self.result.add_state();
        self.nodes.insert(node.clone(), id);
        self.queue.push_back((node, id));
        id
    }

    fn check_index(&mut self, automaton: &Arc<Automaton>, mode: RunnerMode) -> usize {
        match self
            .checks
            .iter()
            .position(|(a, m)| Arc::ptr_eq(a, automaton) && *m == mode)
        {
            Some(index) => index,
            None => {
                self.checks.push((automaton.clone(), mode));
                self.checks.len() - 1
            }
        }
    }

    /// Adds the targets of every check edge that the decided outcomes let
    /// through, until nothing changes.
    fn close(&mut self, group: Group, decided: &[(usize, bool)]) -> Group {
        let source = self.source;
        let mut members: BTreeSet<usize> = group.into_iter().collect();
        let mut stack: Vec<usize> = members.iter().copied().collect();
        while let Some(index) = stack.pop() {
            for transition in source.outgoing(source.state_at(index)) {
                let Condition::Check {
                    automaton,
                    mode,
                    negate,
                } = transition.condition()
                else {
                    continue;
                };
                let check = self.check_index(automaton, *mode);
                let passes = decided
                    .iter()
                    .any(|&(c, found)| c == check && found != *negate);
                let target = transition.to().index();
                if passes && members.insert(target) {
                    stack.push(target);
                }
            }
        }
        members.into_iter().collect()
    }

    fn expand(&mut self, node: Node, from: StateId) -> Result<()> {
        let source = self.source;
        let members: Vec<StateId> = node.group.iter().map(|&i| source.state_at(i)).collect();
        if members.iter().any(|&s| source.is_accepting(s)) {
            self.result.set_accepting(from)?;
        }

        let mut pending: Option<usize> = None;
        let mut consuming: Vec<(CharSet, usize)> = Vec::new();
        let mut sigma: Group = Vec::new();
        for transition in members.iter().flat_map(|&s| source.outgoing(s)) {
            let target = transition.to().index();
            match transition.condition() {
                Condition::Check { automaton, mode, .. } => {
                    let check = self.check_index(automaton, *mode);
                    if !node.decided.iter().any(|&(c, _)| c == check) {
                        pending = Some(pending.map_or(check, |p| p.min(check)));
                    }
                }
                Condition::Sigma => sigma.push(target),
                condition => {
                    if let Some(set) = condition.char_set() {
                        consuming.push((set, target));
                    }
                }
            }
        }

        if !sigma.is_empty() {
            sigma.sort_unstable();
            sigma.dedup();
            let group = self.close(sigma, &node.decided);
            let to = self.intern(Node {
                group,
                decided: node.decided.clone(),
            });
            self.result.add_transition(from, to, Condition::Sigma)?;
        }

        if let Some(check) = pending {
            let (nested, mode) = self.checks[check].clone();
            for found in [true, false] {
                let mut decided = node.decided.clone();
                decided.push((check, found));
                decided.sort_unstable();
                let group = self.close(node.group.clone(), &decided);
                let to = self.intern(Node { group, decided });
                self.result
                    .add_transition(from, to, Condition::check(nested.clone(), mode, !found))?;
            }
            return Ok(());
        }

        for (set, targets) in split_atoms(&consuming) {
            let to = self.intern(Node {
                group: targets,
                decided: Vec::new(),
            });
            self.result.add_transition(from, to, Condition::from_set(set))?;
        }
        Ok(())
    }
}

/// Partitions the characters accepted by `sets` into atoms that every set
/// either fully contains or misses, and merges the atoms reaching the same
/// targets. Returned in order of first character.
fn split_atoms(sets: &[(CharSet, usize)]) -> Vec<(CharSet, Group)> {
    let mut bounds = BTreeSet::new();
    for (set, _) in sets {
        for &(start, end) in set.ranges() {
            bounds.insert(start as u32);
            bounds.insert(end as u32 + 1);
        }
    }
    let bounds: Vec<u32> = bounds.into_iter().collect();

    let mut merged: Vec<(Group, Vec<(char, char)>)> = Vec::new();
    for pair in bounds.windows(2) {
        let Some((start, end)) = scalar_range(pair[0], pair[1] - 1) else {
            continue;
        };
        let mut targets: Group = sets
            .iter()
            .filter(|(set, _)| set.contains(start))
            .map(|&(_, target)| target)
            .collect();
        if targets.is_empty() {
            continue;
        }
        targets.sort_unstable();
        targets.dedup();
        match merged.iter_mut().find(|(t, _)| *t == targets) {
            Some((_, ranges)) => ranges.push((start, end)),
            None => merged.push((targets, vec![(start, end)])),
        }
    }

    merged
        .into_iter()
        .map(|(targets, ranges)| (CharSet::from_ranges(ranges), targets))
        .collect()
}
