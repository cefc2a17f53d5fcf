//! Graphviz rendering of automata.
//!
//! States are named `q<index>`, accepting states are drawn as double circles
//! and an invisible `entry` node points at the start state.

use tabbycat::{AttrList, Edge, Graph, GraphBuilder, GraphType, Identity, StmtList};

use crate::{AutomatonTransition, DeterministicAutomaton, Error, FiniteAutomaton};

fn id(name: &str) -> Result<Identity, Error> {
    Identity::id(name).map_err(|e| Error::Render(e.to_string()))
}

fn state_id(state: usize) -> Result<Identity, Error> {
    id(&format!("q{}", state))
}

fn attr(key: &str, value: &str) -> Result<(Identity, Identity), Error> {
    Ok((id(key)?, id(value)?))
}

fn label(text: &str) -> Result<(Identity, Identity), Error> {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    Ok((id("label")?, Identity::quoted(escaped)))
}

fn state_node(stmts: StmtList, state: usize, accepting: bool) -> Result<StmtList, Error> {
    let shape = if accepting { "doublecircle" } else { "circle" };
    Ok(stmts.add_node(
        state_id(state)?,
        None,
        Some(AttrList::new().add_pair(attr("shape", shape)?)),
    ))
}

fn entry(stmts: StmtList, start: usize) -> Result<StmtList, Error> {
    Ok(stmts
        .add_node(
            id("entry")?,
            None,
            Some(AttrList::new().add_pair(attr("shape", "point")?)),
        )
        .add_edge(Edge::head_node(id("entry")?, None).arrow_to_node(state_id(start)?, None)))
}

fn edge(from: usize, to: usize, text: &str) -> Result<Edge, Error> {
    Ok(Edge::head_node(state_id(from)?, None)
        .arrow_to_node(state_id(to)?, None)
        .add_attrpair(label(text)?))
}

fn build(name: &str, stmts: StmtList) -> Result<String, Error> {
    let graph: Graph = GraphBuilder::default()
        .graph_type(GraphType::DiGraph)
        .strict(false)
        .id(id(name)?)
        .stmts(stmts)
        .build()
        .map_err(|e| Error::Render(e.to_string()))?;
    Ok(graph.to_string())
}

impl FiniteAutomaton {
    /// DOT source of the automaton; epsilon moves are labelled `ε`.
    pub fn to_dot(&self) -> Result<String, Error> {
        let mut stmts = entry(StmtList::new(), self.start_state)?;

        for state in 0..self.state_count() {
            stmts = state_node(stmts, state, state == self.accept_state)?;
        }

        for (from, list) in self.transitions.iter().enumerate() {
            for (transition, targets) in list {
                let text = match transition {
                    AutomatonTransition::Epsilon => "ε".to_string(),
                    AutomatonTransition::Symbol(c) => c.to_string(),
                };
                for &to in targets {
                    stmts = stmts.add_edge(edge(from, to, &text)?);
                }
            }
        }

        build("nfa", stmts)
    }
}

impl DeterministicAutomaton {
    /// DOT source of the automaton. Parallel edges between the same two
    /// states are merged into one edge labelled with every symbol.
    pub fn to_dot(&self) -> Result<String, Error> {
        let mut stmts = entry(StmtList::new(), self.start_state)?;

        for state in 0..self.state_count() {
            stmts = state_node(stmts, state, self.is_accepting(state))?;
        }

        for (from, row) in self.table.iter().enumerate() {
            let mut targets: Vec<(usize, String)> = Vec::new();
            for (index, &to) in row.iter().enumerate() {
                let Some(symbol) = self.alphabet.symbol(index) else {
                    continue;
                };
                match targets.iter_mut().find(|(target, _)| *target == to) {
                    Some((_, text)) => {
                        text.push(',');
                        text.push(symbol);
                    }
                    None => targets.push((to, symbol.to_string())),
                }
            }
            for (to, text) in targets {
                stmts = stmts.add_edge(edge(from, to, &text)?);
            }
        }

        build("dfa", stmts)
    }
}
