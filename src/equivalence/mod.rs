use std::collections::{BTreeSet, HashMap, VecDeque};

use log::{debug, trace};

use super::{AutomatonState, DeterministicAutomaton, Error, Limits, Stage};

type Pair = (AutomatonState, AutomatonState);

/// Which of the two compared automata a word belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Equivalent,
    /// `witness` is a shortest word accepted by exactly one side.
    Different { witness: String, accepted_by: Side },
}

impl Verdict {
    pub fn is_equivalent(&self) -> bool {
        matches!(self, Verdict::Equivalent)
    }
}

/// How a product state's acceptance follows from its two components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductOp {
    Intersection,
    Union,
    Difference,
    SymmetricDifference,
}

impl ProductOp {
    pub fn accepts(self, left: bool, right: bool) -> bool {
        match self {
            ProductOp::Intersection => left && right,
            ProductOp::Union => left || right,
            ProductOp::Difference => left && !right,
            ProductOp::SymmetricDifference => left != right,
        }
    }
}

/// Pairs discovered so far, in breadth-first order.
struct PairTable {
    pairs: Vec<Pair>,
    // Predecessor and symbol index leading here, `None` for the start pair
    parents: Vec<Option<(usize, usize)>>,
    index: HashMap<Pair, usize>,
    limit: Option<usize>,
}

impl PairTable {
    fn new(limit: Option<usize>) -> Self {
        Self {
            pairs: Vec::new(),
            parents: Vec::new(),
            index: HashMap::new(),
            limit,
        }
    }

    /// Index of `pair` and whether it was seen for the first time.
    fn insert(
        &mut self,
        pair: Pair,
        parent: Option<(usize, usize)>,
    ) -> Result<(usize, bool), Error> {
        if let Some(&known) = self.index.get(&pair) {
            return Ok((known, false));
        }

        if let Some(limit) = self.limit {
            if self.pairs.len() >= limit {
                return Err(Error::ResourceExceeded {
                    stage: Stage::ProductSearch,
                    limit,
                });
            }
        }

        let new_index = self.pairs.len();
        trace!("product: pair {} = {:?}", new_index, pair);
        self.pairs.push(pair);
        self.parents.push(parent);
        self.index.insert(pair, new_index);
        Ok((new_index, true))
    }

    fn word_to(&self, mut index: usize, a: &DeterministicAutomaton) -> String {
        let mut symbols = Vec::new();

        while let Some((parent, symbol)) = self.parents[index] {
            symbols.extend(a.alphabet().symbol(symbol));
            index = parent;
        }

        symbols.iter().rev().collect()
    }
}

fn successor(
    a: &DeterministicAutomaton,
    b: &DeterministicAutomaton,
    (x, y): Pair,
    index: usize,
) -> Pair {
    (a.next_by_index(x, index), b.next_by_index(y, index))
}

/// Breadth-first search of the product of `a` and `b`, built on demand.
///
/// Returns the shortest word (the alphabetically least among the shortest)
/// leading to a pair `(x, y)` for which `accept(x accepting, y accepting)`
/// holds, or `None` if no reachable pair qualifies.
pub fn find_witness(
    a: &DeterministicAutomaton,
    b: &DeterministicAutomaton,
    accept: impl Fn(bool, bool) -> bool,
    limits: &Limits,
) -> Result<Option<String>, Error> {
    debug_assert_eq!(a.alphabet(), b.alphabet());

    let is_target = |(x, y): Pair| accept(a.is_accepting(x), b.is_accepting(y));
    let mut table = PairTable::new(limits.max_product_states);
    let mut queue = VecDeque::new();

    let start = (a.start_state(), b.start_state());
    let (start_index, _) = table.insert(start, None)?;
    if is_target(start) {
        return Ok(Some(String::new()));
    }
    queue.push_back(start_index);

    while let Some(curr) = queue.pop_front() {
        let pair = table.pairs[curr];

        for index in 0..a.alphabet().len() {
            let next = successor(a, b, pair, index);
            let (next_index, fresh) = table.insert(next, Some((curr, index)))?;
            if !fresh {
                continue;
            }

            if is_target(next) {
                let witness = table.word_to(next_index, a);
                debug!("find_witness: {:?} after {} pairs", witness, table.pairs.len());
                return Ok(Some(witness));
            }
            queue.push_back(next_index);
        }
    }

    debug!("find_witness: none among {} pairs", table.pairs.len());
    Ok(None)
}

/// Decide `L(a) = L(b)` by searching for a word accepted by exactly one side.
pub fn compare(
    a: &DeterministicAutomaton,
    b: &DeterministicAutomaton,
    limits: &Limits,
) -> Result<Verdict, Error> {
    let witness = find_witness(a, b, |x, y| ProductOp::SymmetricDifference.accepts(x, y), limits)?;

    Ok(match witness {
        None => Verdict::Equivalent,
        Some(witness) => {
            let accepted_by = if a.accepts(&witness) {
                Side::Left
            } else {
                Side::Right
            };
            Verdict::Different {
                witness,
                accepted_by,
            }
        }
    })
}

/// A shortest word accepted by `a` but not by `b`, `None` if `L(a) ⊆ L(b)`.
pub fn subset_witness(
    a: &DeterministicAutomaton,
    b: &DeterministicAutomaton,
    limits: &Limits,
) -> Result<Option<String>, Error> {
    find_witness(a, b, |x, y| ProductOp::Difference.accepts(x, y), limits)
}

/// Materialize the part of the product of `a` and `b` reachable from the
/// start pair, with acceptance given by `op`.
pub fn product(
    a: &DeterministicAutomaton,
    b: &DeterministicAutomaton,
    op: ProductOp,
    limits: &Limits,
) -> Result<DeterministicAutomaton, Error> {
    debug_assert_eq!(a.alphabet(), b.alphabet());

    let symbol_count = a.alphabet().len();
    let mut table = PairTable::new(limits.max_product_states);
    let mut rows: Vec<Vec<AutomatonState>> = Vec::new();

    let (start_state, _) = table.insert((a.start_state(), b.start_state()), None)?;

    // Pairs are numbered in discovery order, so the next row to fill is
    // always `rows.len()`.
    while rows.len() < table.pairs.len() {
        let curr = rows.len();
        let pair = table.pairs[curr];
        let mut row = Vec::with_capacity(symbol_count);

        for index in 0..symbol_count {
            let (next_index, _) = table.insert(successor(a, b, pair, index), Some((curr, index)))?;
            row.push(next_index);
        }
        rows.push(row);
    }

    let accept_states: BTreeSet<AutomatonState> = table
        .pairs
        .iter()
        .enumerate()
        .filter(|(_, pair)| op.accepts(a.is_accepting(pair.0), b.is_accepting(pair.1)))
        .map(|(state, _)| state)
        .collect();

    debug!("product({:?}): {} states", op, rows.len());

    Ok(DeterministicAutomaton::from_parts(
        a.alphabet().clone(),
        start_state,
        accept_states,
        rows,
    ))
}
