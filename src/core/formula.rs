//! core::formula
//!
//! Parser for the Structure plugin's flat forest serialization.
//!
//! # Format
//!
//! A structure's hierarchy arrives as a single "formula" string: comma
//! separated `<id>:<depth>` tokens in depth-first pre-order, e.g.
//! `"101:0,102:1,103:1,200:0"`. There are no parent pointers on the wire;
//! the tree must be rebuilt from position and depth alone.
//!
//! # Algorithm
//!
//! Single pass over the tokens with an explicit ancestor stack and a
//! depth cursor:
//!
//! - depth 0 starts a new root and empties the stack
//! - a depth increase attaches a child to the cursor node and descends
//! - an equal depth attaches a sibling to the stacked parent; the cursor
//!   does not move
//! - a depth decrease pops one ancestor and attaches to the new stack top
//!
//! Depth jumps larger than one are treated as a single level transition in
//! both directions; a decrease that empties the stack is rejected as an
//! inconsistent encoding.
//!
//! # Example
//!
//! ```
//! use girder::core::formula::parse_formula;
//!
//! let forest = parse_formula("1:0,2:1,3:1,4:0").unwrap();
//! assert_eq!(forest.len(), 2);
//! assert_eq!(forest[0].id, 1);
//! assert_eq!(forest[0].children.len(), 2);
//! assert!(forest[1].children.is_empty());
//! ```

use thiserror::Error;

/// Errors from formula parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormulaError {
    /// A token is not of the form `<id>:<depth>` with integer fields.
    #[error("malformed formula token '{token}'")]
    Malformed {
        /// The offending token, verbatim.
        token: String,
    },

    /// The depth sequence cannot describe a valid nested forest.
    #[error("inconsistent depth sequence at token '{token}': {reason}")]
    Structural {
        /// The token at which the inconsistency surfaced.
        token: String,
        /// What went wrong with the ancestor stack.
        reason: String,
    },
}

/// A node of the raw forest: an issue id and its ordered children.
///
/// Carries no issue metadata; materialization resolves ids into full
/// requirement records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaNode {
    /// Tracker-internal issue id.
    pub id: u64,
    /// Children in document order.
    pub children: Vec<FormulaNode>,
}

impl FormulaNode {
    fn new(id: u64) -> Self {
        Self {
            id,
            children: Vec::new(),
        }
    }

    /// Total node count of this subtree, including self.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(FormulaNode::len).sum::<usize>()
    }

    /// True if this node has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Open node during the single-pass build.
///
/// Children are recorded as arena indices; a child is always created after
/// its parent, so indices inside `children` are strictly greater than the
/// slot's own index.
struct Slot {
    id: u64,
    children: Vec<usize>,
}

/// Parse a formula string into an ordered forest of [`FormulaNode`]s.
///
/// Empty tokens (doubled or trailing separators) are ignored; `""` parses
/// to an empty forest.
///
/// # Errors
///
/// - [`FormulaError::Malformed`] for a token without a `:` separator or
///   with non-integer fields, naming the offending token
/// - [`FormulaError::Structural`] when the depth sequence references an
///   ancestor that does not exist (e.g. a first token deeper than 0, or a
///   depth decrease past the outermost open node)
pub fn parse_formula(formula: &str) -> Result<Vec<FormulaNode>, FormulaError> {
    let mut arena: Vec<Slot> = Vec::new();
    let mut roots: Vec<usize> = Vec::new();
    let mut stack: Vec<usize> = Vec::new();
    let mut current: Option<usize> = None;
    let mut current_depth: u32 = 0;

    for token in formula.split(',') {
        if token.is_empty() {
            continue;
        }
        let (id, depth) = decode(token)?;
        let node = arena.len();
        arena.push(Slot {
            id,
            children: Vec::new(),
        });

        if depth == 0 {
            // New root: roots never have a stacked parent.
            roots.push(node);
            stack.clear();
            current = Some(node);
            current_depth = 0;
        } else if depth > current_depth {
            // Child of the cursor node, whatever the size of the jump.
            let parent = current.ok_or_else(|| FormulaError::Structural {
                token: token.to_string(),
                reason: "first token must have depth 0".to_string(),
            })?;
            arena[parent].children.push(node);
            stack.push(parent);
            current = Some(node);
            current_depth = depth;
        } else if depth == current_depth {
            // Sibling: attach to the shared parent. The cursor stays on the
            // previous node; only depth transitions move it.
            let parent = *stack.last().ok_or_else(|| FormulaError::Structural {
                token: token.to_string(),
                reason: "sibling with no open parent".to_string(),
            })?;
            arena[parent].children.push(node);
        } else {
            // Ascend exactly one level.
            stack.pop().ok_or_else(|| FormulaError::Structural {
                token: token.to_string(),
                reason: "depth decrease past the outermost open node".to_string(),
            })?;
            let parent = *stack.last().ok_or_else(|| FormulaError::Structural {
                token: token.to_string(),
                reason: "depth decrease past the outermost open node".to_string(),
            })?;
            arena[parent].children.push(node);
            current = Some(node);
            current_depth = depth;
        }
    }

    Ok(build_forest(arena, &roots))
}

/// Decode one `<id>:<depth>` token.
fn decode(token: &str) -> Result<(u64, u32), FormulaError> {
    let malformed = || FormulaError::Malformed {
        token: token.to_string(),
    };
    let (id, depth) = token.split_once(':').ok_or_else(malformed)?;
    let id = id.parse::<u64>().map_err(|_| malformed())?;
    let depth = depth.parse::<u32>().map_err(|_| malformed())?;
    Ok((id, depth))
}

/// Turn the index arena into an owned forest.
///
/// Iterative, in reverse creation order: every child slot has a larger
/// index than its parent, so children are always assembled first.
fn build_forest(mut arena: Vec<Slot>, roots: &[usize]) -> Vec<FormulaNode> {
    let mut built: Vec<Option<FormulaNode>> = Vec::with_capacity(arena.len());
    built.resize_with(arena.len(), || None);

    for idx in (0..arena.len()).rev() {
        let slot = &mut arena[idx];
        let mut node = FormulaNode::new(slot.id);
        node.children = slot
            .children
            .drain(..)
            .map(|child| {
                built[child]
                    .take()
                    .expect("child slots are assembled before their parent")
            })
            .collect();
        built[idx] = Some(node);
    }

    roots
        .iter()
        .map(|&root| {
            built[root]
                .take()
                .expect("root slots are assembled by the reverse pass")
        })
        .collect()
}
