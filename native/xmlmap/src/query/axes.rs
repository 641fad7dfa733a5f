//! Query Evaluation
//!
//! Walks each step's axis from the context node, applies the node test and
//! the name filter, and returns the union in document order.

use super::parser::{Axis, CompiledQuery, NodeTest, Step};
use crate::dom::{Hit, Node};

/// Evaluate a compiled query from a context node
pub fn evaluate<'a, 'input>(query: &CompiledQuery, context: Node<'a, 'input>) -> Vec<Hit<'a, 'input>> {
    let mut hits: Vec<Hit<'a, 'input>> = query
        .branches
        .iter()
        .flat_map(|step| select(step, context))
        .collect();

    hits.sort_by_key(Hit::order_key);
    hits.dedup_by_key(|hit| hit.order_key());
    hits
}

fn select<'a, 'input>(step: &Step, context: Node<'a, 'input>) -> Vec<Hit<'a, 'input>> {
    navigate(context, step.axis)
        .into_iter()
        .filter(|hit| matches_node_test(hit, &step.node_test))
        .filter(|hit| step.name_filter.as_ref().is_none_or(|name| hit.name() == *name))
        .collect()
}

/// Every node on an axis, before any test
fn navigate<'a, 'input>(context: Node<'a, 'input>, axis: Axis) -> Vec<Hit<'a, 'input>> {
    let raw = context.raw();
    match axis {
        Axis::Self_ => vec![Hit::Node(context)],
        Axis::Child => context.child_nodes().into_iter().map(Hit::Node).collect(),
        Axis::Attribute => {
            if !context.is_element() {
                return Vec::new();
            }
            context.attributes().into_iter().map(Hit::Attribute).collect()
        }
        Axis::FollowingSibling => std::iter::successors(raw.next_sibling(), |n| n.next_sibling())
            .map(|n| Hit::Node(context.sibling_handle(n)))
            .collect(),
        Axis::PrecedingSibling => std::iter::successors(raw.prev_sibling(), |n| n.prev_sibling())
            .map(|n| Hit::Node(context.sibling_handle(n)))
            .collect(),
    }
}

fn matches_node_test(hit: &Hit<'_, '_>, node_test: &NodeTest) -> bool {
    match (hit, node_test) {
        (_, NodeTest::Node) => true,
        (Hit::Attribute(_), NodeTest::Any) => true,
        (Hit::Attribute(attr), NodeTest::Name(name)) => attr.name() == *name,
        (Hit::Attribute(_), NodeTest::Text) => false,
        (Hit::Node(node), NodeTest::Any) => node.is_element(),
        (Hit::Node(node), NodeTest::Name(name)) => node.is_element() && node.name() == *name,
        (Hit::Node(node), NodeTest::Text) => node.is_text(),
    }
}
