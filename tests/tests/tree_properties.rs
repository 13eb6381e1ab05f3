//! Property tests for the ordered tree.

use arbor_tests::prelude::*;
use proptest::prelude::*;

const POOL: usize = 6;

#[derive(Debug, Clone)]
enum Op {
    Append(usize),
    InsertBefore(usize, Option<usize>),
    Remove(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..POOL).prop_map(Op::Append),
        (0..POOL, proptest::option::of(0..POOL)).prop_map(|(c, r)| Op::InsertBefore(c, r)),
        (0..POOL).prop_map(Op::Remove),
    ]
}

/// A detached parent and a pool of candidate children.
fn pool(graph: &mut Graph) -> (NodeId, Vec<NodeId>) {
    run_in_transaction(graph, |tx| {
        let mut dom = Dom::new(tx, SecurityContext::SuperUser);
        let parent = dom.create_element(None, "ul")?;
        let nodes = (0..POOL)
            .map(|_| dom.create_element(None, "li"))
            .collect::<DomResult<Vec<_>>>()?;
        DomResult::Ok((parent, nodes))
    })
    .unwrap()
}

/// Apply `op` to the store and to a plain vector model; both must agree
/// on whether the call is rejected.
fn apply(graph: &mut Graph, parent: NodeId, nodes: &[NodeId], model: &mut Vec<NodeId>, op: &Op) {
    let result = run_in_transaction(graph, |tx| {
        let mut dom = Dom::new(tx, SecurityContext::SuperUser);
        match *op {
            Op::Append(c) => dom.append_child(parent, nodes[c]),
            Op::InsertBefore(c, r) => dom.insert_before(parent, nodes[c], r.map(|r| nodes[r])),
            Op::Remove(c) => dom.remove_child(parent, nodes[c]),
        }
    });

    let expect_ok = match *op {
        Op::Append(c) | Op::InsertBefore(c, None) => {
            model.retain(|n| *n != nodes[c]);
            model.push(nodes[c]);
            true
        }
        Op::InsertBefore(c, Some(r)) => {
            if !model.contains(&nodes[r]) {
                false
            } else {
                if c != r {
                    model.retain(|n| *n != nodes[c]);
                    let at = model.iter().position(|n| *n == nodes[r]).unwrap();
                    model.insert(at, nodes[c]);
                }
                true
            }
        }
        Op::Remove(c) => match model.iter().position(|n| *n == nodes[c]) {
            Some(at) => {
                model.remove(at);
                true
            }
            None => false,
        },
    };

    assert_eq!(result.is_ok(), expect_ok, "{:?} -> {:?}", op, result);
    if let Err(err) = result {
        assert!(matches!(err, DomError::NotFoundChild(_)), "{:?}", err);
    }
}

fn view(graph: &Graph) -> DomView<'_> {
    DomView::new(graph, Default::default())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_chain_stays_linear(ops in proptest::collection::vec(op(), 1..40)) {
        let mut graph = Graph::new();
        let (parent, nodes) = pool(&mut graph);
        let mut model = Vec::new();

        for op in &ops {
            apply(&mut graph, parent, &nodes, &mut model, op);
            check_chain(view(&graph), parent).unwrap();
            prop_assert_eq!(view(&graph).child_nodes(parent), model.clone());
        }
    }

    #[test]
    fn prop_insert_before_none_is_append(
        setup in proptest::collection::vec(0..POOL, 0..8),
        child in 0..POOL,
    ) {
        let mut appended = Graph::new();
        let mut inserted = Graph::new();
        let (pa, na) = pool(&mut appended);
        let (pi, ni) = pool(&mut inserted);
        let (mut ma, mut mi) = (Vec::new(), Vec::new());
        for c in &setup {
            apply(&mut appended, pa, &na, &mut ma, &Op::Append(*c));
            apply(&mut inserted, pi, &ni, &mut mi, &Op::Append(*c));
        }

        apply(&mut appended, pa, &na, &mut ma, &Op::Append(child));
        apply(&mut inserted, pi, &ni, &mut mi, &Op::InsertBefore(child, None));

        let positions = |graph: &Graph, parent: NodeId, nodes: &[NodeId]| -> Vec<usize> {
            view(graph)
                .child_nodes(parent)
                .into_iter()
                .filter_map(|n| nodes.iter().position(|x| *x == n))
                .collect()
        };
        prop_assert_eq!(positions(&appended, pa, &na), positions(&inserted, pi, &ni));
    }

    #[test]
    fn prop_remove_then_reinsert_restores_order(len in 1..POOL, pick in 0..POOL) {
        let mut graph = Graph::new();
        let (parent, nodes) = pool(&mut graph);
        let mut model = Vec::new();
        for c in 0..len {
            apply(&mut graph, parent, &nodes, &mut model, &Op::Append(c));
        }
        let before = view(&graph).child_nodes(parent);
        let target = before[pick % len];
        let next = view(&graph).next_sibling(target);

        run_in_transaction(&mut graph, |tx| {
            let mut dom = Dom::new(tx, SecurityContext::SuperUser);
            dom.remove_child(parent, target)?;
            dom.insert_before(parent, target, next)
        })
        .unwrap();

        check_chain(view(&graph), parent).unwrap();
        prop_assert_eq!(view(&graph).child_nodes(parent), before);
    }

    #[test]
    fn prop_normalize_is_idempotent(
        pieces in proptest::collection::vec(proptest::option::of("[a-z]{1,3}"), 0..12),
    ) {
        let mut graph = Graph::new();
        let parent = run_in_transaction(&mut graph, |tx| {
            let mut dom = Dom::new(tx, SecurityContext::SuperUser);
            let parent = dom.create_element(None, "p")?;
            for piece in &pieces {
                let child = match piece {
                    Some(text) => dom.create_text_node(None, text)?,
                    None => dom.create_element(None, "br")?,
                };
                dom.append_child(parent, child)?;
            }
            DomResult::Ok(parent)
        })
        .unwrap();
        let text_before = view(&graph).text_content(parent);

        run_in_transaction(&mut graph, |tx| Dom::new(tx, SecurityContext::SuperUser).normalize(parent))
            .unwrap();
        let once = view(&graph).child_nodes(parent);
        run_in_transaction(&mut graph, |tx| Dom::new(tx, SecurityContext::SuperUser).normalize(parent))
            .unwrap();
        let twice = view(&graph).child_nodes(parent);

        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(view(&graph).text_content(parent), text_before);
        let v = view(&graph);
        for pair in once.windows(2) {
            prop_assert!(v.node_value(pair[0]).is_none() || v.node_value(pair[1]).is_none());
        }
    }

    #[test]
    fn prop_hierarchy_rejects_self_and_ancestors(depth in 1usize..8, pick in 0usize..8) {
        let mut graph = Graph::new();
        let chain = run_in_transaction(&mut graph, |tx| {
            let mut dom = Dom::new(tx, SecurityContext::SuperUser);
            let mut chain = vec![dom.create_element(None, "div")?];
            for _ in 0..depth {
                let child = dom.create_element(None, "div")?;
                dom.append_child(*chain.last().unwrap(), child)?;
                chain.push(child);
            }
            DomResult::Ok(chain)
        })
        .unwrap();
        let deepest = *chain.last().unwrap();
        let ancestor = chain[pick % depth];
        let snapshot: Vec<Vec<NodeId>> = chain.iter().map(|n| view(&graph).child_nodes(*n)).collect();

        let self_err = run_in_transaction(&mut graph, |tx| {
            Dom::new(tx, SecurityContext::SuperUser).append_child(deepest, deepest)
        })
        .unwrap_err();
        let ancestor_err = run_in_transaction(&mut graph, |tx| {
            Dom::new(tx, SecurityContext::SuperUser).append_child(deepest, ancestor)
        })
        .unwrap_err();

        prop_assert!(matches!(self_err, DomError::HierarchyRequestSelf(_)));
        prop_assert!(matches!(ancestor_err, DomError::HierarchyRequestAncestor(_)));
        let after: Vec<Vec<NodeId>> = chain.iter().map(|n| view(&graph).child_nodes(*n)).collect();
        prop_assert_eq!(snapshot, after);
    }
}
