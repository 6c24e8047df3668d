use super::*;

/// Triangle a-b-c with one label per flip, same label in both directions.
fn triangle() -> FlipGraphBuilder<&'static str, &'static str> {
    let mut b = FlipGraphBuilder::new();
    for n in ["a", "b", "c"] {
        b.add_node(n);
    }
    b.add_flip("a", "b", "ab", "ab");
    b.add_flip("b", "c", "bc", "bc");
    b.add_flip("a", "c", "ac", "ac");
    b
}

#[test]
fn build_indexes_nodes_labels_and_arcs() {
    let g = triangle().build().unwrap();
    assert_eq!(g.node_count(), 3);
    assert_eq!(g.label_count(), 3);
    assert_eq!(g.arc_count(), 6);
    assert_eq!(g.node_id(&"b"), Some(NodeId(1)));
    assert_eq!(g.label_id(&"ac"), Some(LabelId(2)));
    // outgoing lists follow flip insertion order
    let out_a: Vec<NodeId> = g.outgoing(NodeId(0)).iter().map(|a| a.to).collect();
    assert_eq!(out_a, vec![NodeId(1), NodeId(2)]);
    for a in g.arcs() {
        let r = g.reverse(*a);
        assert_eq!((r.from, r.to), (a.to, a.from));
        assert_eq!(g.reverse(r), *a);
    }
}

#[test]
fn arc_to_unknown_node_is_rejected_at_build() {
    let mut b = triangle();
    b.add_flip("c", "zz", "cz", "cz");
    assert_eq!(b.build().unwrap_err(), GraphError::UnknownNode { flip: 3 });
}

#[test]
fn duplicate_payloads_and_self_loops_are_rejected() {
    let mut b = triangle();
    b.add_node("a");
    assert_eq!(b.build().unwrap_err(), GraphError::DuplicateNode { node: 3 });

    let mut b = triangle();
    b.add_flip("a", "a", "aa", "aa");
    assert_eq!(b.build().unwrap_err(), GraphError::SelfLoop { flip: 3 });

    let mut b = triangle();
    b.add_flip("b", "a", "ab", "ab");
    assert!(matches!(
        b.build().unwrap_err(),
        GraphError::DuplicateArc { .. }
    ));

    let empty: FlipGraphBuilder<u8, u8> = FlipGraphBuilder::new();
    assert_eq!(empty.build().unwrap_err(), GraphError::Empty);
}

#[test]
fn declared_labels_are_strict_and_ordered() {
    let b = triangle().with_labels(["ac", "bc", "ab", "ac"]);
    let g = b.build().unwrap();
    assert_eq!(g.labels(), &["ac", "bc", "ab"]);

    let b = triangle().with_labels(["ab", "bc"]);
    assert_eq!(b.build().unwrap_err(), GraphError::UnknownLabel { flip: 2 });

    // unused declared labels still count towards |L|
    let g = triangle()
        .with_labels(["ab", "bc", "ac", "spare"])
        .build()
        .unwrap();
    assert_eq!(g.label_count(), 4);
}

#[test]
fn shuffled_order_is_reproducible_permutation() {
    let mut b1 = FlipGraphBuilder::new();
    let mut b2 = FlipGraphBuilder::new();
    for i in 0..8u32 {
        b1.add_node(i);
        b2.add_node(i);
    }
    for i in 1..8u32 {
        b1.add_flip(0, i, i, i);
        b2.add_flip(0, i, i, i);
    }
    let g1 = b1.with_arc_order(ArcOrder::Shuffled { seed: 7 }).build().unwrap();
    let g2 = b2.with_arc_order(ArcOrder::Shuffled { seed: 7 }).build().unwrap();
    assert_eq!(g1.outgoing(NodeId(0)), g2.outgoing(NodeId(0)));
    let mut ids: Vec<usize> = g1.outgoing(NodeId(0)).iter().map(|a| a.to.0).collect();
    ids.sort_unstable();
    assert_eq!(ids, (1..8).collect::<Vec<_>>());
}

#[test]
fn nodes_entered_by_label() {
    let mut b = FlipGraphBuilder::new();
    for n in 0..4u8 {
        b.add_node(n);
    }
    // directional labels: entering 1 via "x", leaving via "y"
    b.add_flip(0, 1, "x", "y");
    b.add_flip(2, 1, "x", "z");
    b.add_flip(2, 3, "y", "z");
    let g = b.build().unwrap();
    let x = g.label_id(&"x").unwrap();
    let y = g.label_id(&"y").unwrap();
    assert_eq!(g.nodes_entered_by(x), vec![NodeId(1)]);
    assert_eq!(g.nodes_entered_by(y), vec![NodeId(0), NodeId(3)]);
}

#[test]
fn cycle_closed_checks_the_walk() {
    let g = triangle().build().unwrap();
    let ab = g.outgoing(NodeId(0))[0];
    let bc = g.outgoing(NodeId(1))[1];
    let ca = g.reverse(g.outgoing(NodeId(0))[1]);
    let cyc = Cycle::closed(vec![ab, bc, ca]).unwrap();
    assert_eq!(cyc.start(), NodeId(0));
    assert_eq!(
        cyc.nodes().collect::<Vec<_>>(),
        vec![NodeId(0), NodeId(1), NodeId(2)]
    );
    assert_eq!(cyc.rotated(1).start(), NodeId(1));
    assert!(Cycle::closed(vec![ab, bc]).is_none());
    assert!(Cycle::closed(vec![]).is_none());

    let back = g.reverse_cycle(&cyc);
    assert_eq!(
        back.nodes().collect::<Vec<_>>(),
        vec![NodeId(0), NodeId(2), NodeId(1)]
    );
    assert_eq!(g.cycle_nodes(&back), vec![&"a", &"c", &"b"]);
}
