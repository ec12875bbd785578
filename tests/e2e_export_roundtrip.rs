//! End-to-end JSON export: compute roles, serialize, read them back.

use netroles::export::{to_json, write_json};
use netroles::{BinaryRelation, DistanceMatrix, Equivalence, Error, MemoryNetwork, NeighborhoodExt, Ranking, Roles};
use pretty_assertions::assert_eq;

fn tree() -> MemoryNetwork {
    MemoryNetwork::from_ties(6, &[(0, 1), (0, 2), (1, 3), (1, 4), (2, 5)]).unwrap()
}

#[test]
fn test_equivalence_roundtrip() {
    let net = tree();
    let roles = Roles::equivalence()
        .regular()
        .of(6, net.outgoing().plain())
        .unwrap()
        .make()
        .unwrap()
        .fixpoint(Equivalence::trivial(6), 16)
        .unwrap();

    let json = to_json(&roles).unwrap();
    assert_eq!(json, "[0,1,1,2,2,2]");
    let back: Equivalence = serde_json::from_str(&json).unwrap();
    assert_eq!(back, roles);
}

#[test]
fn test_ranking_roundtrip() {
    let net = tree();
    let ranking = Roles::ranking()
        .strong_structural()
        .of(6, net.outgoing().plain())
        .unwrap()
        .make()
        .unwrap()
        .evaluate()
        .unwrap();

    let json = to_json(&ranking).unwrap();
    let back: Ranking = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ranking);
}

#[test]
fn test_imported_relation_is_validated() {
    // 0 ≤ 1, 1 ≤ 2 but not 0 ≤ 2
    let relation: BinaryRelation = serde_json::from_str(
        r#"{"cells":{"actors":3,"pairs":[[0,0],[1,1],[2,2],[0,1],[1,2]]}}"#,
    )
    .unwrap();
    assert!(!relation.is_preorder());
    assert!(matches!(Ranking::from_relation(&relation), Err(Error::NotAPreorder)));

    let out_of_range = r#"{"cells":{"actors":2,"pairs":[[0,0],[1,1],[0,2]]}}"#;
    assert!(serde_json::from_str::<BinaryRelation>(out_of_range).is_err());
}

#[test]
fn test_distance_matrix_pretty_output() {
    let net = tree();
    let op = Roles::equivalence().weak().of(6, net.outgoing().plain()).unwrap().make().unwrap();
    let distances = op.distances(None).unwrap();

    let mut out = Vec::new();
    write_json(&mut out, &*distances).unwrap();
    let back: DistanceMatrix = serde_json::from_slice(&out).unwrap();
    assert_eq!(back, *distances);
    assert_eq!(back.get(0, 3), 2);
}

#[test]
fn test_imported_matrix_is_validated() {
    let short = serde_json::from_str::<DistanceMatrix>(r#"{"actors":3,"cells":[0,7]}"#).unwrap_err();
    assert!(short.to_string().contains("2 cells for 3 actors"));

    let diagonal = serde_json::from_str::<DistanceMatrix>(r#"{"actors":2,"cells":[0,1,1,3]}"#).unwrap_err();
    assert!(diagonal.to_string().contains("d(1, 1) = 3"));
}

#[test]
fn test_imported_roles_must_be_reflexive() {
    let ranking = serde_json::from_str::<Ranking>(r#"{"order":{"actors":2,"pairs":[[0,1]]}}"#).unwrap_err();
    assert!(ranking.to_string().contains("not reflexive at actor 0"));

    let relation = r#"{"cells":{"actors":2,"pairs":[[0,0],[0,1]]}}"#;
    assert!(serde_json::from_str::<BinaryRelation>(relation).is_err());

    // projected rankings need not be transitive and still read back
    let chain = BinaryRelation::from_pairs(3, [(0, 1), (1, 2)]).unwrap();
    let json = r#"{"order":{"actors":3,"pairs":[[0,0],[0,1],[1,1],[1,2],[2,2]]}}"#;
    let back: Ranking = serde_json::from_str(json).unwrap();
    assert!(!back.is_transitive());
    assert_eq!(back.to_relation(), chain);
}
