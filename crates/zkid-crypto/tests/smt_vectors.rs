//! # Sparse Merkle Tree Cross-Implementation Vectors
//!
//! Roots and proofs computed by the iden3 Go tree and the on-chain Solidity
//! library for the same insertions. If these fail, proofs generated here
//! will not verify on chain or in the circom verifier.

#![cfg(feature = "poseidon")]

use zkid_core::{FieldElement, Hash, U256};
use zkid_crypto::{verify_proof, MemoryTree, PoseidonHasher, TreeError};

type Tree = MemoryTree<PoseidonHasher>;

fn fe(s: &str) -> FieldElement {
    FieldElement::from_dec_str(s).expect("valid decimal")
}

fn h(s: &str) -> Hash {
    Hash::from(fe(s))
}

/// 2^bits - 1.
fn ones(bits: usize) -> FieldElement {
    let one = U256::from_limbs([1, 0, 0, 0]);
    FieldElement::new((one << bits) - one).expect("below modulus")
}

fn tree_with(leaves: &[(FieldElement, FieldElement)]) -> Tree {
    let mut tree = Tree::default();
    for (k, v) in leaves {
        tree.add(*k, *v).expect("insert");
    }
    tree
}

// ---------------------------------------------------------------------------
// Keys 4 (100), 2 (010)
// ---------------------------------------------------------------------------

#[test]
fn single_leaf_4() {
    let tree = tree_with(&[(fe("4"), fe("444"))]);
    assert_eq!(
        tree.root(),
        h("17172838131998611102390183760409471205043596092117126608119446264795219840387")
    );
    let (proof, value) = tree.generate_proof(fe("4")).unwrap();
    assert!(proof.existence);
    assert!(proof.siblings.is_empty());
    assert_eq!(value, fe("444"));
}

#[test]
fn keys_4_and_2_inclusion_of_2() {
    let tree = tree_with(&[(fe("4"), fe("444")), (fe("2"), fe("222"))]);
    assert_eq!(
        tree.root(),
        h("1441373283294527316959936912733986290796958290497398831120725405602534136472")
    );
    let (proof, value) = tree.generate_proof(fe("2")).unwrap();
    assert!(proof.existence);
    assert_eq!(value, fe("222"));
    assert_eq!(
        proof.siblings,
        vec![
            Hash::ZERO,
            h("17172838131998611102390183760409471205043596092117126608119446264795219840387"),
        ]
    );
    assert!(verify_proof::<PoseidonHasher>(&tree.root(), &proof, &fe("2"), &value));
}

#[test]
fn keys_4_and_2_non_inclusion_of_6_collides_with_2() {
    let tree = tree_with(&[(fe("4"), fe("444")), (fe("2"), fe("222"))]);
    let (proof, value) = tree.generate_proof(fe("6")).unwrap();
    assert!(!proof.existence);
    let aux = proof.node_aux.expect("aux leaf");
    assert_eq!(aux.key, h("2"));
    assert_eq!(aux.value, h("222"));
    assert_eq!(value, fe("222"));
    assert!(verify_proof::<PoseidonHasher>(&tree.root(), &proof, &fe("6"), &FieldElement::ZERO));
}

#[test]
fn keys_4_and_2_non_inclusion_of_1_is_empty() {
    let tree = tree_with(&[(fe("4"), fe("444")), (fe("2"), fe("222"))]);
    let (proof, value) = tree.generate_proof(fe("1")).unwrap();
    assert!(!proof.existence);
    assert!(proof.node_aux.is_none());
    assert_eq!(value, FieldElement::ZERO);
    assert_eq!(
        proof.siblings,
        vec![h("6675047397658061825643898157145998146182607268727302490292227324666463200032")]
    );
}

#[test]
fn single_leaf_non_inclusion_uses_leaf_as_aux() {
    let tree = tree_with(&[(fe("4"), fe("444"))]);
    let (proof, value) = tree.generate_proof(fe("2")).unwrap();
    assert!(!proof.existence);
    assert!(proof.siblings.is_empty());
    assert_eq!(proof.node_aux.map(|a| a.key), Some(h("4")));
    assert_eq!(value, fe("444"));
}

// ---------------------------------------------------------------------------
// Keys 3 (011), 7 (111)
// ---------------------------------------------------------------------------

#[test]
fn keys_3_and_7() {
    let tree = tree_with(&[(fe("3"), fe("333"))]);
    let single_root =
        h("9620424510282781520312293538235812893148558849034106480402397875614354541113");
    assert_eq!(tree.root(), single_root);

    let tree = tree_with(&[(fe("3"), fe("333")), (fe("7"), fe("777"))]);
    assert_eq!(
        tree.root(),
        h("19815655640973429763502848653182332850553075596353874436508539687379197912551")
    );
    let (proof, _) = tree.generate_proof(fe("7")).unwrap();
    assert_eq!(proof.siblings, vec![Hash::ZERO, Hash::ZERO, single_root]);
}

#[test]
fn update_7_changes_root() {
    let mut tree = tree_with(&[(fe("3"), fe("333")), (fe("7"), fe("777"))]);
    let before = tree.root();
    tree.add_or_update(fe("7"), fe("778")).unwrap();
    assert_eq!(
        tree.root(),
        h("2542404438766480113585642347874916876260762595281604113407869433952183945353")
    );
    // The pre-update root stays provable.
    let (proof, value) = tree.generate_proof_at_root(fe("7"), before).unwrap();
    assert!(proof.existence);
    assert_eq!(value, fe("777"));
}

// ---------------------------------------------------------------------------
// Depth limits
// ---------------------------------------------------------------------------

#[test]
fn max_depth_leaves_with_low_bits_set() {
    let tree = tree_with(&[(ones(63), fe("100")), (ones(64), fe("100"))]);
    assert_eq!(
        tree.root(),
        h("11998361913555620744473305594791175460338619045531124782442564216176360071119")
    );
    let (proof, _) = tree.generate_proof(ones(64)).unwrap();
    assert_eq!(proof.siblings.len(), 64);
    assert_eq!(
        proof.siblings[63],
        h("2316164946517152574748505824782744746774130618858955093234986590959173249001")
    );
}

#[test]
fn max_depth_leaves_with_low_bits_clear() {
    let key = fe("9223372036854775808");
    let tree = tree_with(&[(FieldElement::ZERO, fe("100")), (key, fe("100"))]);
    assert_eq!(
        tree.root(),
        h("7851364894145224193468155117213470810715599698407298245809392679874651946419")
    );
    let (proof, _) = tree.generate_proof(key).unwrap();
    assert_eq!(
        proof.siblings[63],
        h("1321531033810699781922362637795367691578399901805457949741207048379959301312")
    );
}

#[test]
fn max_depth_leaves_with_mixed_bits() {
    let key = fe("8490314929315140110");
    let tree = tree_with(&[(fe("17713686966169915918"), fe("100")), (key, fe("100"))]);
    assert_eq!(
        tree.root(),
        h("5640762368545907066458698273870257445508350556310355422307954953617544677976")
    );
    let (proof, _) = tree.generate_proof(key).unwrap();
    assert_eq!(
        proof.siblings[63],
        h("21059535177784591611482142343728384369736848354398899541533132315810203341674")
    );
}

#[test]
fn depth_65_insertions_fail() {
    let cases = [
        (ones(64), ones(65)),
        (FieldElement::ZERO, FieldElement::from_u128(1u128 << 64)),
        (fe("17713686966169915918"), fe("36160431039879467534")),
    ];
    for (first, second) in cases {
        let mut tree = tree_with(&[(first, fe("100"))]);
        let err = tree.add(second, fe("100")).unwrap_err();
        assert!(matches!(err, TreeError::MaxDepthReached { max_depth: 64, .. }), "{err}");
    }
}
