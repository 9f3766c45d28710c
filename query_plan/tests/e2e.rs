//! End-to-End Tests
//!
//! Drives [`query_plan::compile_plan`] off CSV fixtures on disk, the way a
//! real invocation of the bootstrap binary would, rather than exercising
//! the domain passes directly.

use std::fs::File;
use std::io::Write as _;
use std::path::Path;

use query_plan::export::TextExporter;
use query_plan::{compile_plan, ReadError};

fn write_csv(dir: &Path, name: &str, contents: &str) {
    let mut f = File::create(dir.join(name)).unwrap();
    write!(f, "{contents}").unwrap();
}

/// Mirrors the "assignment inserts re-encryption" scenario: a join over two
/// relations stored at `Storage`, where subject `Z` cannot see the join
/// attributes `N,S` in plaintext. Compiling end-to-end must produce two
/// re-encryption nodes above the leaves, assign both leaves to `Storage`,
/// and terminate the tree in a decryption node for the synthetic user root.
#[test]
fn join_requiring_reencryption_compiles_end_to_end() {
    let dir = tempfile::tempdir().unwrap();

    write_csv(
        dir.path(),
        "tree.csv",
        "ID,operation,Ap,Ae,As,group_attr,size,print_label,parent\n\
         1,projection,,,,,1,leaf-NP,3\n\
         2,projection,,,,,1,leaf-SD,3\n\
         3,join,,NS,,,1,join-NS,0\n",
    );
    write_csv(
        dir.path(),
        "relations.csv",
        "name,provider,primary_key,plain_attr,enc_attr,enc_costs,dec_costs,size,node_id\n\
         R1,Storage,,,NP,1;1,1;1,1;1,1\n\
         R2,Storage,,,SD,1;1,1;1,1;1,2\n",
    );
    write_csv(
        dir.path(),
        "subjects.csv",
        "subject,comp_price,transfer_price\nZ,1,1\nStorage,5,5\n",
    );
    write_csv(
        dir.path(),
        "authorizations.csv",
        "subject,plain,enc\nZ,,NPSD\nStorage,NS,NPSD\n",
    );

    let output = dir.path().join("plan.txt");
    compile_plan(dir.path(), &output, Vec::new(), &TextExporter).unwrap();

    let rendered = std::fs::read_to_string(&output).unwrap();
    assert_eq!(rendered.matches("re-encryption").count(), 2);
    // Both original leaves and both inserted re-encryption nodes end up
    // assigned to the storage provider; the join itself goes to `Z`.
    assert_eq!(rendered.matches("assignee=Storage").count(), 4);
    assert_eq!(rendered.matches("assignee=Z").count(), 1);
    assert_eq!(rendered.matches("decryption").count(), 1);
    assert!(rendered.starts_with("#"));
}

/// A catalog whose `relations.csv` references a `tree.csv` node id that
/// does not exist must fail fast with a dangling-reference error rather
/// than panicking or silently dropping the relation.
#[test]
fn dangling_relation_reference_is_reported() {
    let dir = tempfile::tempdir().unwrap();

    write_csv(
        dir.path(),
        "tree.csv",
        "ID,operation,Ap,Ae,As,group_attr,size,print_label,parent\n1,projection,N,,,,1,leaf,0\n",
    );
    write_csv(
        dir.path(),
        "relations.csv",
        "name,provider,primary_key,plain_attr,enc_attr,enc_costs,dec_costs,size,node_id\nR,Storage,,,N,1,1,1,99\n",
    );
    write_csv(dir.path(), "subjects.csv", "subject,comp_price,transfer_price\nStorage,1,1\n");
    write_csv(dir.path(), "authorizations.csv", "subject,plain,enc\nStorage,N,\n");

    let output = dir.path().join("plan.txt");
    let err = compile_plan(dir.path(), &output, Vec::new(), &TextExporter).unwrap_err();

    assert!(matches!(err, ReadError::DanglingNodeId(99)));
}

/// A manual assignment override naming a subject outside a node's
/// candidate set must surface as an input-validation error, not silently
/// fall back to the cost-minimizing choice.
#[test]
fn manual_assignment_outside_candidates_is_rejected() {
    let dir = tempfile::tempdir().unwrap();

    write_csv(
        dir.path(),
        "tree.csv",
        "ID,operation,Ap,Ae,As,group_attr,size,print_label,parent\n\
         1,projection,,,,,1,leaf,2\n\
         2,projection,,,,,1,outer,0\n",
    );
    write_csv(
        dir.path(),
        "relations.csv",
        "name,provider,primary_key,plain_attr,enc_attr,enc_costs,dec_costs,size,node_id\nR,Storage,,N,,1,1,1,1\n",
    );
    write_csv(
        dir.path(),
        "subjects.csv",
        "subject,comp_price,transfer_price\nStorage,1,1\n",
    );
    write_csv(dir.path(), "authorizations.csv", "subject,plain,enc\nStorage,N,\n");

    let output = dir.path().join("plan.txt");
    let err = compile_plan(dir.path(), &output, vec!["Ghost".to_string()], &TextExporter).unwrap_err();

    assert_eq!(err.category(), "input");
}
