//! Full buffer runs persisted through the directory store.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tb_core::{Persisted, RecordId, ScriptedBackend, TemplateStore, ThoughtBuffer};
use tb_store::DirStore;
use tempfile::TempDir;

fn rng() -> SmallRng {
    SmallRng::seed_from_u64(42)
}

fn record_count(store: &DirStore) -> usize {
    store.record_ids().unwrap().len()
}

#[test]
fn cold_then_warm_run_on_disk() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("thought_templates");
    let mut rng = rng();

    let mut store = DirStore::open(&dir).unwrap();
    let cold = ScriptedBackend::new([
        "facts",
        "first answer",
        "[begin] scan then compare [end]",
        "[begin] Interval scan [end]",
    ]);
    let outcome = ThoughtBuffer::new(&cold)
        .run("maximise f on [0,100]", &mut store, &mut rng)
        .unwrap();
    assert_eq!(outcome.persisted, Persisted::Created(RecordId::new("0")));
    assert_eq!(record_count(&store), 1);

    // A fresh handle sees what the previous run wrote.
    let mut store = DirStore::open(&dir).unwrap();
    let warm = ScriptedBackend::new([
        "[1]",
        "facts",
        "second answer",
        "[begin] check derivative sign first [end]",
        "[begin] Monotonic shortcut [end]",
        "<<1>> and <<2>> are both fine",
    ]);
    let outcome = ThoughtBuffer::new(&warm)
        .run("maximise g on [1,5]", &mut store, &mut rng)
        .unwrap();

    assert_eq!(outcome.answer, "second answer");
    assert_eq!(outcome.selected, Some(RecordId::new("0")));
    assert!(matches!(outcome.persisted, Persisted::Overwritten { ref id, .. } if id.as_str() == "0"));
    assert_eq!(record_count(&store), 1);

    let stored = store.get(&RecordId::new("0")).unwrap().unwrap();
    let original = stored.content == "scan then compare" && stored.title == "Interval scan";
    let derived =
        stored.content == "check derivative sign first" && stored.title == "Monotonic shortcut";
    assert!(original ^ derived, "record must hold exactly one candidate");
}

#[test]
fn corrupt_record_aborts_before_backend_calls() {
    let tmp = TempDir::new().unwrap();
    let mut store = DirStore::open(tmp.path()).unwrap();
    std::fs::write(tmp.path().join("0.json"), "{oops").unwrap();

    let backend = ScriptedBackend::new(["[1]"]);
    let result = ThoughtBuffer::new(&backend).run("q", &mut store, &mut rng());

    assert!(result.is_err());
    assert_eq!(backend.call_count(), 0);
}
