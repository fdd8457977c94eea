use lazy_static::lazy_static;
use rand::seq::SliceRandom;
use roster::{Controller, FetchState, MirrorError, Outcome, Record, RecordId};
use roster_test::FakeSource;
use std::time::Duration;
use tokio::{task::JoinHandle, time::timeout};

lazy_static! {
    static ref AB: Vec<Record> = vec![Record::new("1", "A", "a@x"), Record::new("2", "B", "b@x")];
}

async fn loaded(source: FakeSource) -> Controller<FakeSource> {
    let controller = Controller::new(source);
    controller.load().await.expect("initial load failed");
    controller
}

/// Yield to spawned requests until `done` holds.
async fn until<F: Fn() -> bool>(done: F) {
    timeout(Duration::from_secs(5), async {
        while !done() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("condition never became true");
}

fn spawn_update(
    controller: &Controller<FakeSource>,
    id: &str,
    name: &str
) -> JoinHandle<Result<Outcome, MirrorError>> {
    let controller = controller.clone();
    let id = RecordId::new(id);
    let name = name.to_string();
    tokio::spawn(async move { controller.request_update(&id, move || Some(name.clone())).await })
}

fn spawn_delete(
    controller: &Controller<FakeSource>,
    id: &str
) -> JoinHandle<Result<Outcome, MirrorError>> {
    let controller = controller.clone();
    let id = RecordId::new(id);
    tokio::spawn(async move { controller.request_delete(&id, || true).await })
}

#[tokio::test]
async fn update_then_delete_scenario() {
    let controller = loaded(FakeSource::new(AB.clone())).await;

    let outcome = controller
        .request_update(&RecordId::new("1"), || Some("A2".to_string()))
        .await;
    assert_eq!(outcome, Ok(Outcome::Applied));
    assert_eq!(
        controller.snapshot().records,
        vec![Record::new("1", "A2", "a@x"), Record::new("2", "B", "b@x")]
    );

    let outcome = controller.request_delete(&RecordId::new("2"), || true).await;
    assert_eq!(outcome, Ok(Outcome::Applied));
    assert_eq!(controller.snapshot().records, vec![Record::new("1", "A2", "a@x")]);
}

#[tokio::test]
async fn failed_fetch_leaves_nothing_to_render() {
    let controller = Controller::new(FakeSource::failing_fetch("network down"));

    let result = controller.load().await;
    assert!(matches!(result, Err(MirrorError::FetchFailed { .. })));

    let view = controller.snapshot();
    assert!(view.records.is_empty());
    assert_eq!(view.fetch_error().map(MirrorError::reason), Some("server returned errors: network down"));
    assert!(!view.show_loading());
    assert_eq!(controller.source().calls().fetches, 1);
}

#[tokio::test]
async fn refetch_recovers_after_failure() {
    let controller = Controller::new(FakeSource::failing_fetch("network down"));
    let _ = controller.load().await;

    controller.source().set_list(roster_test::users());
    assert_eq!(controller.load().await, Ok(5));

    let view = controller.snapshot();
    assert_eq!(view.records, roster_test::users());
    assert_eq!(view.fetch, FetchState::Loaded);
}

#[tokio::test]
async fn requested_name_wins_over_echo() {
    let controller = loaded(FakeSource::new(AB.clone()).with_echo_name("Server Name")).await;

    controller
        .request_update(&RecordId::new("2"), || Some("Bea".to_string()))
        .await
        .unwrap();

    assert_eq!(controller.snapshot().records[1], Record::new("2", "Bea", "b@x"));
}

#[tokio::test]
async fn delete_payload_is_not_inspected() {
    let controller = loaded(FakeSource::new(AB.clone()).with_delete_payload(false)).await;

    let outcome = controller.request_delete(&RecordId::new("1"), || true).await;
    assert_eq!(outcome, Ok(Outcome::Applied));
    assert_eq!(controller.snapshot().records, vec![Record::new("2", "B", "b@x")]);
}

#[tokio::test]
async fn cancelled_intents_never_reach_the_source() {
    let controller = loaded(FakeSource::new(AB.clone())).await;

    let update = controller
        .request_update(&RecordId::new("1"), || None)
        .await;
    let delete = controller.request_delete(&RecordId::new("1"), || false).await;

    assert_eq!(update, Ok(Outcome::Skipped));
    assert_eq!(delete, Ok(Outcome::Skipped));
    assert_eq!(controller.source().calls().updates, 0);
    assert_eq!(controller.source().calls().deletes, 0);
    assert_eq!(controller.snapshot().records, *AB);
}

#[tokio::test]
async fn rejected_mutations_are_surfaced() {
    let source = FakeSource::new(AB.clone());
    source.fail(&RecordId::new("2"));
    let controller = loaded(source).await;

    let update = controller
        .request_update(&RecordId::new("2"), || Some("B2".to_string()))
        .await;
    let delete = controller.request_delete(&RecordId::new("2"), || true).await;

    let view = controller.snapshot();
    assert_eq!(view.records, *AB);
    assert_eq!(view.update_error, update.err());
    assert_eq!(view.delete_error, delete.err());
    assert!(matches!(
        view.delete_error,
        Some(MirrorError::DeleteFailed { ref id, .. }) if id.as_str() == "2"
    ));
}

#[tokio::test]
async fn requests_apply_in_resolution_order() {
    let controller = loaded(FakeSource::new(AB.clone())).await;
    let gate_1 = controller.source().gate(&RecordId::new("1"));
    let gate_2 = controller.source().gate(&RecordId::new("2"));

    let first = spawn_update(&controller, "1", "A2");
    let second = spawn_update(&controller, "2", "B2");
    until(|| controller.source().calls().updates == 2).await;
    assert!(controller.snapshot().updating);

    gate_2.open();
    assert_eq!(second.await.unwrap(), Ok(Outcome::Applied));
    assert_eq!(
        controller.snapshot().records,
        vec![Record::new("1", "A", "a@x"), Record::new("2", "B2", "b@x")]
    );
    assert!(controller.snapshot().updating, "one update is still in flight");

    gate_1.open();
    assert_eq!(first.await.unwrap(), Ok(Outcome::Applied));
    let view = controller.snapshot();
    assert_eq!(view.records[0].name, "A2");
    assert!(!view.updating);
}

#[tokio::test]
async fn same_id_updates_last_resolved_wins() {
    let controller = loaded(FakeSource::new(AB.clone())).await;
    let id = RecordId::new("1");
    let gate_first = controller.source().gate(&id);
    let gate_second = controller.source().gate(&id);

    let first = spawn_update(&controller, "1", "First");
    until(|| controller.source().calls().updates == 1).await;
    let second = spawn_update(&controller, "1", "Second");
    until(|| controller.source().calls().updates == 2).await;

    gate_second.open();
    second.await.unwrap().unwrap();
    gate_first.open();
    first.await.unwrap().unwrap();

    assert_eq!(controller.snapshot().records[0].name, "First");
}

#[tokio::test]
async fn late_update_does_not_resurrect() {
    let controller = loaded(FakeSource::new(AB.clone())).await;
    let id = RecordId::new("1");
    let gate = controller.source().gate(&id);

    let update = spawn_update(&controller, "1", "A2");
    until(|| controller.source().calls().updates == 1).await;

    // The update consumed the only gate, so the delete resolves right away.
    assert_eq!(controller.request_delete(&id, || true).await, Ok(Outcome::Applied));
    gate.open();

    assert_eq!(update.await.unwrap(), Ok(Outcome::Discarded));
    assert_eq!(controller.snapshot().records, vec![Record::new("2", "B", "b@x")]);
}

#[tokio::test]
async fn refetch_while_pending_drops_the_confirmation() {
    let controller = loaded(FakeSource::new(AB.clone())).await;
    let gate = controller.source().gate(&RecordId::new("2"));

    let update = spawn_update(&controller, "2", "B2");
    until(|| controller.source().calls().updates == 1).await;
    controller
        .on_fetch_settled(Ok(vec![Record::new("3", "C", "c@x")]))
        .unwrap();
    gate.open();

    assert_eq!(update.await.unwrap(), Ok(Outcome::Discarded));
    assert_eq!(controller.snapshot().records, vec![Record::new("3", "C", "c@x")]);
}

#[tokio::test]
async fn teardown_discards_late_confirmations() {
    let controller = loaded(FakeSource::new(AB.clone())).await;
    let gate = controller.source().gate(&RecordId::new("1"));

    let delete = spawn_delete(&controller, "1");
    until(|| controller.source().calls().deletes == 1).await;
    assert!(controller.snapshot().deleting);

    controller.teardown();
    controller.on_fetch_settled(Ok(AB.clone())).unwrap();
    gate.open();

    assert_eq!(delete.await.unwrap(), Ok(Outcome::Discarded));
    let view = controller.snapshot();
    assert_eq!(view.records, *AB);
    assert!(!view.deleting);
}

#[tokio::test]
async fn deleting_flag_covers_overlapping_requests() {
    let controller = loaded(FakeSource::new(AB.clone())).await;
    let gate_1 = controller.source().gate(&RecordId::new("1"));
    let gate_2 = controller.source().gate(&RecordId::new("2"));

    let first = spawn_delete(&controller, "1");
    let second = spawn_delete(&controller, "2");
    until(|| controller.source().calls().deletes == 2).await;

    gate_1.open();
    first.await.unwrap().unwrap();
    assert!(controller.snapshot().deleting);

    gate_2.open();
    second.await.unwrap().unwrap();
    let view = controller.snapshot();
    assert!(!view.deleting);
    assert!(view.records.is_empty());
}

#[tokio::test]
async fn shuffled_resolutions_keep_the_store_consistent() {
    let users = roster_test::users();
    let controller = loaded(FakeSource::new(users.clone())).await;

    // Rename the odd ids, delete the even ones.
    let mut gates = Vec::new();
    let mut handles = Vec::new();
    for user in &users {
        gates.push(controller.source().gate(&user.id));
        let n: u32 = user.id.as_str().parse().unwrap();
        handles.push(if n % 2 == 1 {
            spawn_update(&controller, user.id.as_str(), &format!("User {}", n))
        } else {
            spawn_delete(&controller, user.id.as_str())
        });
    }
    until(|| {
        let calls = controller.source().calls();
        calls.updates.get() + calls.deletes.get() == 5
    })
    .await;

    gates.shuffle(&mut rand::thread_rng());
    for gate in gates {
        gate.open();
        tokio::task::yield_now().await;
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), Ok(Outcome::Applied));
    }

    let expected: Vec<Record> = users
        .into_iter()
        .filter(|user| user.id.as_str().parse::<u32>().unwrap() % 2 == 1)
        .map(|user| {
            let name = format!("User {}", user.id);
            Record { name, ..user }
        })
        .collect();
    let view = controller.snapshot();
    assert_eq!(view.records, expected);
    assert!(!view.updating && !view.deleting);
}

#[tokio::test]
async fn abandoned_requests_release_the_busy_flags() {
    let controller = loaded(FakeSource::new(AB.clone())).await;
    let _gate_1 = controller.source().gate(&RecordId::new("1"));
    let _gate_2 = controller.source().gate(&RecordId::new("2"));

    let update = timeout(
        Duration::from_millis(20),
        controller.request_update(&RecordId::new("1"), || Some("A2".to_string()))
    )
    .await;
    let delete = timeout(
        Duration::from_millis(20),
        controller.request_delete(&RecordId::new("2"), || true)
    )
    .await;
    assert!(update.is_err() && delete.is_err(), "gated requests should not resolve");

    let view = controller.snapshot();
    assert!(!view.updating);
    assert!(!view.deleting);
    assert_eq!(view.records, *AB);
    assert_eq!(view.update_error, None);
}

#[tokio::test]
async fn aborted_task_does_not_clear_other_requests() {
    let controller = loaded(FakeSource::new(AB.clone())).await;
    let _gate_1 = controller.source().gate(&RecordId::new("1"));
    let gate_2 = controller.source().gate(&RecordId::new("2"));

    let first = spawn_update(&controller, "1", "A2");
    let second = spawn_update(&controller, "2", "B2");
    until(|| controller.source().calls().updates == 2).await;

    first.abort();
    assert!(first.await.unwrap_err().is_cancelled());
    assert!(controller.snapshot().updating, "the second update is still in flight");

    gate_2.open();
    assert_eq!(second.await.unwrap(), Ok(Outcome::Applied));
    let view = controller.snapshot();
    assert!(!view.updating);
    assert_eq!(view.records[1].name, "B2");
}
