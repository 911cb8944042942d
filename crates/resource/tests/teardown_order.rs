//! Registration and teardown behaviour of a single scope

mod common;

use pretty_assertions::assert_eq;
use rstest::rstest;

use common::{Call, ConnectError, Journal, Probe, recorded_scope};
use warden_resource::{Capabilities, Error, Outcome, ScopeEvent, ScopeState};

// ---------------------------------------------------------------------------
// 1. Ordering
// ---------------------------------------------------------------------------

#[test]
fn two_resources_close_in_reverse() {
    let journal = Journal::default();
    let (mut scope, recorder) = recorded_scope();

    scope.register("A", Probe::new("A", &journal)).unwrap();
    scope.register("B", Probe::new("B", &journal)).unwrap();
    drop(scope);

    assert_eq!(
        journal.calls(),
        vec![
            Call::Open("A".into()),
            Call::Open("B".into()),
            Call::Close("B".into()),
            Call::Close("A".into()),
        ]
    );
    assert_eq!(recorder.close_attempts(), vec!["B", "A"]);
}

#[test]
fn full_event_sequence_for_clean_scope() {
    let journal = Journal::default();
    let (mut scope, recorder) = recorded_scope();

    scope.register("db", Probe::new("db", &journal)).unwrap();
    scope.register("api", Probe::new("api", &journal)).unwrap();
    scope.close();

    let mut events = recorder.events();
    let finished = events.pop().unwrap();
    assert!(matches!(finished, ScopeEvent::Finished { .. }));
    assert_eq!(
        events,
        vec![
            ScopeEvent::Entered,
            ScopeEvent::Opened { name: "db".into() },
            ScopeEvent::Opened { name: "api".into() },
            ScopeEvent::Exiting {
                outcome: Outcome::Completed
            },
            ScopeEvent::Closed { name: "api".into() },
            ScopeEvent::Closed { name: "db".into() },
        ]
    );
}

#[test]
fn duplicate_names_are_each_closed() {
    let journal = Journal::default();
    let (mut scope, _recorder) = recorded_scope();

    scope.register("conn", Probe::new("first", &journal)).unwrap();
    scope.register("conn", Probe::new("second", &journal)).unwrap();
    drop(scope);

    assert_eq!(journal.closes(), vec!["second", "first"]);
}

// ---------------------------------------------------------------------------
// 2. Close failures are isolated
// ---------------------------------------------------------------------------

#[test]
fn failing_close_does_not_stop_the_sweep() {
    let journal = Journal::default();
    let (mut scope, recorder) = recorded_scope();

    scope.register("A", Probe::new("A", &journal)).unwrap();
    scope.register("B", Probe::new("B", &journal)).unwrap();
    scope
        .register("C", Probe::new("C", &journal).failing_close())
        .unwrap();

    let report = scope.close();

    assert_eq!(journal.closes(), vec!["C", "B", "A"]);
    assert_eq!(recorder.close_failures(), vec!["C"]);
    assert_eq!(report.closed, vec!["B", "A"]);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].downcast_source::<ConnectError>().is_some());
}

#[test]
fn every_close_failing_still_attempts_all() {
    let journal = Journal::default();
    let (mut scope, recorder) = recorded_scope();

    for label in ["x", "y", "z"] {
        scope
            .register(label, Probe::new(label, &journal).failing_close())
            .unwrap();
    }
    let report = scope.close();

    assert_eq!(journal.closes(), vec!["z", "y", "x"]);
    assert_eq!(recorder.close_failures(), vec!["z", "y", "x"]);
    assert!(report.closed.is_empty());
    assert_eq!(report.failures.len(), 3);
}

#[test]
fn close_failure_event_carries_message() {
    let journal = Journal::default();
    let (mut scope, recorder) = recorded_scope();

    scope
        .register("api", Probe::new("api", &journal).failing_close())
        .unwrap();
    scope.close();

    assert!(recorder.events().contains(&ScopeEvent::CloseFailed {
        name: "api".into(),
        error: "connection refused by api".into(),
    }));
}

// ---------------------------------------------------------------------------
// 3. Open failures
// ---------------------------------------------------------------------------

#[test]
fn failed_open_is_returned_and_not_tracked() {
    let journal = Journal::default();
    let (mut scope, recorder) = recorded_scope();

    let err = scope
        .register("A", Probe::new("A", &journal).failing_open())
        .unwrap_err();

    assert!(matches!(err, Error::Open { ref name, .. } if name == "A"));
    let source = err.into_source().unwrap();
    assert_eq!(
        source.downcast_ref::<ConnectError>().unwrap().0,
        "A".to_string()
    );
    assert!(scope.is_empty());

    scope.close();
    assert!(journal.closes().is_empty());
    assert!(recorder.close_attempts().is_empty());
    assert!(recorder.events().contains(&ScopeEvent::OpenFailed {
        name: "A".into(),
        error: "connection refused by A".into(),
    }));
}

#[test]
fn failed_open_aborts_body_but_earlier_resources_close() {
    let journal = Journal::default();
    let (mut scope, _recorder) = recorded_scope();

    let body = |scope: &mut warden_resource::ResourceScope| -> warden_resource::Result<()> {
        scope.register("A", Probe::new("A", &journal))?;
        scope.register("B", Probe::new("B", &journal).failing_open())?;
        scope.register("C", Probe::new("C", &journal))?;
        Ok(())
    };

    assert!(body(&mut scope).is_err());
    drop(scope);

    assert_eq!(journal.opens(), vec!["A", "B"]);
    assert_eq!(journal.closes(), vec!["A"]);
}

#[test]
fn empty_name_is_rejected_before_open() {
    let journal = Journal::default();
    let (mut scope, _recorder) = recorded_scope();

    let err = scope.register("", Probe::new("nameless", &journal)).unwrap_err();

    assert!(matches!(err, Error::EmptyName));
    assert!(journal.calls().is_empty());
    assert!(scope.is_empty());
}

// ---------------------------------------------------------------------------
// 4. Capabilities
// ---------------------------------------------------------------------------

#[rstest]
#[case(Capabilities::None, vec![], vec![])]
#[case(Capabilities::OpenOnly, vec!["r"], vec![])]
#[case(Capabilities::CloseOnly, vec![], vec!["r"])]
#[case(Capabilities::Both, vec!["r"], vec!["r"])]
fn only_declared_hooks_run(
    #[case] capabilities: Capabilities,
    #[case] opens: Vec<&str>,
    #[case] closes: Vec<&str>,
) {
    let journal = Journal::default();
    let (mut scope, recorder) = recorded_scope();

    scope
        .register("r", Probe::new("r", &journal).with_capabilities(capabilities))
        .unwrap();
    assert_eq!(scope.len(), 1);
    scope.close();

    assert_eq!(journal.opens(), opens);
    assert_eq!(journal.closes(), closes);
    assert_eq!(recorder.opened(), opens);
    assert_eq!(recorder.close_attempts(), closes);
}

#[test]
fn failing_hooks_are_ignored_when_not_declared() {
    let journal = Journal::default();
    let (mut scope, _recorder) = recorded_scope();

    scope
        .register(
            "quiet",
            Probe::new("quiet", &journal)
                .with_capabilities(Capabilities::None)
                .failing_open()
                .failing_close(),
        )
        .unwrap();
    let report = scope.close();

    assert!(report.is_clean());
    assert!(journal.calls().is_empty());
}

#[test]
fn plain_values_can_be_managed() {
    let (mut scope, recorder) = recorded_scope();

    let settings = scope.manage("settings", vec!["a", "b"]).unwrap();
    assert_eq!(settings.borrow().len(), 2);
    assert_eq!(scope.state(), ScopeState::Active);
    scope.close();

    assert!(recorder.opened().is_empty());
    assert!(recorder.close_attempts().is_empty());
}

// ---------------------------------------------------------------------------
// 5. Handles
// ---------------------------------------------------------------------------

#[test]
fn handle_gives_direct_access_to_registered_resource() {
    let journal = Journal::default();
    let (mut scope, _recorder) = recorded_scope();

    let probe = scope.register("p", Probe::new("p", &journal)).unwrap();
    assert_eq!(probe.borrow().label, "p");
    probe.borrow_mut().label.push_str("-renamed");
    drop(scope);

    assert_eq!(journal.closes(), vec!["p-renamed"]);
}
