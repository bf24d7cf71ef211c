use hpo_cli::api_client::NetworkError;
use hpo_cli::search::{SearchController, SearchPhase};
use hpo_cli::term::Term;

fn terms(pairs: &[(&str, &str)]) -> Vec<Term> {
    pairs.iter().map(|(id, name)| Term::new(*id, *name)).collect()
}

fn transport_error() -> NetworkError {
    // Build a real reqwest error by pointing at an unroutable URL scheme.
    let err = reqwest::blocking::Client::new()
        .get("http://[invalid-host/")
        .send()
        .unwrap_err();
    NetworkError::Transport {
        url: "http://example.invalid".to_string(),
        source: err,
    }
}

#[test]
fn whitespace_query_goes_idle_and_never_dispatches() {
    let mut search = SearchController::new(0);
    search.on_input_changed("   ");
    assert_eq!(*search.phase(), SearchPhase::Idle);
    assert!(search.poll_ready_query().is_none());
    assert!(!search.is_debounce_pending());
}

#[test]
fn clearing_the_query_invalidates_the_inflight_request() {
    let mut search = SearchController::new(0);
    search.on_input_changed("seizure");
    let query = search.poll_ready_query().unwrap();
    assert_eq!(query, "seizure");

    // Query cleared while the request is in flight.
    search.on_input_changed("");
    assert_eq!(*search.phase(), SearchPhase::Idle);

    // The late response targets a query that is no longer live.
    search.apply_result(&query, Ok(terms(&[("HP:0001250", "Seizure")])));
    assert_eq!(*search.phase(), SearchPhase::Idle);
    assert!(search.terms().is_empty());
}

#[test]
fn only_the_last_keystroke_dispatches() {
    let mut search = SearchController::new(0);
    search.on_input_changed("s");
    search.on_input_changed("se");
    search.on_input_changed("sei");

    // One debounce window, one dispatch, for the final text.
    assert_eq!(search.poll_ready_query().as_deref(), Some("sei"));
    assert!(search.poll_ready_query().is_none());
    assert!(matches!(search.phase(), SearchPhase::Loading { query } if query == "sei"));
}

#[test]
fn long_window_does_not_fire_early() {
    let mut search = SearchController::new(10_000);
    search.on_input_changed("seizure");
    assert_eq!(*search.phase(), SearchPhase::Pending);
    assert!(search.poll_ready_query().is_none());
    assert!(search.is_debounce_pending());
}

#[test]
fn results_keep_response_order() {
    let mut search = SearchController::new(0);
    search.on_input_changed("seiz");
    let query = search.poll_ready_query().unwrap();

    search.apply_result(
        &query,
        Ok(terms(&[
            ("HP:0001250", "Seizure"),
            ("HP:0032792", "Tonic seizure"),
            ("HP:0002069", "Bilateral tonic-clonic seizure"),
        ])),
    );
    assert!(matches!(search.phase(), SearchPhase::Results { .. }));
    assert_eq!(search.result_count(), 3);
    let ids: Vec<&str> = search.terms().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["HP:0001250", "HP:0032792", "HP:0002069"]);
}

#[test]
fn empty_response_is_no_results_not_error() {
    let mut search = SearchController::new(0);
    search.on_input_changed("zzzz");
    let query = search.poll_ready_query().unwrap();
    search.apply_result(&query, Ok(Vec::new()));
    assert!(matches!(search.phase(), SearchPhase::NoResults { query } if query == "zzzz"));
}

#[test]
fn failure_reaches_the_failed_state() {
    let mut search = SearchController::new(0);
    search.on_input_changed("seizure");
    let query = search.poll_ready_query().unwrap();
    search.apply_result(&query, Err(transport_error()));
    assert!(matches!(search.phase(), SearchPhase::Failed { .. }));
    assert!(search.terms().is_empty());
}

#[test]
fn stale_response_for_an_older_query_is_dropped() {
    let mut search = SearchController::new(0);
    search.on_input_changed("seiz");
    let old_query = search.poll_ready_query().unwrap();

    // User keeps typing; a new request goes out.
    search.on_input_changed("seizure");
    let new_query = search.poll_ready_query().unwrap();

    // The older response lands after the newer one.
    assert!(search.apply_result(&new_query, Ok(terms(&[("HP:0001250", "Seizure")]))));
    assert!(!search.apply_result(&old_query, Ok(terms(&[("HP:9999999", "Stale")]))));

    assert_eq!(search.result_count(), 1);
    assert_eq!(search.terms()[0].id, "HP:0001250");
}

#[test]
fn apply_result_reports_whether_the_list_changed() {
    // The caller keys cursor resets off the return value; a dropped stale
    // response must report false so the live list's cursor stays put.
    let mut search = SearchController::new(0);
    search.on_input_changed("seiz");
    let old_query = search.poll_ready_query().unwrap();
    search.on_input_changed("seizure");
    let new_query = search.poll_ready_query().unwrap();

    assert!(!search.apply_result(&old_query, Ok(terms(&[("HP:9999999", "Stale")]))));
    assert!(search.apply_result(&new_query, Ok(Vec::new())));
    assert!(search.apply_result(&new_query, Err(transport_error())));
}
