use listsync::{
    core::filter::{Filter, FilterCommit, Query},
    engine::search::{SearchPlan, SearchSequence, plan},
    entities::{document::Document, fuel_card::FuelCard, toll_device::TollDevice, user::User},
    error::{ControllerError, FETCH_FALLBACK, RemoteError, UNAUTHORIZED_MESSAGE},
    record::Record,
    runtime::{
        config::ControllerConfig,
        phase::{FilterPhase, PhaseInput},
    },
    types::{Presentation, ResolveMode},
};

#[test]
fn draft_is_isolated_until_commit() {
    let mut filters = FilterCommit::new(FuelCard::FILTER_FIELDS);
    filters.set_draft("pan", "4000").expect("field");
    assert!(filters.applied().is_blank());

    filters.commit();
    assert_eq!(filters.applied().get("pan"), Some("4000"));

    filters.set_draft("pan", "5000").expect("field");
    assert_eq!(filters.applied().get("pan"), Some("4000"));
}

#[test]
fn whitespace_only_values_are_blank_and_never_queried() {
    let mut filter = Filter::empty(FuelCard::FILTER_FIELDS);
    filter.set("pan", "   ").expect("field");
    filter.set("matricula", "\t").expect("field");
    assert!(filter.is_blank());
    assert!(filter.to_query().is_empty());

    filter.set("provider", " Repsol ").expect("field");
    assert!(!filter.is_blank());
    assert_eq!(filter.to_query(), Query::new().with("provider", "Repsol"));
}

#[test]
fn unknown_fields_are_rejected() {
    let mut filter = Filter::empty(TollDevice::FILTER_FIELDS);
    assert_eq!(
        filter.set("pan", "x"),
        Err(ControllerError::UnknownField("pan".to_string()))
    );
    assert!(filter.set("serial", "x").is_ok());
}

#[test]
fn remove_applied_clears_draft_too() {
    let mut filters = FilterCommit::new(FuelCard::FILTER_FIELDS);
    filters.set_draft("pan", "X").expect("field");
    filters.set_draft("matricula", "Y").expect("field");
    filters.commit();

    assert!(filters.remove_applied("matricula").expect("field"));
    assert_eq!(filters.applied().to_query(), Query::new().with("pan", "X"));
    assert_eq!(filters.draft().get("matricula"), None);
    assert!(!filters.remove_applied("matricula").expect("field"));

    filters.clear_all();
    assert!(filters.draft().is_blank());
    assert!(filters.applied().is_blank());
}

#[test]
fn removing_unapplied_field_keeps_draft_input() {
    let mut filters = FilterCommit::new(FuelCard::FILTER_FIELDS);
    filters.set_draft("pan", "X").expect("field");
    filters.commit();
    filters.set_draft("provider", "Galp").expect("field");

    assert!(!filters.remove_applied("provider").expect("field"));
    assert_eq!(filters.draft().get("provider"), Some("Galp"));
    assert_eq!(filters.draft().get("pan"), Some("X"));
}

#[test]
fn query_serializes_as_flat_map() {
    let query = Query::new().with("pan", "4000").with("matricula", "");
    let json = serde_json::to_string(&query).expect("json");
    assert_eq!(json, r#"{"pan":"4000"}"#);
}

#[test]
fn plan_picks_resolution_path() {
    let mut filter = Filter::empty(User::FILTER_FIELDS);
    assert_eq!(plan(&filter, ResolveMode::Remote), SearchPlan::ShowAll);

    filter.set("email", "@corp").expect("field");
    let query = Query::new().with("email", "@corp");
    assert_eq!(plan(&filter, ResolveMode::Remote), SearchPlan::Remote(query.clone()));
    assert_eq!(plan(&filter, ResolveMode::Local), SearchPlan::Local(query));
}

#[test]
fn only_latest_ticket_is_current() {
    let mut seq = SearchSequence::new();
    let first = seq.issue();
    let second = seq.issue();
    assert!(!seq.is_current(first));
    assert!(seq.is_current(second));

    seq.invalidate();
    assert!(!seq.is_current(second));
}

#[test]
fn local_match_is_case_insensitive_substring() {
    let doc = Document {
        id: "d-1".to_string(),
        title: "Payroll March".to_string(),
        category: "HR".to_string(),
        owner: "ops".to_string(),
        uploaded_on: "2024-03-31".to_string(),
    };
    assert!(doc.matches(&Query::new().with("title", "payroll").with("category", "hr")));
    assert!(!doc.matches(&Query::new().with("title", "invoice")));
    assert!(!doc.matches(&Query::new().with("unknown", "x")));
}

#[test]
fn phase_machine_follows_commit_lifecycle() {
    use FilterPhase::*;

    assert_eq!(Idle.next(PhaseInput::Commit), Some(Committing));
    assert_eq!(Error.next(PhaseInput::Commit), Some(Committing));
    assert_eq!(Loading.next(PhaseInput::Commit), Some(Committing));
    assert_eq!(Committing.next(PhaseInput::ResolvedLocally), Some(Idle));
    assert_eq!(Committing.next(PhaseInput::QueryIssued), Some(Loading));
    assert_eq!(Loading.next(PhaseInput::QuerySucceeded), Some(Idle));
    assert_eq!(Loading.next(PhaseInput::QueryFailed), Some(Error));
    assert_eq!(Loading.next(PhaseInput::Cleared), Some(Idle));

    assert_eq!(Idle.next(PhaseInput::QuerySucceeded), None);
    assert_eq!(Idle.next(PhaseInput::QueryIssued), None);
    assert!(Loading.is_busy());
    assert!(!Error.is_busy());
}

#[test]
fn remote_error_messages() {
    let err = RemoteError::from_response(400, r#"{"detail":"PAN already registered"}"#);
    assert_eq!(err.user_message("fallback"), "PAN already registered");
    assert_eq!(err.fetch_message(), "PAN already registered");

    let err = RemoteError::from_response(502, "<html>Bad gateway</html>");
    assert_eq!(err.detail, None);
    assert_eq!(err.fetch_message(), FETCH_FALLBACK);

    let err = RemoteError::from_response(401, r#"{"detail":"Token expired"}"#);
    assert!(err.is_unauthorized());
    assert_eq!(err.fetch_message(), UNAUTHORIZED_MESSAGE);

    let err = RemoteError::transport("connection reset");
    assert_eq!(err.status, None);
    assert_eq!(err.to_string(), "remote request failed (status none): connection reset");
}

#[test]
fn config_reads_json_with_defaults() {
    let cfg = ControllerConfig::from_json(r#"{"page_size": 10, "resolve_mode": "local"}"#)
        .expect("config");
    assert_eq!(cfg.page_size, 10);
    assert_eq!(cfg.resolve_mode, ResolveMode::Local);
    assert_eq!(cfg.minimum_loading_ms, 0);
    assert_eq!(cfg.fetch_limit, ControllerConfig::default().fetch_limit);

    let mobile = ControllerConfig::for_presentation(Presentation::Constrained);
    assert_eq!(mobile.minimum_loading_ms, 300);
}
