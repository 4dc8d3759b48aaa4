//! Property tests for the route trie.

use junction_router::{Match, RouteError, Router};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-c]{1,2}",
        1 => "[a-c]{1,2}".prop_map(|s| format!(":{s}")),
    ]
}

fn pattern() -> impl Strategy<Value = String> {
    proptest::collection::vec(segment(), 0..4).prop_map(|parts| format!("/{}", parts.join("/")))
}

fn verb() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("GET"), Just("POST"), Just("DELETE")]
}

fn request_path() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-c]{1,2}", 0..4).prop_map(|parts| format!("/{}", parts.join("/")))
}

fn snapshot(router: &Router<usize>, probes: &[(String, &'static str)]) -> Vec<String> {
    probes
        .iter()
        .map(|(path, verb)| format!("{:?}", router.match_route(path, verb)))
        .collect()
}

proptest! {
    #[test]
    fn test_rejected_insert_changes_nothing(
        routes in proptest::collection::vec((pattern(), verb()), 1..12),
        probes in proptest::collection::vec((request_path(), verb()), 1..12),
    ) {
        let mut router = Router::new();
        for (i, (pattern, verb)) in routes.iter().enumerate() {
            let before = snapshot(&router, &probes);
            let listed = router.routes();
            match router.insert(pattern, verb, i) {
                Ok(_) => {}
                Err(RouteError::Duplicate { .. } | RouteError::ParameterConflict { .. }) => {
                    prop_assert_eq!(before, snapshot(&router, &probes));
                    prop_assert_eq!(listed, router.routes());
                }
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
        }
    }

    #[test]
    fn test_match_is_deterministic(
        routes in proptest::collection::vec((pattern(), verb()), 1..12),
        path in request_path(),
        verb in verb(),
    ) {
        let mut router = Router::new();
        for (i, (pattern, verb)) in routes.iter().enumerate() {
            let _ = router.insert(pattern, verb, i);
        }
        prop_assert_eq!(router.match_route(&path, verb), router.match_route(&path, verb));
    }

    #[test]
    fn test_found_params_follow_terminal_names(
        routes in proptest::collection::vec((pattern(), verb()), 1..12),
        path in request_path(),
        verb in verb(),
    ) {
        let mut router = Router::new();
        let mut names = Vec::new();
        for (i, (pattern, verb)) in routes.iter().enumerate() {
            if let Ok(info) = router.insert(pattern, verb, i) {
                names.push((i, info.param_names));
            }
        }
        if let Match::Found(hit) = router.match_route(&path, verb) {
            let expected = &names.iter().find(|(i, _)| i == hit.payload).unwrap().1;
            let got: Vec<&str> = hit.params.iter().map(|(n, _)| n).collect();
            prop_assert_eq!(got, expected.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }
}

#[test]
fn test_trailing_slash_matches_identically() {
    let mut router = Router::new();
    router.insert("/users/:id", "GET", 0_usize).unwrap();
    assert_eq!(
        router.match_route("/users/1/", "GET"),
        router.match_route("users/1", "GET")
    );
}
