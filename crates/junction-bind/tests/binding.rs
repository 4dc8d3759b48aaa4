//! End-to-end binding tests through `#[derive(Bind)]`.

use chrono::{DateTime, Utc};
use http::{Method, Uri};
use junction_bind::{
    bind, bind_into, Bind, BindError, Binder, Check, Sources, Tag, Validate, ValidateOwned,
    VALIDATOR_MISUSE,
};
use junction_core::{ProgrammerError, Request};
use serde::Deserialize;

fn get(uri: &'static str) -> Request {
    Request::builder().uri(Uri::from_static(uri)).build()
}

fn post(content_type: Option<&str>, body: &'static str) -> Request {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(Uri::from_static("/"))
        .body(body);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    builder.build()
}

#[derive(Debug, Default, PartialEq, Bind)]
struct Pair {
    #[bind(query = "a")]
    a: isize,
    #[bind(query = "b")]
    b: isize,
}

#[test]
fn test_query_failure_reports_tag_and_zeroes_target() {
    let mut request = get("/?a=2a&b=3");
    let mut target = Pair { a: 5, b: 5 };

    let err = bind_into(&mut target, &mut request, Sources::QUERY).unwrap_err();

    assert_eq!(err.to_string(), "a: 2a is not a valid int: invalid syntax");
    assert_eq!(target, Pair::default());
}

#[test]
fn test_absent_query_keeps_zero_value() {
    let mut request = get("/?b=3");
    let pair: Pair = bind(&mut request, Sources::QUERY).unwrap();
    assert_eq!(pair, Pair { a: 0, b: 3 });
}

#[test]
fn test_scalar_rejects_repeated_query_key() {
    let mut request = get("/?a=1&a=2");
    let err = bind::<Pair>(&mut request, Sources::QUERY).unwrap_err();
    assert_eq!(err.to_string(), "a: expected a single value, got 2");
}

#[derive(Debug, Default, Bind)]
struct ById {
    #[bind(path = "id", query = "id")]
    id: String,
}

#[test]
fn test_query_overlays_path() {
    let mut request = Request::builder()
        .uri(Uri::from_static("/x/7?id=9"))
        .param("id", "7")
        .build();
    let target: ById = bind(&mut request, Sources::ALL).unwrap();
    assert_eq!(target.id, "9");
}

#[test]
fn test_path_only_when_query_not_selected() {
    let mut request = Request::builder()
        .uri(Uri::from_static("/x/7?id=9"))
        .param("id", "7")
        .build();
    let target: ById = bind(&mut request, Sources::PATH).unwrap();
    assert_eq!(target.id, "7");
}

#[derive(Debug, Default, Deserialize, Bind)]
#[serde(default)]
struct Counter {
    #[bind(yaml, json)]
    uint: u32,
}

#[test]
fn test_yaml_content_type() {
    let mut request = post(Some("application/x-yaml"), "uint: 10");
    let counter: Counter = bind(&mut request, Sources::BODY).unwrap();
    assert_eq!(counter.uint, 10);
}

#[test]
fn test_yaml_body_sent_as_json_fails() {
    let mut request = post(Some("application/json"), "uint: 10");
    let err = bind::<Counter>(&mut request, Sources::BODY).unwrap_err();
    assert!(matches!(err, BindError::Body(_)));
    assert!(err.to_string().starts_with("invalid JSON body"), "{err}");
}

#[test]
fn test_missing_content_type_means_json() {
    let mut request = post(None, r#"{"uint": 4}"#);
    let counter: Counter = bind(&mut request, Sources::BODY).unwrap();
    assert_eq!(counter.uint, 4);
}

#[test]
fn test_unsupported_content_type() {
    let mut request = post(Some("text/csv"), "uint\n1");
    let err = bind::<Counter>(&mut request, Sources::BODY).unwrap_err();
    assert_eq!(err.to_string(), "unsupported Content-Type: text/csv");
    assert_eq!(err.status_code(), http::StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[test]
fn test_empty_body_skips_decoding() {
    let mut request = post(Some("text/csv"), "");
    let counter: Counter = bind(&mut request, Sources::BODY).unwrap();
    assert_eq!(counter.uint, 0);
    assert!(!request.body_consumed());
}

#[test]
fn test_body_is_read_once() {
    let mut request = post(Some("application/json"), r#"{"uint": 1}"#);
    let _: Counter = bind(&mut request, Sources::BODY).unwrap();
    let err = bind::<Counter>(&mut request, Sources::BODY).unwrap_err();
    assert!(matches!(err, BindError::BodyConsumed));

    let again: Counter = bind(&mut request, Sources::QUERY).unwrap();
    assert_eq!(again.uint, 0);
}

#[test]
fn test_body_limit() {
    let mut request = post(Some("application/json"), r#"{"uint": 12345}"#);
    let err = Binder::new()
        .with_max_body_bytes(4)
        .bind::<Counter>(&mut request, Sources::BODY)
        .unwrap_err();
    assert!(matches!(err, BindError::PayloadTooLarge { limit: 4, .. }));
    assert!(!request.body_consumed());
}

#[derive(Debug, Default, Deserialize, Bind)]
#[serde(default)]
struct Layered {
    #[bind(json, path, query, header = "X-Level")]
    level: String,
    #[bind(json)]
    note: String,
}

#[test]
fn test_source_precedence() {
    let build = || {
        Request::builder()
            .method(Method::POST)
            .uri(Uri::from_static("/l/path?level=query"))
            .header("content-type", "application/json")
            .header("x-level", "header")
            .param("level", "path")
            .body(r#"{"level":"body","note":"kept"}"#)
    };

    let mut request = build().build();
    let all: Layered = bind(&mut request, Sources::ALL).unwrap();
    assert_eq!(all.level, "header");
    assert_eq!(all.note, "kept");

    let mut request = build().build();
    let no_header: Layered = bind(&mut request, Sources::BODY | Sources::PATH | Sources::QUERY).unwrap();
    assert_eq!(no_header.level, "query");

    let mut request = build().build();
    let body_path: Layered = bind(&mut request, Sources::BODY | Sources::PATH).unwrap();
    assert_eq!(body_path.level, "path");

    let mut request = build().build();
    let body: Layered = bind(&mut request, Sources::BODY).unwrap();
    assert_eq!(body.level, "body");
}

#[test]
fn test_body_overlay_respects_format_tags() {
    #[derive(Debug, Default, Deserialize, Bind)]
    #[serde(default)]
    struct Mixed {
        #[bind(json)]
        from_json: String,
        #[bind(yaml)]
        from_yaml: String,
    }

    let mut request = post(Some("application/json"), r#"{"from_json":"a","from_yaml":"b"}"#);
    let mixed: Mixed = bind(&mut request, Sources::BODY).unwrap();
    assert_eq!(mixed.from_json, "a");
    assert_eq!(mixed.from_yaml, "");
}

#[test]
fn test_serde_rename_names_body_field() {
    #[derive(Debug, Default, Deserialize, Bind)]
    #[serde(default)]
    struct Renamed {
        #[serde(rename = "userName")]
        #[bind(json)]
        user_name: String,
    }

    assert_eq!(Renamed::fields()[0].tag(Tag::Json), Some("userName"));
    let mut request = post(None, r#"{"userName":"ada"}"#);
    let renamed: Renamed = bind(&mut request, Sources::BODY).unwrap();
    assert_eq!(renamed.user_name, "ada");
}

#[derive(Debug, Default, Deserialize, Bind)]
#[serde(default)]
struct Shipment {
    #[bind(xml)]
    carrier: String,
    #[bind(xml)]
    weight: f64,
}

#[test]
fn test_xml_body() {
    let mut request = post(
        Some("text/xml; charset=utf-8"),
        "<shipment><carrier>acme</carrier><weight>2.5</weight></shipment>",
    );
    let shipment: Shipment = bind(&mut request, Sources::BODY).unwrap();
    assert_eq!(shipment.carrier, "acme");
    assert!((shipment.weight - 2.5).abs() < f64::EPSILON);
}

#[derive(Debug, Default, Bind)]
struct Signup {
    #[bind(form)]
    email: String,
    #[bind(form = "topic")]
    topics: Vec<String>,
    #[bind(form)]
    age: Option<u8>,
}

#[test]
fn test_form_body_uses_coercer() {
    let mut request = post(
        Some("application/x-www-form-urlencoded"),
        "email=a%40b.c&topic=rust&topic=http&age=30",
    );
    let signup: Signup = bind(&mut request, Sources::BODY).unwrap();
    assert_eq!(signup.email, "a@b.c");
    assert_eq!(signup.topics, ["rust", "http"]);
    assert_eq!(signup.age, Some(30));
}

#[test]
fn test_form_coercion_error() {
    let mut request = post(Some("application/x-www-form-urlencoded"), "age=old");
    let err = bind::<Signup>(&mut request, Sources::BODY).unwrap_err();
    assert_eq!(err.to_string(), "age: old is not a valid uint8: invalid syntax");
}

#[derive(Debug, Default, Bind)]
struct Listing {
    #[bind(query = "id")]
    ids: Vec<u64>,
    #[bind(query = "rgb")]
    color: [u8; 3],
    #[bind(query)]
    since: Option<DateTime<Utc>>,
    #[bind(header = "X-Trace")]
    trace: Option<Box<String>>,
    #[bind(header = "X-Flag")]
    flags: Vec<bool>,
    #[bind(skip)]
    internal: u32,
    untagged: u32,
}

#[test]
fn test_sequences_and_optionals() {
    let mut request = Request::builder()
        .uri(Uri::from_static(
            "/?id=1&id=2&id=3&rgb=255&rgb=128&since=2024-01-02T03:04:05Z&internal=9&untagged=9",
        ))
        .header("x-trace", "t-1")
        .header("X-FLAG", "t")
        .header("x-flag", "0")
        .build();

    let listing: Listing = bind(&mut request, Sources::ALL).unwrap();
    assert_eq!(listing.ids, [1, 2, 3]);
    assert_eq!(listing.color, [255, 128, 0]);
    assert_eq!(
        listing.since.map(|t| t.to_rfc3339()),
        Some("2024-01-02T03:04:05+00:00".to_string())
    );
    assert_eq!(listing.trace.as_deref().map(String::as_str), Some("t-1"));
    assert_eq!(listing.flags, [true, false]);
    assert_eq!(listing.internal, 0);
    assert_eq!(listing.untagged, 0);
}

#[test]
fn test_fixed_array_overflow() {
    let mut request = get("/?rgb=1&rgb=2&rgb=3&rgb=4");
    let err = bind::<Listing>(&mut request, Sources::QUERY).unwrap_err();
    assert_eq!(
        err.to_string(),
        "rgb: got 4 values for a field holding at most 3"
    );
}

#[test]
fn test_header_value_error_names_header() {
    let mut request = Request::builder().header("x-flag", "maybe").build();
    let err = bind::<Listing>(&mut request, Sources::HEADER).unwrap_err();
    assert_eq!(err.to_string(), "X-Flag: maybe is not a valid bool: invalid syntax");
}

#[test]
fn test_malformed_query() {
    let mut request = get("/?id=%ZZ");
    let result = bind::<Listing>(&mut request, Sources::QUERY);
    assert!(result.is_err());
}

#[test]
fn test_field_table() {
    let fields = Listing::fields();
    let names: Vec<_> = fields.iter().map(|f| f.name).collect();
    assert_eq!(
        names,
        ["ids", "color", "since", "trace", "flags", "internal", "untagged"]
    );
    assert_eq!(fields[0].tags, &[(Tag::Query, "id")]);
    assert!(fields[5].is_untagged());
    assert!(fields[6].is_untagged());
}

#[derive(Debug, Default, Deserialize, Bind)]
#[serde(default)]
struct Profile {
    #[bind(json)]
    name: String,
    #[bind(query = "lang")]
    #[serde(skip)]
    language: String,
    #[serde(skip)]
    score: u8,
}

impl Validate for Profile {
    fn validate(&self) -> Vec<Check> {
        vec![
            Check::new(self.name.len() > 6, "{0} too short").target(&self.name),
            Check::new(!self.language.is_empty(), "{0} is required").target(&self.language),
            Check::new(self.score < 100, "{0} out of range").target(&self.score),
        ]
    }
}

#[test]
fn test_validation_message() {
    let mut request = post(Some("application/json"), r#"{"name":"abc"}"#);
    let mut profile = Profile::default();
    let err = bind_into(&mut profile, &mut request, Sources::BODY).unwrap_err();

    assert_eq!(err.to_string(), "name too short; lang is required");
    let violations = err.validation_errors().unwrap().violations();
    assert_eq!(violations[0].fields, ["name"]);
    assert_eq!(profile.name, "abc");
}

#[test]
fn test_validation_untagged_field_uses_name() {
    let mut profile = Profile {
        name: "abcdefgh".into(),
        language: "en".into(),
        score: 200,
    };
    let mut request = get("/?lang=en");
    let err = bind_into(&mut profile, &mut request, Sources::QUERY).unwrap_err();
    assert_eq!(err.to_string(), "score out of range");
}

#[test]
fn test_validation_passes() {
    let mut request = Request::builder()
        .method(Method::POST)
        .uri(Uri::from_static("/?lang=en"))
        .body(r#"{"name":"abcdefgh"}"#)
        .build();
    let profile: Profile = bind(&mut request, Sources::ALL).unwrap();
    assert_eq!(profile.language, "en");
}

#[derive(Debug, Default, Deserialize, Bind)]
#[serde(default)]
struct Loose {
    #[bind(json)]
    name: String,
}

impl ValidateOwned for Loose {
    fn validate(self) -> Vec<Check> {
        vec![Check::new(false, "never reported")]
    }
}

#[test]
fn test_value_receiver_validation_is_skipped() {
    for _ in 0..2 {
        let mut request = post(None, r#"{"name":"x"}"#);
        let loose: Loose = bind(&mut request, Sources::BODY).unwrap();
        assert_eq!(loose.name, "x");
    }
}

#[derive(Debug, Default, Bind)]
struct Misused {
    #[bind(query)]
    q: String,
}

impl Validate for Misused {
    fn validate(&self) -> Vec<Check> {
        let stray = String::new();
        vec![Check::new(false, "{0} bad").target(&stray)]
    }
}

#[test]
fn test_validator_targeting_foreign_memory_panics() {
    let payload = std::panic::catch_unwind(|| {
        let mut request = get("/?q=1");
        let _ = bind::<Misused>(&mut request, Sources::QUERY);
    })
    .unwrap_err();

    let err = payload.downcast_ref::<ProgrammerError>().unwrap();
    assert_eq!(err.condition, VALIDATOR_MISUSE);
}

#[test]
fn test_binder_from_extensions() {
    let mut request = Request::builder()
        .method(Method::POST)
        .body(r#"{"uint": 123456}"#)
        .extension(Binder::new().with_max_body_bytes(8))
        .build();
    let err = bind::<Counter>(&mut request, Sources::BODY).unwrap_err();
    assert!(matches!(err, BindError::PayloadTooLarge { size: 16, limit: 8 }));
}
