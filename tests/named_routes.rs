//! Naming, composition and reverse building through the router facade.

use axum::http::Method;
use reverse_router::routing::{CollisionPolicy, QueryParams};
use reverse_router::{params, BuildError, Mux, Routes};

async fn ok() -> &'static str {
    "ok"
}

#[test]
fn test_regex_param_and_wildcard() {
    let mut mux: Mux = Mux::new();
    mux.get("/foo/{bar:[a-z-]+}/*", ok).name("foo");

    let path = mux.build_path("foo", ["bar", "value", "*", "wild/card"]).unwrap();
    assert_eq!(path, "/foo/value/wild/card");
}

#[test]
fn test_mounted_route_with_params() {
    let mut sub: Mux = Mux::new();
    sub.get("/bar/{baz}", ok).name("bar");

    let mut mux: Mux = Mux::new();
    mux.mount("/nested/{foo}", sub);

    let path = mux.build_path("bar", ["baz", "value2", "foo", "value1"]).unwrap();
    assert_eq!(path, "/nested/value1/bar/value2");

    let mut query = QueryParams::new();
    query.insert("q".into(), vec!["q1".into(), "q2".into()]);
    let path = mux
        .build_path("bar", params!["baz", "value2", "foo", "value1", query])
        .unwrap();
    assert_eq!(path, "/nested/value1/bar/value2?q=q1&q=q2");
}

#[test]
fn test_all_params_substituted() {
    let mut mux: Mux = Mux::new();
    mux.get("/a/{x}/b/{y:[0-9]+}/c/{z}/*", ok).name("many");

    let path = mux
        .build_path("many", ["x", "1", "y", "2", "z", "3", "*", "rest"])
        .unwrap();
    assert_eq!(path, "/a/1/b/2/c/3/rest");
    assert!(!path.contains('{') && !path.contains('}'));
}

#[test]
fn test_missing_param_fails() {
    let mut mux: Mux = Mux::new();
    mux.get("/a/{x}/b/{y}", ok).name("two");

    let err = mux.build_path("two", ["x", "1", "page", "2"]).unwrap_err();
    assert_eq!(
        err,
        BuildError::MissingParams {
            route: "two".into(),
            missing: vec!["y".into()],
        }
    );
}

#[test]
fn test_unnamed_routes_cannot_be_built() {
    let mut mux: Mux = Mux::new();
    mux.get("/anonymous", ok);

    assert!(mux.registry().is_empty());
    assert_eq!(
        mux.build_path("anonymous", params![]),
        Err(BuildError::RouteNotFound("anonymous".into()))
    );
}

#[test]
fn test_inline_name() {
    let mut mux: Mux = Mux::new();
    mux.get("(user-show)/users/{id}", ok);

    assert_eq!(mux.path("user-show", ["id", "5"]), "/users/5");
    assert_eq!(mux.route_name(Some(&Method::GET), "/users/{id}"), Some("user-show"));
}

#[test]
fn test_route_name_round_trip() {
    let mut mux: Mux = Mux::new();
    mux.post("/items/{id}", ok).name("x");
    mux.route("/any", axum::routing::any(ok)).name("any");

    assert_eq!(mux.route_name(Some(&Method::POST), "/items/{id}"), Some("x"));
    assert_eq!(mux.route_name(Some(&Method::GET), "/items/{id}"), None);
    assert_eq!(mux.route_name(None, "/any"), Some("any"));
}

#[test]
fn test_group_shares_registry() {
    let mut mux: Mux = Mux::new();
    mux.group(|r| {
        r.get("/grouped", ok).name("grouped");
        r.group(|inner| {
            inner.get("/deeper/{id}", ok).name("deeper");
        });
    });

    assert_eq!(mux.path("grouped", params![]), "/grouped");
    assert_eq!(mux.path("deeper", ["id", "1"]), "/deeper/1");
}

#[test]
fn test_nest_prefixes_only_its_scope() {
    let mut mux: Mux = Mux::new();
    mux.nest("/org/{org}", |r| {
        assert_eq!(r.prefix(), "/org/{org}");
        r.get("/repos/{repo}", ok).name("repo");
        r.nest("/teams", |t| {
            t.get("/{team}", ok).name("team");
        });
        r.get("/settings", ok).name("settings");
    });
    mux.get("/top", ok).name("top");

    assert_eq!(mux.path("repo", ["org", "acme", "repo", "web"]), "/org/acme/repos/web");
    assert_eq!(mux.path("team", ["org", "acme", "team", "core"]), "/org/acme/teams/core");
    assert_eq!(mux.path("settings", ["org", "acme"]), "/org/acme/settings");
    assert_eq!(mux.path("top", params![]), "/top");
}

#[test]
fn test_mount_inside_nest_uses_scope_prefix() {
    let mut sub: Mux = Mux::new();
    sub.get("/{id}", ok).name("widget");

    let mut mux: Mux = Mux::new();
    mux.nest("/v1", |r| {
        r.mount("/widgets", sub);
    });

    assert_eq!(mux.path("widget", ["id", "9"]), "/v1/widgets/9");
    assert_eq!(mux.route_name(Some(&Method::GET), "/v1/widgets/{id}"), Some("widget"));
}

#[test]
fn test_mount_composition_is_associative() {
    let leaf = || {
        let mut c: Mux = Mux::new();
        c.get("/leaf/{id:[0-9]+}", ok).name("leaf");
        c
    };

    let mut b: Mux = Mux::new();
    b.mount("/c", leaf());
    let mut a: Mux = Mux::new();
    a.mount("/b/{x}", b);

    let mut direct: Mux = Mux::new();
    direct.mount("/b/{x}/c", leaf());

    assert_eq!(a.registry().get("leaf"), direct.registry().get("leaf"));
    assert_eq!(a.path("leaf", ["x", "1", "id", "2"]), "/b/1/c/leaf/2");
}

#[test]
fn test_root_sub_route_drops_trailing_slash() {
    let mut sub: Mux = Mux::new();
    sub.get("/", ok).name("api-root");

    let mut mux: Mux = Mux::new();
    mux.mount("/api", sub);
    mux.nest("/v2", |r| {
        r.get("/", ok).name("v2-root");
    });

    assert_eq!(mux.path("api-root", params![]), "/api");
    assert_eq!(mux.path("v2-root", params![]), "/v2");
}

fn declare_api<R: Routes<()>>(r: &mut R) {
    r.get("/", ok).name("root");
    r.get("/items/{id:[0-9]+}/", ok).name("item");
    r.post("/items", ok).name("create");
    r.nest("/deep/", |d| {
        d.get("/", ok).name("deep-root");
        d.get("/*", ok).name("deep-file");
    });
}

#[test]
fn test_nest_matches_mount() {
    for pattern in ["/api", "/api/", "/v/{ver}/", "/"] {
        let mut nested: Mux = Mux::new();
        nested.nest(pattern, |r| declare_api(r));

        let mut sub: Mux = Mux::new();
        declare_api(&mut sub);
        let mut mounted: Mux = Mux::new();
        mounted.mount(pattern, sub);

        for name in ["root", "item", "create", "deep-root", "deep-file"] {
            assert!(nested.registry().get(name).is_some(), "{pattern} {name}");
            assert_eq!(
                nested.registry().get(name),
                mounted.registry().get(name),
                "{pattern} {name}"
            );
        }
    }

    let mut mux: Mux = Mux::new();
    mux.nest("/v/{ver}/", |r| declare_api(r));
    assert_eq!(mux.path("root", ["ver", "1"]), "/v/1");
    assert_eq!(mux.path("deep-root", ["ver", "1"]), "/v/1/deep");
    assert_eq!(mux.path("deep-file", ["ver", "1", "*", "a/b"]), "/v/1/deep/a/b");
}

#[test]
fn test_last_write_wins_across_mounts() {
    let mut one: Mux = Mux::new();
    one.get("/one", ok).name("same");
    let mut two: Mux = Mux::new();
    two.get("/two", ok).name("same");

    let mut mux: Mux = Mux::new();
    mux.mount("/a", one);
    mux.mount("/b", two);

    assert_eq!(mux.path("same", params![]), "/b/two");
    assert_eq!(mux.route_name(Some(&Method::GET), "/a/one"), None);
}

#[test]
#[should_panic(expected = "route name 'same' is already registered")]
fn test_reject_policy_panics_on_duplicate() {
    let mut mux: Mux = Mux::with_policy(CollisionPolicy::Reject);
    mux.get("/one", ok).name("same");
    mux.get("/two", ok).name("same");
}

#[test]
fn test_try_name_reports_duplicate() {
    let mut mux: Mux = Mux::with_policy(CollisionPolicy::Reject);
    mux.get("/one", ok).name("same");
    let err = mux.get("/two", ok).try_name("same").unwrap_err();

    assert!(err.to_string().contains("'/one'"));
    assert_eq!(mux.path("same", params![]), "/one");
}

#[test]
fn test_full_pattern_of_handle() {
    let mut mux: Mux = Mux::new();
    mux.nest("/v2", |r| {
        let handle = r.get("/things/{id}", ok);
        assert_eq!(handle.full_pattern(), "/v2/things/{id}");
        handle.name("thing");
    });

    assert_eq!(mux.path("thing", ["id", "3"]), "/v2/things/3");

    mux.nest("/v3", |r| {
        let handle = r.get("/", ok);
        assert_eq!(handle.full_pattern(), "/v3");
        handle.name("v3");
    });
    assert_eq!(mux.route_name(Some(&Method::GET), "/v3"), Some("v3"));
}
