//! Integration tests for command resolution and dispatch.

use std::sync::{Arc, Mutex};

use chatcmd::commands::{
    handler, CommandContext, CommandRegistry, Description, Dispatcher, Handler, ModuleDef,
};
use chatcmd::error::RouterError;
use pretty_assertions::assert_eq;

/// Records `(handler label, arguments)` for every invocation.
#[derive(Clone, Default)]
struct Recorder {
    calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
}

impl Recorder {
    fn handler(&self, label: &str) -> Handler {
        let calls = Arc::clone(&self.calls);
        let label = label.to_string();
        handler(move |ctx| {
            let calls = Arc::clone(&calls);
            let label = label.clone();
            async move {
                calls
                    .lock()
                    .unwrap()
                    .push((label, ctx.arguments().to_vec()));
                Ok(())
            }
        })
    }

    fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

/// Group `g` with children `c1` and `c2`, plus plain `solo`.
fn setup() -> (Dispatcher, Recorder) {
    let recorder = Recorder::default();
    let mut registry = CommandRegistry::new();
    registry
        .register_def(
            ModuleDef::new("group")
                .group("g")
                .default_handler(recorder.handler("g"))
                .command("c1", recorder.handler("c1"))
                .command("c2", recorder.handler("c2")),
        )
        .unwrap()
        .register_def(ModuleDef::new("plain").command("solo", recorder.handler("solo")))
        .unwrap();
    (Dispatcher::new(registry.build()), recorder)
}

fn ctx(args: &[&str]) -> CommandContext {
    CommandContext::detached(args.iter().copied())
}

fn call(label: &str, args: &[&str]) -> (String, Vec<String>) {
    (
        label.to_string(),
        args.iter().map(|s| s.to_string()).collect(),
    )
}

#[tokio::test]
async fn test_routing_rules() {
    let (dispatcher, recorder) = setup();

    dispatcher.execute("solo", ctx(&["a", "b"])).await.unwrap();
    dispatcher.execute("g", ctx(&[])).await.unwrap();
    dispatcher.execute("g", ctx(&["c1"])).await.unwrap();
    dispatcher.execute("g", ctx(&["c1", "x"])).await.unwrap();
    dispatcher
        .execute("g", ctx(&["c2", "x", "y"]))
        .await
        .unwrap();
    dispatcher.execute("g", ctx(&["bogus", "x"])).await.unwrap();

    assert_eq!(
        recorder.calls(),
        vec![
            call("solo", &["a", "b"]),
            call("g", &[]),
            call("c1", &[]),
            call("c1", &["x"]),
            call("c2", &["x", "y"]),
            call("g", &["bogus", "x"]),
        ]
    );
}

#[tokio::test]
async fn test_only_first_token_selects_subcommand() {
    let (dispatcher, recorder) = setup();

    dispatcher.execute("g", ctx(&["x", "c1"])).await.unwrap();

    assert_eq!(recorder.calls(), vec![call("g", &["x", "c1"])]);
}

#[tokio::test]
async fn test_missing_command() {
    let (dispatcher, recorder) = setup();

    let err = dispatcher
        .execute("doesnotexist", ctx(&[]))
        .await
        .unwrap_err();
    assert!(matches!(err, RouterError::CommandNotFound { ref name } if name == "doesnotexist"));

    // Subcommands are only reachable through their group.
    let err = dispatcher.execute("c1", ctx(&[])).await.unwrap_err();
    assert!(matches!(err, RouterError::CommandNotFound { .. }));

    assert!(recorder.calls().is_empty());
}

#[tokio::test]
async fn test_description_reaches_subcommand() {
    #[derive(Debug, PartialEq)]
    struct Caller(&'static str);

    let seen = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&seen);
    let mut registry = CommandRegistry::new();
    registry
        .register_def(ModuleDef::new("g").group("g").command(
            "who",
            handler(move |ctx| {
                let sink = Arc::clone(&sink);
                async move {
                    *sink.lock().unwrap() = ctx.description_as::<Caller>().map(|c| c.0);
                    Ok(())
                }
            }),
        ))
        .unwrap();
    let dispatcher = Dispatcher::new(registry.build());

    let context = CommandContext::new(Description::new(Caller("alice")), ["who"]);
    dispatcher.execute("g", context).await.unwrap();

    assert_eq!(*seen.lock().unwrap(), Some("alice"));
}

#[tokio::test]
async fn test_handler_error_is_returned_unchanged() {
    #[derive(Debug, thiserror::Error)]
    #[error("database unavailable")]
    struct StoreDown;

    let mut registry = CommandRegistry::new();
    registry
        .register_def(
            ModuleDef::new("g")
                .group("g")
                .command("c1", handler(|_| async { Err(anyhow::Error::new(StoreDown)) })),
        )
        .unwrap();
    let dispatcher = Dispatcher::new(registry.build());

    let err = dispatcher.execute("g", ctx(&["c1"])).await.unwrap_err();

    assert_eq!(err.to_string(), "database unavailable");
    match err {
        RouterError::Handler(inner) => assert!(inner.is::<StoreDown>()),
        other => panic!("Expected handler error, got {other:?}"),
    }
}

#[test]
fn test_resolution_is_idempotent() {
    let (dispatcher, _) = setup();
    let inputs: [(&str, &[&str]); 4] = [
        ("solo", &["a"]),
        ("g", &[]),
        ("g", &["c2", "x"]),
        ("g", &["bogus"]),
    ];

    for (name, args) in inputs {
        let first = dispatcher.resolve(name, args).unwrap();
        for _ in 0..3 {
            assert_eq!(dispatcher.resolve(name, args).unwrap(), first);
        }
    }
}

#[tokio::test]
async fn test_group_without_subcommands_routes_like_plain_command() {
    let recorder = Recorder::default();
    let mut registry = CommandRegistry::new();
    registry
        .register_def(
            ModuleDef::new("echo")
                .group("e")
                .default_handler(recorder.handler("e")),
        )
        .unwrap();
    let dispatcher = Dispatcher::new(registry.build());

    dispatcher.execute("e", ctx(&["a", "b"])).await.unwrap();

    assert_eq!(recorder.calls(), vec![call("e", &["a", "b"])]);
    assert_eq!(dispatcher.resolve("e", &["a"]).unwrap().consumed, 0);
}

#[tokio::test]
async fn test_ungrouped_default_handler_is_ignored() {
    let recorder = Recorder::default();
    let mut registry = CommandRegistry::new();
    registry
        .register_def(
            ModuleDef::new("u")
                .default_handler(recorder.handler("u"))
                .command("x", recorder.handler("x")),
        )
        .unwrap();
    let dispatcher = Dispatcher::new(registry.build());

    dispatcher.execute("x", ctx(&["a"])).await.unwrap();

    assert_eq!(recorder.calls(), vec![call("x", &["a"])]);
    assert_eq!(dispatcher.tree().len(), 1);
    let err = dispatcher.resolve::<&str>("u", &[]).unwrap_err();
    assert!(matches!(err, RouterError::CommandNotFound { .. }));
}
