use super::*;

use std::path::Path;

use tokio::task::LocalSet;

fn bundled() -> Scenario {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios/modal.toml");
    Scenario::load(&path).expect("bundled scenario")
}

#[tokio::test(start_paused = true)]
async fn replays_the_bundled_scenario() {
    LocalSet::new()
        .run_until(async {
            let scenario = bundled();
            let mut runner = Runner::new(&scenario, Duration::ZERO).expect("runner");

            let transcript = runner.run(&scenario.steps).await.expect("run");

            assert_eq!(
                transcript,
                vec![
                    "mounted Swish.Portal on template#account-menu".to_string(),
                    "mounted Swish.Toast on div#flash".into(),
                    "signalled portal:open on #account-menu".into(),
                    concat!(
                        r#"snapshot <div id="overlay"><ul class="dropdown">"#,
                        r#"<li id="sign-out">Sign out</li></ul></div>"#
                    )
                    .into(),
                    r#"observed click at nav#toolbar from template#account-menu detail={"button":0}"#
                        .into(),
                    "dispatched click on #overlay #sign-out".into(),
                    "signalled portal:close on #account-menu".into(),
                    concat!(
                        r#"snapshot <body><nav id="toolbar">"#,
                        r##"<template data-close-delay="200" data-target="#overlay" "##,
                        r#"data-update="inside-target" id="account-menu">"#,
                        r#"<ul class="dropdown"><li id="sign-out">Sign out</li></ul>"#,
                        r#"</template></nav><div id="overlay"></div></body>"#
                    )
                    .into(),
                    "destroyed hook on #account-menu".into(),
                ]
            );
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn failing_step_reports_its_position() {
    LocalSet::new()
        .run_until(async {
            let scenario = Scenario::parse(
                r##"
[document]
tag = "body"

[[document.children]]
tag = "template"
attrs = { id = "menu", "data-close-delay" = "10" }

[[steps]]
action = "snapshot"

[[steps]]
action = "mount"
hook = "Swish.Portal"
selector = "#menu"
"##,
            )
            .expect("scenario");
            let mut runner = Runner::new(&scenario, Duration::ZERO).expect("runner");

            let err = runner.run(&scenario.steps).await.expect_err("mount should fail");

            assert_eq!(err.to_string(), "step 2 failed");
            assert!(format!("{err:#}").contains("missing attribute 'data-target'"));
            assert_eq!(runner.document().listener_count(runner.document().root()), 0);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn unknown_signal_is_an_error() {
    LocalSet::new()
        .run_until(async {
            let scenario = Scenario::parse(
                r#"
[document]
tag = "template"

[[steps]]
action = "signal"
selector = "template"
signal = "toggle"
"#,
            )
            .expect("scenario");
            let mut runner = Runner::new(&scenario, Duration::ZERO).expect("runner");

            let err = runner.run(&scenario.steps).await.expect_err("signal should fail");

            assert_eq!(err.to_string(), "step 1 failed");
            assert!(format!("{err:#}").contains("unknown portal signal 'toggle'"));
        })
        .await;
}
