use std::{cell::RefCell, rc::Rc, time::Duration};

use anyhow::Context;
use document::{listener, Document, Event, NodeId};
use hooks::HookRegistry;
use shared::protocol::PortalSignal;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::scenario::{Scenario, Step};

/// Replays scenario steps against a live document and collects a transcript.
///
/// Must run inside a `tokio::task::LocalSet`.
pub struct Runner {
    document: Document,
    registry: HookRegistry,
    transcript: Rc<RefCell<Vec<String>>>,
    step_pause: Duration,
}

impl Runner {
    pub fn new(scenario: &Scenario, step_pause: Duration) -> anyhow::Result<Self> {
        let document =
            Document::from_spec(&scenario.document).context("failed to build scenario document")?;
        Ok(Self {
            document,
            registry: HookRegistry::new(),
            transcript: Rc::new(RefCell::new(Vec::new())),
            step_pause,
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub async fn run(&mut self, steps: &[Step]) -> anyhow::Result<Vec<String>> {
        for (index, step) in steps.iter().enumerate() {
            debug!(step = index + 1, ?step, "running step");
            self.step(step)
                .await
                .with_context(|| format!("step {} failed", index + 1))?;
            if !self.step_pause.is_zero() {
                sleep(self.step_pause).await;
            }
        }
        Ok(self.transcript.borrow().clone())
    }

    async fn step(&mut self, step: &Step) -> anyhow::Result<()> {
        match step {
            Step::Mount { hook, selector } => {
                let element = self.find(selector)?;
                let kind = self
                    .registry
                    .mount(hook, &self.document, element)
                    .with_context(|| format!("failed to mount {hook} on {selector}"))?;
                self.record(format!(
                    "mounted {} on {}",
                    kind.host_name(),
                    self.document.describe(element)
                ));
            }
            Step::Signal { selector, signal } => {
                let element = self.find(selector)?;
                let signal: PortalSignal = signal.parse()?;
                self.document
                    .dispatch_event(element, Event::new(signal.event_kind()))?;
                self.record(format!("signalled {} on {}", signal.event_kind(), selector));
            }
            Step::Dispatch {
                selector,
                event,
                detail,
            } => {
                let element = self.find(selector)?;
                self.document
                    .dispatch_event(element, Event::new(event.as_str()).with_detail(detail.clone()))?;
                self.record(format!("dispatched {event} on {selector}"));
            }
            Step::Observe { selector, event } => {
                let element = self.find(selector)?;
                let transcript = Rc::clone(&self.transcript);
                self.document.add_event_listener(
                    element,
                    event,
                    listener(move |document, event| {
                        let target = event
                            .target()
                            .map(|node| document.describe(node))
                            .unwrap_or_default();
                        transcript.borrow_mut().push(format!(
                            "observed {} at {} from {} detail={}",
                            event.kind(),
                            document.describe(element),
                            target,
                            event.detail()
                        ));
                    }),
                )?;
            }
            Step::Wait { ms } => {
                sleep(Duration::from_millis(*ms)).await;
            }
            Step::Snapshot { selector } => {
                let node = match selector {
                    Some(selector) => self.find(selector)?,
                    None => self.document.root(),
                };
                let html = self.document.outer_html(node);
                self.record(format!("snapshot {html}"));
            }
            Step::Destroy { selector } => {
                let element = self.find(selector)?;
                if self.registry.destroy(element) {
                    self.record(format!("destroyed hook on {selector}"));
                } else {
                    self.record(format!("no hook mounted on {selector}"));
                }
            }
        }
        Ok(())
    }

    fn find(&self, selector: &str) -> anyhow::Result<NodeId> {
        self.document
            .query_selector(selector)
            .with_context(|| format!("invalid selector {selector:?}"))?
            .with_context(|| format!("no element matches {selector:?}"))
    }

    fn record(&self, line: String) {
        info!("{line}");
        self.transcript.borrow_mut().push(line);
    }
}

#[cfg(test)]
#[path = "tests/runner_tests.rs"]
mod tests;
