use std::str::FromStr;

use anyhow::Context;
use chrono::Utc;
use cron::Schedule;
use futures::{stream::FuturesUnordered, StreamExt};

use crate::{
    services::maintenance::{traits::MaintenanceClient as _, MaintenanceClient, MaintenanceState},
    SharedState,
};

/// A recurring maintenance call: a cron schedule paired with the endpoint it
/// fires. Built once at startup, never mutated.
#[derive(Clone, Debug)]
pub struct Trigger {
    pub name: String,
    pub endpoint: String,
    pub schedule: Schedule,
}

impl Trigger {
    pub fn new(name: &str, endpoint: &str, expression: &str) -> anyhow::Result<Self> {
        let schedule = Schedule::from_str(expression)
            .with_context(|| format!("invalid cron expression for {name}: {expression}"))?;

        Ok(Self {
            name: name.into(),
            endpoint: endpoint.into(),
            schedule,
        })
    }
}

pub fn triggers() -> anyhow::Result<Vec<Trigger>> {
    Ok(vec![
        // run file cleanup every hour
        Trigger::new("file cleanup", "cleanup-files", "0 0 * * * *")?,
        // check subscriptions every 12 hours
        Trigger::new("subscription check", "check-subscriptions", "0 0 */12 * * *")?,
    ])
}

/// Serves a single trigger for the lifetime of the process: sleep until the
/// next occurrence, fire the endpoint, repeat. Every firing runs as its own
/// task, so a slow call can overlap the next occurrence.
pub async fn serve_trigger(state: &SharedState, trigger: Trigger) -> anyhow::Result<()> {
    loop {
        let Some(next) = trigger.schedule.upcoming(Utc).next() else {
            anyhow::bail!("no upcoming runs for {}", trigger.name);
        };

        let wait = (next - Utc::now())
            .to_std()
            .unwrap_or(std::time::Duration::ZERO);
        tokio::time::sleep(wait).await;

        tracing::info!("running {}", trigger.name);

        let client = state.maintenance();
        let endpoint = trigger.endpoint.clone();
        tokio::spawn(async move {
            client.trigger(&endpoint).await;
        });
    }
}

/// Fires every trigger's endpoint once, concurrently. Used at process start,
/// outside the recurring schedule.
pub async fn run_startup(client: &MaintenanceClient, triggers: &[Trigger]) {
    let mut calls = FuturesUnordered::new();

    for trigger in triggers {
        calls.push(client.trigger(&trigger.endpoint));
    }

    while calls.next().await.is_some() {}
}
