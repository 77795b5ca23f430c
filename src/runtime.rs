//! Effect runtime
//!
//! Executes the [`Effect`]s produced by [`App`] on tokio tasks and hands
//! their [`Completion`]s back as the tasks finish. Completions are applied one
//! at a time by whoever owns the `App`, so state is only ever mutated from the
//! control loop; tasks never see it.

use std::sync::Arc;
use std::time::Instant;

use tokio::task::{JoinError, JoinSet};

use crate::api::TmdbClient;
use crate::app::App;
use crate::cascade::CascadeQuery;
use crate::effect::{CascadePayload, Completion, Effect};

/// Run one effect against the catalog
pub async fn execute(client: &TmdbClient, effect: Effect) -> Completion {
    match effect {
        Effect::FetchList { ticket } => Completion::List {
            result: client.list(ticket.filter).await,
            ticket,
        },
        Effect::Search { ticket } => {
            let result = client.search(&ticket.query).await;
            Completion::Search { ticket, result }
        }
        Effect::Cascade { ticket, query } => {
            let id = ticket.movie_id;
            let payload = match query {
                CascadeQuery::Detail => CascadePayload::Detail(client.movie_detail(id).await),
                CascadeQuery::Credits => CascadePayload::Credits(client.credits(id).await),
                CascadeQuery::Reviews => CascadePayload::Reviews(client.reviews(id).await),
                CascadeQuery::Similar => CascadePayload::Similar(client.similar(id).await),
            };
            Completion::Cascade { ticket, payload }
        }
        Effect::FetchPopular { ticket, page } => Completion::Popular {
            result: client.popular(page).await,
            ticket,
        },
    }
}

/// Spawns effects and collects their completions
#[derive(Debug)]
pub struct Runtime {
    client: Arc<TmdbClient>,
    tasks: JoinSet<Completion>,
}

impl Runtime {
    pub fn new(client: TmdbClient) -> Self {
        Self {
            client: Arc::new(client),
            tasks: JoinSet::new(),
        }
    }

    /// Requests spawned but not yet applied
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Spawn a task per effect
    pub fn dispatch(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            tracing::trace!(?effect, "spawning effect");
            let client = Arc::clone(&self.client);
            self.tasks.spawn(async move { execute(&client, effect).await });
        }
    }

    fn deliver(&mut self, app: &mut App, joined: Result<Completion, JoinError>) {
        match joined {
            Ok(completion) => {
                let follow_up = app.apply(completion);
                self.dispatch(follow_up);
            }
            // The request is dropped; its section keeps whatever it showed
            Err(e) => tracing::error!(error = %e, "effect task did not complete"),
        }
    }

    /// Apply every completion that has already arrived; never blocks
    pub fn pump(&mut self, app: &mut App) -> usize {
        let mut applied = 0;
        while let Some(joined) = self.tasks.try_join_next() {
            self.deliver(app, joined);
            applied += 1;
        }
        applied
    }

    /// Drive `app` until no request is in flight and no timer is armed
    ///
    /// Used by the CLI and by tests; the TUI interleaves [`pump`](Self::pump)
    /// with input handling instead.
    pub async fn settle(&mut self, app: &mut App) {
        loop {
            let due = app.tick(Instant::now());
            self.dispatch(due);

            if let Some(joined) = self.tasks.join_next().await {
                self.deliver(app, joined);
                continue;
            }

            match app.next_deadline() {
                Some(deadline) => {
                    tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await
                }
                None => break,
            }
        }
    }
}
