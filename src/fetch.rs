use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use tracing::warn;

use crate::api_client::{HpoApiClient, NetworkError, Relation};
use crate::detail::{CoreOutcome, DetailData, DetailRequest};
use crate::term::Term;

/// A completed background fetch, tagged with the query or id it was issued
/// for so the controllers can drop anything stale.
pub enum FetchEvent {
    SearchDone {
        query: String,
        result: Result<Vec<Term>, NetworkError>,
    },
    DetailDone {
        id: String,
        data: DetailData,
    },
}

/// Runs network calls on short-lived worker threads and hands results back
/// to the event loop over a channel. One thread per user-triggered fetch;
/// no cancellation — late results are filtered out by the controllers.
pub struct Fetcher {
    client: HpoApiClient,
    tx: Sender<FetchEvent>,
    rx: Receiver<FetchEvent>,
}

impl Fetcher {
    pub fn new(client: HpoApiClient) -> Self {
        let (tx, rx) = channel();
        Self { client, tx, rx }
    }

    pub fn spawn_search(&self, query: String) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = client.search(&query);
            // The receiver only drops on shutdown.
            let _ = tx.send(FetchEvent::SearchDone { query, result });
        });
    }

    /// Run the combined detail fetch for one overlay open. All four calls
    /// finish before a single payload is posted, so the overlay sections
    /// leave their loading placeholders together.
    pub fn spawn_detail(&self, request: DetailRequest) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        thread::spawn(move || {
            let id = request.id.clone();
            let data = fetch_detail(&client, &request);
            let _ = tx.send(FetchEvent::DetailDone { id, data });
        });
    }

    /// Non-blocking poll from the event loop tick.
    pub fn try_recv(&self) -> Option<FetchEvent> {
        self.rx.try_recv().ok()
    }
}

fn fetch_detail(client: &HpoApiClient, request: &DetailRequest) -> DetailData {
    let id = request.id.as_str();

    let core = if request.need_core {
        match client.fetch_term_core(id) {
            Ok(core) => CoreOutcome::Fetched(core),
            Err(e) => {
                warn!(target: "detail", id, error = %e, "core fetch failed");
                CoreOutcome::Failed
            }
        }
    } else {
        CoreOutcome::Skipped
    };

    let annotations = client
        .fetch_annotations(id)
        .map_err(|e| warn!(target: "detail", id, error = %e, "annotation fetch failed"))
        .ok();
    let parents = client
        .fetch_related(id, Relation::Parents)
        .map_err(|e| warn!(target: "detail", id, error = %e, "parent fetch failed"))
        .ok();
    let children = client
        .fetch_related(id, Relation::Children)
        .map_err(|e| warn!(target: "detail", id, error = %e, "child fetch failed"))
        .ok();

    DetailData {
        core,
        annotations,
        parents,
        children,
    }
}
