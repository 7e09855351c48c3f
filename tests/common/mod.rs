//! Shared fixtures: an in-memory SQLite database with the marketplace schema
//! and a notifier that records what it was asked to deliver.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tokio::sync::mpsc;
use uuid::Uuid;

use gigflow_backend::market::{HireEngine, gigs as gig_service, ledger};
use gigflow_backend::models::bids::{self, NewBid};
use gigflow_backend::models::gigs::{self, CreateGig};
use gigflow_backend::notify::{NotificationDispatcher, NotificationEvent, Notifier, NotifyError};

/// A fresh in-memory database with every migration applied.
///
/// The pool holds exactly one connection: every `:memory:` connection is its
/// own database, and a single connection also means concurrent transactions
/// queue for it, which is how SQLite serializes writers anyway.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory SQLite");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub async fn post_gig(db: &DatabaseConnection, owner_id: Uuid, title: &str) -> gigs::Model {
    gig_service::create_gig(
        db,
        owner_id,
        CreateGig {
            title: title.to_string(),
            description: format!("{title}, details inside"),
            budget: 1000.0,
        },
    )
    .await
    .expect("Failed to post gig")
}

pub async fn place_bid(
    db: &DatabaseConnection,
    gig_id: Uuid,
    freelancer_id: Uuid,
    price: f64,
) -> bids::Model {
    ledger::submit_bid(
        db,
        NewBid {
            gig_id,
            freelancer_id,
            message: "I can do this in a week".to_string(),
            price,
        },
    )
    .await
    .expect("Failed to place bid")
}

/// Forwards every delivery into a channel the test can read.
pub struct RecordingNotifier {
    tx: mpsc::UnboundedSender<(Uuid, NotificationEvent)>,
}

impl Notifier for RecordingNotifier {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn deliver<'a>(
        &'a self,
        user_id: Uuid,
        event: &'a NotificationEvent,
    ) -> BoxFuture<'a, Result<(), NotifyError>> {
        Box::pin(async move {
            self.tx
                .send((user_id, event.clone()))
                .map_err(|_| NotifyError::Closed)
        })
    }
}

/// Always fails, like a push channel that is down.
pub struct BrokenNotifier;

impl Notifier for BrokenNotifier {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn deliver<'a>(
        &'a self,
        _user_id: Uuid,
        _event: &'a NotificationEvent,
    ) -> BoxFuture<'a, Result<(), NotifyError>> {
        Box::pin(async { Err(NotifyError::Closed) })
    }
}

pub fn recording_engine(
    db: &DatabaseConnection,
) -> (HireEngine, mpsc::UnboundedReceiver<(Uuid, NotificationEvent)>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let sinks: Vec<Arc<dyn Notifier>> = vec![Arc::new(RecordingNotifier { tx })];
    (
        HireEngine::new(db.clone(), NotificationDispatcher::new(sinks)),
        rx,
    )
}

/// Wait briefly for the next delivery; `None` if nothing arrives.
pub async fn next_delivery(
    rx: &mut mpsc::UnboundedReceiver<(Uuid, NotificationEvent)>,
) -> Option<(Uuid, NotificationEvent)> {
    tokio::time::timeout(Duration::from_millis(200), rx.recv())
        .await
        .ok()
        .flatten()
}
