//! Read-side projections and the notification log.
//!
//! Run with: `cargo test --test queries_test`

mod common;

use std::sync::Arc;

use uuid::Uuid;

use common::{place_bid, post_gig, setup_db};
use gigflow_backend::db::bids as bid_db;
use gigflow_backend::db::gigs as gig_db;
use gigflow_backend::db::notifications as notification_db;
use gigflow_backend::market::HireEngine;
use gigflow_backend::models::bids::BidStatus;
use gigflow_backend::models::gigs::{GigListQuery, GigStatus, MAX_PAGE};
use gigflow_backend::notify::{NotificationDispatcher, NotificationEvent, NotificationLog, Notifier};

#[tokio::test]
async fn gigs_are_filtered_by_status_and_search_term() {
    let db = setup_db().await;
    let (engine, _deliveries) = common::recording_engine(&db);
    let owner = Uuid::new_v4();

    let logo = post_gig(&db, owner, "Logo for a bakery").await;
    let app = post_gig(&db, owner, "Mobile app prototype").await;
    let landing = post_gig(&db, owner, "Landing page LOGO refresh").await;

    let bid = place_bid(&db, app.id, Uuid::new_v4(), 800.0).await;
    engine.hire(bid.id, owner).await.unwrap();

    let open = gig_db::list_gigs(
        &db,
        &GigListQuery {
            status: Some(GigStatus::Open),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    // Newest first.
    assert_eq!(
        open.iter().map(|g| g.id).collect::<Vec<_>>(),
        vec![landing.id, logo.id]
    );

    let assigned = gig_db::list_gigs(
        &db,
        &GigListQuery {
            status: Some(GigStatus::Assigned),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].id, app.id);

    let searched = gig_db::list_gigs(
        &db,
        &GigListQuery {
            search: Some("  logo ".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(searched.len(), 2);

    // Descriptions are searched too.
    let by_description = gig_db::list_gigs(
        &db,
        &GigListQuery {
            search: Some("details inside".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_description.len(), 3);
}

#[tokio::test]
async fn gig_listing_is_paginated() {
    let db = setup_db().await;
    let owner = Uuid::new_v4();
    for i in 0..5 {
        post_gig(&db, owner, &format!("Gig {i}")).await;
    }

    let page = |page| GigListQuery {
        page: Some(page),
        limit: Some(2),
        ..Default::default()
    };

    assert_eq!(gig_db::list_gigs(&db, &page(1)).await.unwrap().len(), 2);
    assert_eq!(gig_db::list_gigs(&db, &page(3)).await.unwrap().len(), 1);
    assert!(gig_db::list_gigs(&db, &page(4)).await.unwrap().is_empty());
}

#[tokio::test]
async fn wildcards_in_the_search_term_match_literally() {
    let db = setup_db().await;
    let owner = Uuid::new_v4();
    let discount = post_gig(&db, owner, "Banner 50% off").await;
    post_gig(&db, owner, "Banner 500 pieces").await;
    let snake = post_gig(&db, owner, "Rename snake_case fields").await;
    post_gig(&db, owner, "Rename snakeXcase fields").await;

    let search = |term: &str| GigListQuery {
        search: Some(term.to_string()),
        ..Default::default()
    };

    let found = gig_db::list_gigs(&db, &search("50%")).await.unwrap();
    assert_eq!(found.iter().map(|g| g.id).collect::<Vec<_>>(), vec![discount.id]);

    let found = gig_db::list_gigs(&db, &search("snake_case")).await.unwrap();
    assert_eq!(found.iter().map(|g| g.id).collect::<Vec<_>>(), vec![snake.id]);
}

#[tokio::test]
async fn out_of_range_page_is_empty() {
    let db = setup_db().await;
    post_gig(&db, Uuid::new_v4(), "Only gig").await;

    let query = GigListQuery {
        page: Some(u64::MAX),
        limit: Some(100),
        ..Default::default()
    };
    assert_eq!(query.page(), MAX_PAGE);
    assert!(gig_db::list_gigs(&db, &query).await.unwrap().is_empty());
}

#[test]
fn list_query_defaults_are_clamped() {
    let query = GigListQuery {
        page: Some(0),
        limit: Some(1000),
        search: Some("   ".to_string()),
        ..Default::default()
    };
    assert_eq!(query.page(), 1);
    assert_eq!(query.limit(), 100);
    assert_eq!(query.search_term(), None);
}

#[tokio::test]
async fn my_gigs_and_my_bids() {
    let db = setup_db().await;
    let owner = Uuid::new_v4();
    let someone_else = Uuid::new_v4();
    let freelancer = Uuid::new_v4();

    let mine = post_gig(&db, owner, "Mine").await;
    let theirs = post_gig(&db, someone_else, "Theirs").await;

    let gigs = gig_db::get_gigs_by_owner_id(&db, owner).await.unwrap();
    assert_eq!(gigs.iter().map(|g| g.id).collect::<Vec<_>>(), vec![mine.id]);

    let on_mine = place_bid(&db, mine.id, freelancer, 100.0).await;
    let on_theirs = place_bid(&db, theirs.id, freelancer, 200.0).await;
    place_bid(&db, theirs.id, Uuid::new_v4(), 300.0).await;

    let bids = bid_db::get_bids_by_freelancer_id(&db, freelancer).await.unwrap();
    assert_eq!(bids.len(), 2);
    assert_eq!(bids[0].bid.id, on_theirs.id);
    assert_eq!(bids[0].gig.as_ref().map(|g| g.id), Some(theirs.id));
    assert_eq!(bids[1].bid.id, on_mine.id);
    assert_eq!(bids[1].gig.as_ref().map(|g| g.title.as_str()), Some("Mine"));
}

#[tokio::test]
async fn hire_is_recorded_in_the_notification_log() {
    let db = setup_db().await;
    let sinks: Vec<Arc<dyn Notifier>> = vec![Arc::new(NotificationLog::new(db.clone()))];
    let engine = HireEngine::new(db.clone(), NotificationDispatcher::new(sinks));
    let owner = Uuid::new_v4();
    let gig = post_gig(&db, owner, "Podcast edit").await;
    let bid = place_bid(&db, gig.id, Uuid::new_v4(), 120.0).await;

    engine.hire(bid.id, owner).await.unwrap();

    // Delivery happens on a background task.
    let mut logged = Vec::new();
    for _ in 0..50 {
        logged = notification_db::get_notifications_by_user_id(&db, bid.freelancer_id)
            .await
            .unwrap();
        if !logged.is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }

    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].gig_id, gig.id);
    assert_eq!(logged[0].bid_id, bid.id);
    assert!(!logged[0].is_read);

    let hired = bid_db::get_bid_by_id(&db, bid.id).await.unwrap().unwrap();
    assert_eq!(hired.status, BidStatus::Hired);
}

#[tokio::test]
async fn notifications_can_be_read_and_cleared() {
    let db = setup_db().await;
    let log = NotificationLog::new(db.clone());
    let user = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let gig = post_gig(&db, Uuid::new_v4(), "Anything").await;

    for title in ["First", "Second", "Third"] {
        log.deliver(user, &NotificationEvent::hired(gig.id, Uuid::new_v4(), title))
            .await
            .unwrap();
    }

    let listed = notification_db::get_notifications_by_user_id(&db, user).await.unwrap();
    assert_eq!(listed.len(), 3);
    assert!(listed[0].message.contains("Third"));

    assert!(!notification_db::mark_as_read(&db, listed[0].id, stranger).await.unwrap());
    assert!(notification_db::mark_as_read(&db, listed[0].id, user).await.unwrap());
    assert_eq!(notification_db::mark_all_as_read(&db, user).await.unwrap(), 2);

    let listed = notification_db::get_notifications_by_user_id(&db, user).await.unwrap();
    assert!(listed.iter().all(|n| n.is_read));

    assert_eq!(notification_db::clear_for_user(&db, user).await.unwrap(), 3);
    assert!(
        notification_db::get_notifications_by_user_id(&db, user)
            .await
            .unwrap()
            .is_empty()
    );
}
