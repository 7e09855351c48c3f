pub mod auth;
pub mod bids;
pub mod gigs;
pub mod notifications;

use actix_web::web;

use crate::notify::session;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Auth routes (protected by JWT via the AuthenticatedUser extractor) ──
    cfg.service(web::scope("/auth").route("/me", web::get().to(auth::me)));

    // ── Gig routes ──
    cfg.service(
        web::scope("/gigs")
            .route("", web::get().to(gigs::get_gigs))
            .route("", web::post().to(gigs::create_gig))
            .route("/mine", web::get().to(gigs::get_my_gigs))
            .route("/{id}", web::get().to(gigs::get_gig)),
    );

    // ── Bid routes ──
    cfg.service(
        web::scope("/bids")
            .route("", web::get().to(bids::get_bids_for_gig))
            .route("", web::post().to(bids::create_bid))
            .route("/mine", web::get().to(bids::get_my_bids))
            .route("/hire", web::patch().to(bids::hire_bid_from_body))
            .route("/{id}", web::delete().to(bids::withdraw_bid))
            .route("/{id}/hire", web::patch().to(bids::hire_bid)),
    );

    // ── Notification routes ──
    cfg.service(
        web::scope("/notifications")
            .route("", web::get().to(notifications::get_notifications))
            .route("", web::delete().to(notifications::clear_notifications))
            .route("/ws", web::get().to(session::ws_connect))
            .route("/read-all", web::put().to(notifications::mark_all_read))
            .route("/{id}/read", web::put().to(notifications::mark_read)),
    );
}
