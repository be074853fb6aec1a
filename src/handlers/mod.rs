pub mod contracts;
pub mod expenses;
pub mod payments;
pub mod summaries;

use actix_web::web;
use uuid::Uuid;

use crate::cache::{self, RedisCache};

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Contract registry (all protected — require valid JWT) ──
    cfg.service(
        web::scope("/contracts")
            .route("", web::post().to(contracts::create_contract))
            .route("/{id}", web::get().to(contracts::get_contract))
            .route("/{id}/status", web::put().to(contracts::update_status)),
    );

    // ── Expense ledger ──
    cfg.service(
        web::scope("/expenses")
            .route("", web::post().to(expenses::add_expense))
            .route("/{id}", web::get().to(expenses::get_expense))
            .route("/{id}", web::put().to(expenses::update_expense))
            .route("/{id}", web::delete().to(expenses::delete_expense)),
    );

    // ── Payment ledger ──
    cfg.service(
        web::scope("/payments")
            .route("", web::post().to(payments::add_payment))
            .route("/{id}", web::put().to(payments::update_payment))
            .route("/{id}", web::delete().to(payments::delete_payment))
            .route("/{id}/confirm", web::post().to(payments::confirm_payment))
            .route("/{id}/dispute", web::post().to(payments::dispute_payment)),
    );

    // ── Per-project reads and summaries ──
    cfg.service(
        web::scope("/projects/{id}")
            .route(
                "/contracts",
                web::get().to(contracts::get_contracts_by_project),
            )
            .route("/expenses", web::get().to(expenses::list_expenses))
            .route(
                "/expenses/summary",
                web::get().to(summaries::get_expense_summary),
            )
            .route("/payments", web::get().to(payments::list_payments))
            .route(
                "/payments/summary",
                web::get().to(summaries::get_payment_summary),
            ),
    );
}

/// Drop every cached summary for a project after a ledger mutation.
///
/// Cache trouble must never fail the mutation that already landed, so
/// errors are logged and swallowed.
pub(crate) async fn invalidate_project_summaries(cache: &RedisCache, project_id: Uuid) {
    if let Err(e) = cache
        .delete_pattern(&cache::keys::project_pattern(project_id))
        .await
    {
        tracing::warn!("failed to invalidate summary cache for project {project_id}: {e}");
    }
}
