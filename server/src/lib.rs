#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Community boss counter service.
//!
//! Keeps one shared hit-point counter that every running client chips away
//! at. The counter is initialized lazily on first access, attacks are clamped
//! server-side, and the hit points never drop below zero.

use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::{Arc, Mutex};

/// Identifier of the single shared boss.
pub const BOSS_ID: &str = "global-boss-1";

/// Hit-point ceiling of the shared boss.
pub const BOSS_MAX_HP: u32 = 1000;

/// Attack amount applied when the request carries none.
pub const DEFAULT_ATTACK_AMOUNT: u32 = 10;

/// Smallest attack the service will apply.
pub const MIN_ATTACK_AMOUNT: u32 = 1;

/// Largest attack the service will apply.
pub const MAX_ATTACK_AMOUNT: u32 = 25;

/// Clamps a client-supplied attack amount into the permitted band.
///
/// Whole hit points are the service's unit: a fractional amount is truncated
/// toward zero before the clamp. A missing or non-finite amount falls back to
/// the default so a malformed request can never corrupt the counter.
#[must_use]
pub fn clamp_attack_amount(amount: Option<f64>) -> u32 {
    let Some(amount) = amount else {
        return DEFAULT_ATTACK_AMOUNT;
    };
    if !amount.is_finite() {
        return DEFAULT_ATTACK_AMOUNT;
    }

    (amount as u32).clamp(MIN_ATTACK_AMOUNT, MAX_ATTACK_AMOUNT)
}

/// Shared hit-point counter backing the boss endpoints.
///
/// The slot starts empty and snaps to [`BOSS_MAX_HP`] the first time any
/// endpoint touches it, mirroring a counter that is created on demand.
#[derive(Debug, Default)]
pub struct CounterStore {
    hp: Mutex<Option<u32>>,
}

impl CounterStore {
    /// Creates a store whose counter has not been initialized yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the current hit points, initializing the counter if needed.
    #[must_use]
    pub fn snapshot(&self) -> u32 {
        let mut slot = self.hp.lock().unwrap_or_else(|e| e.into_inner());
        *slot.get_or_insert(BOSS_MAX_HP)
    }

    /// Applies a clamped attack and returns the remaining hit points.
    ///
    /// Hit points floor at zero; further attacks leave the counter there.
    #[must_use]
    pub fn apply_attack(&self, amount: u32) -> u32 {
        let mut slot = self.hp.lock().unwrap_or_else(|e| e.into_inner());
        let hp = slot.get_or_insert(BOSS_MAX_HP);
        *hp = hp.saturating_sub(amount);
        *hp
    }
}

/// Shared state handed to every request handler.
#[derive(Debug, Default)]
pub struct AppState {
    /// Counter backing the boss endpoints.
    pub store: CounterStore,
}

/// Builds the service router with all boss endpoints registered.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/boss/status", get(boss_status))
        .route("/api/boss/attack", post(boss_attack))
        .with_state(Arc::new(state))
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct BossStatusBody {
    #[serde(rename = "type")]
    kind: &'static str,
    boss_id: &'static str,
    hp: u32,
    max_hp: u32,
}

async fn boss_status(State(state): State<Arc<AppState>>) -> Json<BossStatusBody> {
    let hp = state.store.snapshot();
    log::debug!("boss status requested: {hp}/{BOSS_MAX_HP}");

    Json(BossStatusBody {
        kind: "boss_status",
        boss_id: BOSS_ID,
        hp,
        max_hp: BOSS_MAX_HP,
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct BossAttackBody {
    #[serde(rename = "type")]
    kind: &'static str,
    boss_id: &'static str,
    hp: u32,
    max_hp: u32,
    amount: u32,
}

/// Clients may post an empty body, a bare `{}`, or `{"amount": n}`; anything
/// unreadable degrades to the default amount rather than a rejection.
async fn boss_attack(State(state): State<Arc<AppState>>, body: Bytes) -> Json<BossAttackBody> {
    let requested = serde_json::from_slice::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| value.get("amount").and_then(serde_json::Value::as_f64));
    let amount = clamp_attack_amount(requested);
    let hp = state.store.apply_attack(amount);
    log::debug!("boss attacked for {amount}, now {hp}/{BOSS_MAX_HP}");

    Json(BossAttackBody {
        kind: "boss_attack",
        boss_id: BOSS_ID,
        hp,
        max_hp: BOSS_MAX_HP,
        amount,
    })
}
