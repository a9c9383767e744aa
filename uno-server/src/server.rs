//! HTTP 服务
//!
//! `POST /ai-move` 总是返回 200，任何失败都降级为摸牌。

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use protocol::{Deal, Deck, GameState, Move};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use uno_ai::LlmEngine;

use crate::config::ServerConfig;

/// 请求间共享的只读状态
pub struct ServerState {
    pub engine: LlmEngine,
}

impl ServerState {
    pub fn new(engine: LlmEngine) -> Self {
        Self { engine }
    }

    /// 按配置创建 HTTP 补全客户端
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let engine = LlmEngine::from_config(config.chat.clone())?;
        Ok(Self::new(engine))
    }
}

/// 构造路由
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/ai-move", post(ai_move))
        .route("/reshuffle", post(reshuffle))
        .route("/healthz", get(healthz))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// 绑定地址并运行到进程退出
pub async fn run(config: ServerConfig) -> Result<()> {
    let state = Arc::new(ServerState::from_config(&config)?);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    info!("Uno AI server listening on http://{}", config.bind_addr);
    info!("API_URL = {}", config.chat.api_url);
    info!("Model = {}", config.chat.model);
    info!("API_KEY set = {}", config.chat.has_api_key());

    axum::serve(listener, router(state))
        .await
        .context("HTTP server error")?;

    Ok(())
}

async fn ai_move(
    State(state): State<Arc<ServerState>>,
    payload: std::result::Result<Json<GameState>, JsonRejection>,
) -> Json<Move> {
    let game = match payload {
        Ok(Json(game)) => game,
        Err(rejection) => {
            warn!("Invalid AI move request, drawing instead: {}", rejection.body_text());
            return Json(Move::Draw);
        }
    };

    Json(state.engine.decide_move(&game).await)
}

async fn reshuffle() -> std::result::Result<Json<Deal>, (StatusCode, String)> {
    let deal = Deck::deal(&mut rand::thread_rng()).map_err(|e| {
        warn!("Failed to deal new game: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    info!("Dealt new game: top_card={}", deal.top_card);
    Ok(Json(deal))
}

async fn healthz() -> &'static str {
    "ok"
}
