pub mod error;

mod claim_fees;
mod get_pools;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    routing::{get, post},
    Router,
};

use crate::{builder::TransactionBuilder, onchain::dbc::BondingCurve};

#[derive(Clone)]
pub struct AppState {
    pub builder: Arc<TransactionBuilder>,
    pub curve: Arc<dyn BondingCurve>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/claim-fees", post(claim_fees::claim_fees))
        .route("/api/get-pools", get(get_pools::get_pools))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> eyre::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Claim API listening on http://{addr}");

    axum::serve(listener, router(state)).await?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::builder::{
        tests::{MockCurve, MockLedger},
        InFlightClaims,
    };
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use std::time::Duration;
    use tower::ServiceExt;

    pub(crate) fn app(ledger: Arc<MockLedger>, curve: Arc<MockCurve>) -> Router {
        let builder = TransactionBuilder::new(
            ledger,
            curve.clone(),
            InFlightClaims::new(Duration::from_secs(30)),
        );

        router(AppState {
            builder: Arc::new(builder),
            curve,
        })
    }

    pub(crate) async fn send(
        app: Router,
        request: Request<Body>,
    ) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }
}
