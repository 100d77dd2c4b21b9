use crate::domain::payment::{PaymentHandle, PaymentReceipt, PaymentRequest, PaymentStatus};
use crate::domain::ports::PaymentProvider;
use crate::error::{Result, TipError};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

fn provider_error(context: &str, err: impl std::fmt::Display) -> TipError {
    TipError::PaymentProvider(format!("{context}: {err}"))
}

/// Payment provider reached over HTTP.
///
/// * `POST {base}/payments` with a `PaymentRequest` body returns a `PaymentReceipt`.
/// * `GET {base}/payments/{id}` returns `{ "status": ... }`.
///
/// Every failure (transport, timeout, non-2xx status, malformed body) is
/// reported as `TipError::PaymentProvider`. Initiation is not idempotent,
/// so nothing here retries.
#[derive(Clone)]
pub struct HttpPaymentProvider {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct StatusBody {
    status: PaymentStatus,
}

impl HttpPaymentProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()
            .map_err(|e| provider_error("failed to build HTTP client", e))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PaymentProvider for HttpPaymentProvider {
    async fn initiate_payment(&self, request: &PaymentRequest) -> Result<PaymentReceipt> {
        let url = format!("{}/payments", self.base_url);
        debug!(%url, recipient = %request.recipient_address, "initiating payment");

        self.client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| provider_error("initiate request failed", e))?
            .error_for_status()
            .map_err(|e| provider_error("initiate rejected", e))?
            .json::<PaymentReceipt>()
            .await
            .map_err(|e| provider_error("malformed initiate response", e))
    }

    async fn get_payment_status(&self, handle: &PaymentHandle) -> Result<PaymentStatus> {
        let url = format!("{}/payments/{}", self.base_url, handle);

        let body = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| provider_error("status request failed", e))?
            .error_for_status()
            .map_err(|e| provider_error("status rejected", e))?
            .json::<StatusBody>()
            .await
            .map_err(|e| provider_error("malformed status response", e))?;

        Ok(body.status)
    }
}

/// In-process stand-in for a wallet provider.
///
/// Every initiation is accepted as `Pending`; `set_status` moves a payment
/// along the way a real provider's callback would.
#[derive(Default, Clone)]
pub struct SimulatedPaymentProvider {
    payments: Arc<RwLock<HashMap<PaymentHandle, PaymentStatus>>>,
}

impl SimulatedPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_status(&self, handle: &PaymentHandle, status: PaymentStatus) -> Result<()> {
        let mut payments = self.payments.write().await;
        match payments.get_mut(handle) {
            Some(current) => {
                *current = status;
                Ok(())
            }
            None => Err(TipError::PaymentProvider(format!(
                "unknown payment {handle}"
            ))),
        }
    }
}

#[async_trait]
impl PaymentProvider for SimulatedPaymentProvider {
    async fn initiate_payment(&self, request: &PaymentRequest) -> Result<PaymentReceipt> {
        let handle = PaymentHandle::from(format!("pay-{}", Uuid::new_v4().simple()));
        debug!(
            payment_id = %handle,
            amount = %request.amount,
            recipient = %request.recipient_address,
            "simulated payment initiated"
        );

        let mut payments = self.payments.write().await;
        payments.insert(handle.clone(), PaymentStatus::Pending);

        Ok(PaymentReceipt {
            payment_id: handle,
            status: PaymentStatus::Pending,
        })
    }

    async fn get_payment_status(&self, handle: &PaymentHandle) -> Result<PaymentStatus> {
        let payments = self.payments.read().await;
        payments
            .get(handle)
            .copied()
            .ok_or_else(|| TipError::PaymentProvider(format!("unknown payment {handle}")))
    }
}
