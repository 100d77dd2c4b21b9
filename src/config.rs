use std::time::Duration;

pub const DEFAULT_CURRENCY: &str = "USDC";
pub const DEFAULT_CALLBACK_URL: &str = "http://localhost:3000/api/payments/callback";
pub const SUCCESS_MESSAGE: &str = "Tip sent successfully!";

/// Settings for the tip settlement path. Built once at startup.
#[derive(Debug, Clone)]
pub struct SettlementConfig {
    /// Currency code stamped on every tip; tips are single-currency.
    pub currency: String,
    pub success_message: String,
    /// Upper bound on how long a settlement waits for the notifier.
    pub notify_timeout: Duration,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            success_message: SUCCESS_MESSAGE.to_string(),
            notify_timeout: Duration::from_secs(5),
        }
    }
}

/// Settings for driving payments through the provider.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub currency: String,
    /// Where the provider posts asynchronous completion signals.
    pub callback_url: String,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            callback_url: DEFAULT_CALLBACK_URL.to_string(),
        }
    }
}
