use super::creator::Creator;
use super::tip::{Tip, TipperInfo};
use crate::error::{Result, TipError};
use serde::Serialize;

/// A rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Message sent to a creator when a tip lands.
pub struct TipReceivedTemplate;

impl TipReceivedTemplate {
    pub fn render(tip: &Tip, creator: &Creator, tipper: &TipperInfo) -> Result<Notification> {
        let to = creator
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                TipError::Notification(format!(
                    "Creator {} has no contact address",
                    creator.handle
                ))
            })?;

        let subject = format!("You received a {} {} tip!", tip.amount, tip.currency);

        let mut body = format!(
            "Hi {},\n\n{} just sent you {} {}.",
            creator.display_name,
            tipper.display_name(),
            tip.amount,
            tip.currency
        );
        if let Some(message) = &tip.message {
            body.push_str(&format!("\n\nThey wrote: \"{message}\""));
        }
        if let Some(email) = &tipper.email {
            body.push_str(&format!("\n\nYou can reach them at {email}."));
        }
        body.push_str(&format!("\n\nReference: {}", tip.id));

        Ok(Notification {
            to: to.to_string(),
            subject,
            body,
        })
    }
}
