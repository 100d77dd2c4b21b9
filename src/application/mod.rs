//! Application layer containing the business logic orchestration.
//!
//! `TipSettlement` is the entry point for recording tips; `PaymentService`
//! drives and tracks wallet payments. Both receive their collaborators as
//! boxed ports at construction time and hold no other shared state.

pub mod payments;
pub mod settlement;
