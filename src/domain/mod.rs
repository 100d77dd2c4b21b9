//! Domain layer: value objects, entities and the ports the application drives.

pub mod amount;
pub mod creator;
pub mod notification;
pub mod payment;
pub mod ports;
pub mod tip;
