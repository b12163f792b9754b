//! ATP Membership - Lifecycle & Eligibility Engine
//!
//! This crate implements the membership subsystem of the ATP storefront:
//! status transitions, discount computation, renewal pricing, scheduled
//! expiration/reminder sweeps, and payment-event-driven updates.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
