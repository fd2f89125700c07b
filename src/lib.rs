//! Reservation Checkout - client-side lifecycle controller for ticket and
//! subscription reservations.
//!
//! Keeps a buyer on the one view that matches the backend's reservation
//! status, drives payment providers to completion, waits out slow gateway
//! confirmations and transparently solves anti-bot challenges on every
//! backend call.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
