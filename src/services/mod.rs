//! Services that sit between the routes and the dashboard session.
//!
//! ARCHITECTURE
//! ============
//! Both services own the only suspending work in the process (reading the
//! dataset and calling the completion API) and report their outcomes by
//! dispatching actions into the dashboard. Route handlers stay focused on
//! protocol translation.

pub mod chat;
pub mod loader;
