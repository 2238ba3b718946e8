//! Continuous monitoring: controller state machine, the service task that
//! drives it, and the handle the dashboard talks to.

pub mod controller;
pub mod service;


pub use controller::{
    format_uptime, DashboardSnapshot, DegradedNotice, Lifecycle, ModeBanner, MonitorController,
    MonitorSettings, TickTicket, TimerCommand,
};
pub use service::{Command, MonitorHandle, MonitorService};
