//! Transit dashboard server.
//!
//! Polls rail, bus and bikeshare feeds on independent schedules and keeps
//! a reconciled, display-ready view of each configured station, stop and
//! dock.

pub mod bustime;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod gbfs;
pub mod normalize;
pub mod poller;
pub mod reconcile;
pub mod web;
pub mod wmata;
