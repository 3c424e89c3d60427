//! Hardware-independent core library for the sensor panel
//!
//! This crate contains all platform-agnostic logic for the panel firmware:
//! joystick direction classification, temperature conversion, button
//! latches, sensor capability traits, HTML page rendering, the per-connection
//! request handler and the startup state machine.
//!
//! It is `#![no_std]` so it compiles on both embedded targets (ESP32-S3) and
//! desktop hosts (for the simulator and tests).

#![cfg_attr(not(test), no_std)]

pub mod app_state;
pub mod config;
pub mod direction;
pub mod latch;
pub mod pages;
pub mod sensors;
pub mod server;
pub mod temperature;
