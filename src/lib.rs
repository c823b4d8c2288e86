//! Weather Profile Bot Library
//!
//! A Telegram bot that resolves city names to current weather and
//! keeps a per-user profile.
//!
//! This crate provides the core functionality for:
//! - Resolving free-text or menu-selected cities via OpenWeatherMap
//! - Persisting per-user profiles (name, pinned city, query history)
//! - Driving the menu-based conversation state machine
//! - Binding the controller to the Telegram Bot API

pub mod cities;
pub mod config;
pub mod dialogue;
pub mod storage;
pub mod telegram;
pub mod weather;
