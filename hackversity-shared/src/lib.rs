#![cfg_attr(not(test), forbid(unsafe_code))]
//! Wire models for the Hackversity chat endpoints.
//!
//! The chat page talks to three JSON endpoints (`/chat/send/`, `/chat/new/`
//! and `/chat/api/conversations/<id>/`). The request and response bodies live
//! here so the browser client and anything speaking the same contract agree
//! on field names and defaults.

pub mod models;
