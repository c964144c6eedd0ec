//! # catechism-search
//!
//! A Rust web service answering free-text questions against the numbered
//! paragraphs of the Catechism with a cascading hybrid pipeline: exact
//! keyword search first, then an LLM-assisted semantic fallback combining
//! query rewriting, synonym expansion, and vector similarity search.
//!
//! ## Architecture
//!
//! The search pipeline is a cascade, not a fan-out:
//!
//! ```text
//!                      ┌──────────────┐
//!                      │  User Query   │
//!                      └──────┬───────┘
//!                             │
//!                             ▼
//!                  ┌───────────────────────┐
//!                  │    Keyword Search      │
//!                  │   (tantivy, top 10)    │
//!                  └───────────┬───────────┘
//!                              │
//!                     ≥ 5 hits?│
//!                  ┌─── yes ───┴─── no ────┐
//!                  ▼                       ▼
//!         ┌────────────────┐    ┌──────────────────────┐
//!         │ Return keyword  │    │   Query Rewriting    │
//!         │ hits verbatim   │    │ (LLM, doctrinal      │
//!         │ ("keyword")     │    │  vocabulary)         │
//!         └────────────────┘    └──────────┬───────────┘
//!                                          ▼
//!                               ┌──────────────────────┐
//!                               │  Synonym Expansion   │
//!                               │  (static table, OR)  │
//!                               └──────────┬───────────┘
//!                                          ▼
//!                               ┌──────────────────────┐
//!                               │  Embed + Vector      │
//!                               │  Search (cos ≥ 0.3)  │
//!                               └──────────┬───────────┘
//!                                          ▼
//!                               ┌──────────────────────┐
//!                               │  Fusion: keyword     │
//!                               │  +0.5 boost, dedup,  │
//!                               │  sort, cap at 10     │
//!                               │ ("hybrid"/"semantic")│
//!                               └──────────────────────┘
//! ```
//!
//! Independently of search, a paragraph reference like `"283"`, `"283-284"`,
//! or `"CCC 283"` is resolved and range-fetched directly, bypassing ranking.
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for server, corpus, and LLM settings
//! - [`error`] - Search failure taxonomy and reference validation errors
//! - [`models`] - Shared data types: `Paragraph`, `SearchResult`, request/response types
//! - [`store`] - `ParagraphStore` trait plus the tantivy + in-memory-vector implementation
//! - [`llm`] - Embedding and completion clients for Ollama or OpenAI-compatible APIs
//! - [`search`] - Synonym expansion and the hybrid search orchestrator
//! - [`resolver`] - Paragraph reference parsing and bounds validation
//! - [`api`] - Axum HTTP handlers for search, paragraph lookup, and health
//! - [`state`] - Shared application state wiring store, clients, and config

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod resolver;
pub mod search;
pub mod state;
pub mod store;
