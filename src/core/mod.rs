// src/core/mod.rs

/// Wire-level data structures: the scan request and handle, poll status
/// variants, and the typed per-source payloads of a result bundle.
pub mod models;

/// HTTP client for the aggregation backend, its configuration, and the
/// error taxonomy every failure surfaces through.
pub mod client;

/// The scan lifecycle: submit, poll at a fixed interval, stop at the first
/// terminal status. One cancellable task per scan.
pub mod session;

/// Pure derivation of dashboard sections from a result bundle. No I/O;
/// rendering consumes its output.
pub mod normalizer;
