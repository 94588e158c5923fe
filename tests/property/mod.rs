//! Property-based tests for snapshot invariants

mod roundtrip;
