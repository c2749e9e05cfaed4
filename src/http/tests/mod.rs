//! Route tests for the HTTP surface.
