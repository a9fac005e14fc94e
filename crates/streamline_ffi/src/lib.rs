//! Flutter-facing bindings over `streamline_core`.

pub mod api;
