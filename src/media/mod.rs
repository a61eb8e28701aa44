//! Ownership of user-supplied images and their display handles.

/// Ordered photo collection and the display-handle allocator contract.
pub mod registry;
