// Copyright 2026 the Kinema Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error kinds surfaced by world operations.

use kinema_geom::GeomError;

use crate::pool::PoolError;
use crate::types::{Capabilities, EntityId, Property};

/// Failures of [`World`](crate::World) operations.
///
/// Conditions that are expected in normal play, like a broad-phase candidate that was destroyed
/// earlier in the frame, are handled internally and never show up here.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum WorldError {
    /// The id refers to a destroyed entity.
    #[error("entity {0} is not alive")]
    StaleEntity(EntityId),
    /// The operation needs a capability the entity does not have.
    #[error("entity {entity} lacks {capability:?}")]
    MissingCapability {
        /// The entity queried.
        entity: EntityId,
        /// What it would need.
        capability: Capabilities,
    },
    /// `child` is not attached to `parent`.
    #[error("entity {child} is not attached to {parent}")]
    NotAttached {
        /// The would-be parent.
        parent: EntityId,
        /// The entity that was expected among its children.
        child: EntityId,
    },
    /// Attaching would make an entity its own ancestor.
    #[error("attaching {child} to {parent} would create a cycle")]
    CyclicAttach {
        /// The requested parent.
        parent: EntityId,
        /// The requested child.
        child: EntityId,
    },
    /// The property can be read but not written.
    #[error("property {0:?} is read-only")]
    ReadOnlyProperty(Property),
    /// The world configuration is unusable.
    #[error("invalid world configuration: {0}")]
    InvalidConfig(&'static str),
    /// Snapshot pool misuse.
    #[error(transparent)]
    Pool(#[from] PoolError),
    /// Geometric failure from the narrow phase.
    #[error(transparent)]
    Geom(#[from] GeomError),
}
