//! World graph: nodes, items, sectors and the map-wide coordinator.
//!
//! - **Sector**: decodes one sector file into nodes and the items they link to
//! - **GraphTables**: session-wide node/item arenas shared by all sectors
//! - **Mapper**: loads sectors in parallel and resolves cross-sector links
//!
//! Items a sector cannot find in its own bytes are queued as pending
//! requests and retried by the mapper until no further progress is made.

#[cfg(test)]
pub(crate) mod fixtures;
mod item;
mod mapper;
mod node;
mod pending;
mod sector;
mod tables;

pub use item::{Item, ItemKind, ItemType, NodeRef, is_plausible_tag};
pub use mapper::Mapper;
pub use node::{Direction, Node};
pub use pending::{ItemRequester, PendingQueue, PendingRequest};
pub use sector::{Sector, SectorState};
pub use tables::GraphTables;
