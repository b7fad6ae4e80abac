//! # ets2map-core
//!
//! Decoder for Euro Truck Simulator 2 map data.
//!
//! This crate provides:
//! - Sector decoding: node records, item records and their links
//! - Shared node/item tables and cross-sector link resolution
//! - Prefab decoding, route enumeration and world-space projection
//! - Byte pattern search used to locate records without an index
//!
//! ## Example
//!
//! ```ignore
//! use ets2map_core::{MapConfig, Mapper};
//!
//! let config = MapConfig::load("ets2map.toml")?;
//! let mut mapper = Mapper::new(config);
//! mapper.load()?;
//! mapper.load_prefabs()?;
//!
//! let summary = mapper.summary();
//! println!("{} nodes, {} items", summary.nodes, summary.items);
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod map;
pub mod prefab;
pub mod reader;
pub mod search;
pub mod summary;
pub mod token;

pub use config::{MapConfig, MapConfigBuilder};
pub use error::{Error, Result};
pub use map::{
    Direction, GraphTables, Item, ItemKind, ItemRequester, ItemType, Mapper, Node, NodeRef,
    PendingQueue, PendingRequest, Sector, SectorState,
};
pub use prefab::{Point, Prefab, PrefabCurve, PrefabHeader, PrefabNode, PrefabRoute};
pub use reader::ReadBytes;
pub use search::{
    BytePattern, format_pattern, indexes_of, indexes_of_u64, indexes_of_uid, parse_pattern,
};
pub use summary::{MapSummary, PrefabSummary, SectorSummary};
pub use token::{string_to_token, token_to_string};
