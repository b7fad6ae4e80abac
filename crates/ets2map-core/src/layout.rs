//! Binary layout constants for sector and prefab files
//!
//! This module centralizes all byte offsets used while decoding map data.
//! Constants are organized by record type. All values are little-endian.

/// Sector file header
pub mod sector {
    /// Buffers shorter than this are treated as empty sectors
    pub const MIN_SIZE: usize = 60;

    /// Declared node count (u32)
    pub const NODE_COUNT: usize = 0x10;

    /// Backward scan stops once the block offset is no longer above this
    pub const DATA_START: usize = 60;
}

/// World node record (56 bytes, stored at the end of a sector file)
pub mod node {
    pub const SIZE: usize = 56;

    pub const UID: usize = 0x00;
    /// Fixed-point coordinates, divide by [`FIXED_POINT_SCALE`]
    pub const X: usize = 0x08;
    pub const Y: usize = 0x0C;
    pub const Z: usize = 0x10;

    pub const ROTATION_X: usize = 0x14;
    pub const ROTATION_Y: usize = 0x18;
    pub const ROTATION_Z: usize = 0x1C;
    pub const ROTATION_W: usize = 0x20;

    pub const BACKWARD_ITEM: usize = 0x24;
    pub const FORWARD_ITEM: usize = 0x2C;
    pub const FLAGS: usize = 0x34;

    pub const FIXED_POINT_SCALE: f32 = 256.0;
}

/// Item records, relative to the type tag
pub mod item {
    pub const TYPE: usize = 0x00;
    pub const UID: usize = 0x04;
    pub const FLAGS: usize = 0x37;

    /// Flag bit in [`FLAGS`] hiding the item from the map UI
    pub const HIDE_UI: u8 = 0x02;

    /// Type tags must lie in (0, MAX_TYPE_TAG)
    pub const MAX_TYPE_TAG: u32 = 0x40;

    pub mod road {
        pub const LOOK_ID: usize = 0x3D;
        pub const START_NODE: usize = 0x8D;
        pub const END_NODE: usize = 0x95;
    }

    pub mod prefab {
        pub const PREFAB_ID: usize = 0x3D;
        pub const NODE_COUNT: usize = 0x55;
        pub const NODE_LIST: usize = 0x59;
        pub const MAX_NODES: u32 = 0x20;
    }

    pub mod city {
        pub const NAME_TOKEN: usize = 0x3D;
        pub const NODE: usize = 0x55;
    }
}

/// Prefab file header
pub mod prefab {
    /// The only format version this decoder was written against
    pub const KNOWN_VERSION: i32 = 21;

    pub const VERSION: usize = 0;
    pub const NODE_COUNT: usize = 4;
    pub const CURVE_COUNT: usize = 8;
    pub const TERRAIN_COUNT: usize = 12;
    pub const SIGN_COUNT: usize = 16;
    pub const SPAWN_COUNT: usize = 20;
    pub const SEMAPHORE_COUNT: usize = 24;
    pub const MAP_POINT_COUNT: usize = 28;
    pub const TRIGGER_COUNT: usize = 32;
    pub const INTERSECTION_COUNT: usize = 36;

    pub const NODE_SECTION: usize = 44;
    pub const CURVE_SECTION: usize = 48;
    pub const SECTION_3: usize = 52;
    pub const SECTION_4: usize = 56;

    pub const HEADER_SIZE: usize = 60;

    /// Index value meaning "no link" in curve and node index groups
    pub const NO_LINK: i32 = -1;
}

/// Navigation curve record (128-byte stride from the curve section)
pub mod curve {
    pub const SIZE: usize = 128;

    pub const START_X: usize = 16;
    pub const START_Y: usize = 20;
    pub const START_Z: usize = 24;
    pub const END_X: usize = 28;
    pub const END_Y: usize = 32;
    pub const END_Z: usize = 36;
    pub const START_ROTATION_X: usize = 40;
    pub const START_ROTATION_Y: usize = 44;
    pub const START_ROTATION_Z: usize = 48;
    pub const END_ROTATION_X: usize = 52;
    pub const END_ROTATION_Y: usize = 56;
    pub const END_ROTATION_Z: usize = 60;

    pub const LENGTH: usize = 72;

    pub const NEXT: usize = 76;
    pub const PREV: usize = 92;
    pub const LINKS: usize = 4;
}

/// Prefab node record (104-byte stride from the node section)
pub mod prefab_node {
    pub const SIZE: usize = 104;

    pub const X: usize = 16;
    pub const Y: usize = 20;
    pub const Z: usize = 24;
    pub const ROTATION_X: usize = 28;
    pub const ROTATION_Y: usize = 32;
    pub const ROTATION_Z: usize = 36;

    pub const INPUT_CURVES: usize = 40;
    pub const OUTPUT_CURVES: usize = 72;
    pub const LANES: usize = 8;
}
