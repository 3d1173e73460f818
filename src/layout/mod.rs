pub mod connection;
pub mod pattern;
pub mod tree;

pub use connection::{build_connections, PositionLookup};
pub use pattern::{arrange, arrange_with_rng, ItemLayout, LayoutPattern, PatternError, PlacedItem};
pub use tree::{layout_tree, AngularSpan, TreeLayout};
