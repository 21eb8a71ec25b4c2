pub mod anchors;
pub mod centrality;
pub mod completions;
pub mod dups;
pub mod layout;
