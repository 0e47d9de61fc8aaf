//! Crate root module declarations for the Plum Tsume mate solver.
//!
//! This file exposes the board collaborator contract, the bounded-depth
//! forced-mate search built on it, and a synthetic game-graph position so
//! binaries, tests, and benches can import stable module paths.

pub mod mate_search_errors;

pub mod position {
    pub mod candidate_list;
    pub mod mate_position;
    pub mod repetition;
}

pub mod mate_search {
    pub mod move_picker;
    pub mod node_search;
    pub mod root_search;
    pub mod search_config;
    pub mod solver;
}

pub mod game_tree {
    pub mod random_tree;
    pub mod tree_builder;
    pub mod tree_position;
}
