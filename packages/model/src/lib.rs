//! # Pagesmith Model
//!
//! The element-tree data model shared by the editor, the export compiler and
//! the persistence store.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: Element tree + tree operations       │
//! │  - Element nodes (Arc-shared subtrees)      │
//! │  - Sections (named top-level trees)         │
//! │  - find / update / delete / reposition      │
//! └─────────────────────────────────────────────┘
//!            ↓                        ↓
//! ┌──────────────────────┐  ┌────────────────────┐
//! │ editor: dispatch +   │  │ compiler-html:     │
//! │ snapshot history     │  │ sections → HTML    │
//! └──────────────────────┘  └────────────────────┘
//! ```
//!
//! ## Invariants
//!
//! 1. Node ids are unique within a document and never reused
//! 2. A node has at most one owner; there are no cycles
//! 3. `children` order is paint order
//! 4. Sizes are either pixel lengths or `auto`

mod element;
mod error;
mod id_generator;
mod section;
pub mod tree;

pub use element::{
    format_px, Dimension, Element, ElementType, Forest, Position, Props, Size, Styles,
};
pub use error::ModelError;
pub use id_generator::{seed_from_key, IdGenerator};
pub use section::{ensure_single_home, home_section, ordered_sections, slugify, Section, Sections};
pub use tree::{ElementPatch, REORDER_SENTINEL};
