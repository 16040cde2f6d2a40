//! Domain layer: tariff hierarchy, chapter index and search
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod chapter;
pub mod entities;
pub mod error;
pub mod row;
pub mod search;
pub mod tokenizer;

pub use arena::{HsNode, HsTree, NodeData, TreeNode};
pub use builder::TreeBuilder;
pub use chapter::{ChapterIndex, ChapterRecord};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use row::{leveled_rows, RawRow, Row, RowPolicy};
pub use search::{rank_chapters, search_chapter, ScoredChapter};
pub use tokenizer::{tokenize, tokens, TokenSet};
