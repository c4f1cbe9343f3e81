pub mod relation_graph;
pub mod translation;

pub use relation_graph::RelationGraph;
pub use translation::IdTranslationTable;
