//! Binary-format building blocks, leaves first: byte primitives, text
//! codecs, the PK3 payload codec and record, substructure parsers, and
//! the G3 save container and PC box layout built on top of them.
pub mod bytes;
pub mod character_set;
pub mod pc_box;
pub mod pk3;
pub mod pk3_record;
pub mod save_data;
pub mod substructures;
pub mod text_gen12;
