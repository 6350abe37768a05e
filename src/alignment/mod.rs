pub mod boundaries;
pub mod gaps;
pub mod global;
pub mod matching_blocks;
pub mod remap;
pub mod report;
pub mod streams;
pub mod tokenization;
