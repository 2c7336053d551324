pub mod bits;
pub mod code_table;
pub mod codec;
pub mod error;
pub mod format;
pub mod frequency;
pub mod reader;
pub mod text;
pub mod tree;
pub mod writer;

pub use bits::{decode, encode, BitSequence};
pub use code_table::{Code, CodeTable};
pub use codec::TableCodec;
pub use error::{CompactaError, ErrorKind, Result, ReturnCode};
pub use format::{ContainerHeader, Framing, HEADER_SIZE, MAGIC};
pub use frequency::FrequencyTable;
pub use reader::{Container, Reader};
pub use text::{parse, render, Record};
pub use tree::{HuffNode, HuffmanTree};
pub use writer::{ContainerStats, Writer};
