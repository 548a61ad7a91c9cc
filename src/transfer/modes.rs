//! Transfer parameters
//!
//! The three independent knobs a session sets with MODE, TYPE and STRU, and
//! the single-letter codes used on the control channel for each of them.

use std::fmt;

/// How bytes are carried on the data connection (MODE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    #[default]
    Stream,
    Block,
    Compressed,
}

/// How the payload is interpreted (TYPE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataType {
    Ascii,
    #[default]
    Binary,
}

/// Logical structure of the file (STRU).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileStructure {
    #[default]
    File,
    Record,
    Page,
}

impl TransferMode {
    /// Parses a MODE argument (`S`, `B` or `C`, case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "S" => Some(TransferMode::Stream),
            "B" => Some(TransferMode::Block),
            "C" => Some(TransferMode::Compressed),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            TransferMode::Stream => 'S',
            TransferMode::Block => 'B',
            TransferMode::Compressed => 'C',
        }
    }
}

impl DataType {
    /// Parses a TYPE argument (`A` or `I`, case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "A" => Some(DataType::Ascii),
            "I" => Some(DataType::Binary),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            DataType::Ascii => 'A',
            DataType::Binary => 'I',
        }
    }
}

impl FileStructure {
    /// Parses a STRU argument (`F`, `R` or `P`, case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "F" => Some(FileStructure::File),
            "R" => Some(FileStructure::Record),
            "P" => Some(FileStructure::Page),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            FileStructure::File => 'F',
            FileStructure::Record => 'R',
            FileStructure::Page => 'P',
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransferMode::Stream => "Stream",
            TransferMode::Block => "Block",
            TransferMode::Compressed => "Compressed",
        };
        f.write_str(name)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Ascii => "ASCII",
            DataType::Binary => "Binary",
        };
        f.write_str(name)
    }
}

impl fmt::Display for FileStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileStructure::File => "File",
            FileStructure::Record => "Record",
            FileStructure::Page => "Page",
        };
        f.write_str(name)
    }
}

/// Snapshot of the parameters a transfer runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransferParams {
    pub mode: TransferMode,
    pub data_type: DataType,
    pub structure: FileStructure,
}

impl TransferParams {
    pub fn new(mode: TransferMode, data_type: DataType, structure: FileStructure) -> Self {
        Self {
            mode,
            data_type,
            structure,
        }
    }

    /// Record structure with ASCII type is line-oriented and ignores the mode.
    pub fn is_line_oriented(&self) -> bool {
        self.structure == FileStructure::Record && self.data_type == DataType::Ascii
    }
}

impl fmt::Display for TransferParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.mode, self.data_type, self.structure)
    }
}
