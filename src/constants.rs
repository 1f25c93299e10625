//! Application constants for the report parser
//!
//! Default values used to build [`crate::config::ProcessorConfig`]. Nothing
//! here is read directly by the parsing pipeline; the configuration carries
//! every value into the components that need it.

// =============================================================================
// Line Layout
// =============================================================================

/// Field delimiter used for the header and reconstructed rows
pub const DEFAULT_DELIMITER: char = ',';

/// Maximum number of data lines read per file (the header is not counted)
pub const DEFAULT_ROW_CEILING: usize = 50_000;

/// Encoding the exports are written in. The BOM of a UTF-8 file read with
/// this codepage turns into [`BOM_MOJIBAKE`].
pub const DEFAULT_ENCODING: &str = "windows-1251";

// =============================================================================
// Artifacts
// =============================================================================

/// UTF-8 byte order mark (EF BB BF) decoded as Windows-1251
pub const BOM_MOJIBAKE: &str = "п»ї";

/// UTF-8 byte order mark as a character, seen when decoding as UTF-8
pub const BOM_CHAR: &str = "\u{feff}";

/// Placeholder dash left before a delimiter
pub const TRAILING_DASH_TOKEN: &str = "-,";

/// Placeholder dash left after a delimiter
pub const LEADING_DASH_TOKEN: &str = ", -";

/// Quote character stripped from every line
pub const DEFAULT_QUOTE_CHAR: char = '"';

// =============================================================================
// Reconstruction Patterns
// =============================================================================

/// Title prefix: free text, optional season, year, optional season, two words
pub const DEFAULT_START_PATTERN: &str =
    r"[^*]+(Winter|Summer)*\W\d{4}\W(Winter|Summer)*\W\w+\W\w+";

/// Trailing code: three word tokens at end of line
pub const DEFAULT_END_PATTERN: &str = r"\w+\W\w+\W\w+$";

/// Skip diagnostics retained per file; further skips are only counted
pub const DEFAULT_MAX_RECORDED_SKIPS: usize = 100;

// =============================================================================
// Discovery and Output
// =============================================================================

/// Substring a directory path must contain for its files to be processed
pub const DEFAULT_DIRECTORY_MARKER: &str = "data_sets";

/// Substring a file name must contain to be processed
pub const DEFAULT_FILE_MARKER: &str = ".csv";

/// Infix marking an output written next to an input of the same extension
pub const OUTPUT_INFIX: &str = ".clean";

/// Worksheet name used for workbook output
pub const WORKSHEET_NAME: &str = "data";

/// Excel worksheet limits
pub const XLSX_MAX_ROWS: usize = 1_048_576;
pub const XLSX_MAX_COLUMNS: usize = 16_384;
