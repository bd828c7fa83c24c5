// record constants
pub const DOC_ID: &str = "_id";
pub const FIELD_SEPARATOR: &str = ".";

// pipeline constants
pub const STAGE_PREFIX: &str = "$";
pub const DEFAULT_COUNT_FIELD: &str = "count";

// schema constants
pub const INTEGER_TOKEN: &str = "integer";
pub const SCHEMA_TYPE: &str = "type";
pub const SCHEMA_REQUIRED: &str = "required";
pub const SCHEMA_ARGS: &str = "args";

// store constants
pub const SNAPSHOT_INDENT: &[u8] = b"  ";
