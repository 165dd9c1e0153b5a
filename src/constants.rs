pub const USERS_COLLECTION: &str = "users";

pub const DEFAULT_LIST_LIMIT: usize = 10;
pub const MAX_LIST_LIMIT: usize = 100;
pub const SEARCH_RESULT_LIMIT: usize = 20;

/// Appended to a prefix to form the exclusive upper bound of a prefix range.
/// It is the last code point of the Basic Multilingual Plane private use area.
pub const PREFIX_RANGE_END: char = '\u{f8ff}';

pub const USER_EXISTS_MESSAGE: &str = "User already exists";
pub const USER_DELETED_MESSAGE: &str = "User deleted successfully";
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal server error";
