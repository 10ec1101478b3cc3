/// Filename prefix for attachments uploaded with an administrator response
pub const RESPONSE_ATTACHMENT_PREFIX: &str = "resposta_";

/// Timestamp layout used in stored attachment names (e.g. `20250314_091500`)
pub const ATTACHMENT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Human readable timestamp layout returned next to RFC 3339 timestamps
pub const DISPLAY_TIMESTAMP_FORMAT: &str = "%d/%m/%Y às %H:%M";
