/// Raw session handle as seen by foreign callers. `0` is never a live
/// session; any nonzero value must still pass the registry's generation
/// check.
pub type FramefeedHandle = u64;

/// Status codes returned by `framefeed_status`.
pub const FRAMEFEED_STATUS_NOT_FOUND: i32 = -1;
pub const FRAMEFEED_STATUS_DISCONNECTED: i32 = 0;
pub const FRAMEFEED_STATUS_CONNECTING: i32 = 1;
pub const FRAMEFEED_STATUS_CONNECTED: i32 = 2;

/// Terminal error codes; a session reporting one of these only ever
/// recovers by destroy-and-recreate.
pub const FRAMEFEED_ERR_CONNECT_FAILED: i32 = -2;
pub const FRAMEFEED_ERR_STREAM_ENDED: i32 = -3;
pub const FRAMEFEED_ERR_DECODE_FAILED: i32 = -4;
pub const FRAMEFEED_ERR_TRANSPORT_FAILED: i32 = -5;
