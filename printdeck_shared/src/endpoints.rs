//! Request paths of the remote printer service.

pub const PRINTER_INFO: &str = "/api/printer/info";
pub const SESSIONS: &str = "/api/printer/sessions";
pub const GCODES: &str = "/api/gcodes";

pub const COMMAND_START: &str = "/api/command/start";
pub const COMMAND_PAUSE: &str = "/api/command/pause";
pub const COMMAND_CANCEL: &str = "/api/command/cancel";
pub const COMMAND_AUTOHOME: &str = "/api/command/autohome";
pub const COMMAND_LEVEL_BED_TEST: &str = "/api/command/levelbedtest";
pub const COMMAND_UNLOCK: &str = "/api/command/unlock";
pub const COMMAND_LOAD: &str = "/api/command/load";
