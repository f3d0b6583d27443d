/// names of values used in interactions
pub mod value {
    pub const URL: &str = "url";
    pub const SIZE: &str = "size";
    pub const NAME: &str = "name";
    pub const DISABLE_ANIMATIONS: &str = "disable_animations";
}

/// names of commands
pub mod commands {
    pub const EMOTE: &str = "emote";
}

/// embed colours
pub mod colour {
    pub const ERROR: u32 = 0xff2020;
    pub const PROGRESS: u32 = 0x262626;
    pub const SUCCESS: u32 = 0x00ff59;
    pub const UPLOAD_FAILED: u32 = 0xff2323;
}

/// user-facing reply texts
pub mod reply {
    pub const URL_REQUIRED: &str = "`❌` URL is required.";
    pub const UNSUPPORTED_PLATFORM: &str =
        "`❌` Invalid emote URL.\nCurrently supported platforms: `BetterTTV, 7TV`";
    pub const FETCH_FAILED: &str = "`❌` Failed to fetch emote data.";
    pub const NOT_FOUND: &str = "`❌` Emote not found.";
    pub const NOT_IN_SERVER: &str = "`❌` This command must be used in a server.";
    pub const UPLOADING: &str = "Uploading emote to Discord...";
    pub const UPLOAD_FAILED: &str = "`❌` An error occurred while uploading the emote.";
}
