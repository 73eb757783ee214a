// workspace
pub const WORKSPACE_FILE: &str = "pagesmith.json";
pub const AUTHOR_ENV: &str = "PAGESMITH_AUTHOR";
pub const DEFAULT_AUTHOR: &str = "User";

// repository
pub const BRANCH_NAME: &str = "main";
pub const COMMIT_ID_LENGTH: usize = 7;

// compositor
pub const MARKUP_EXTENSION: &str = ".html";
pub const STYLESHEET_EXTENSION: &str = ".css";
pub const SCRIPT_EXTENSION: &str = ".js";

// sandbox
pub const TELEMETRY_SOURCE: &str = "pagesmith-preview";
pub const HIGHLIGHT_DELAY_MS: u32 = 1000;
pub const HIGHLIGHT_OUTLINE: &str = "2px solid #f97316";
pub const SANDBOX_PERMISSIONS: &[&str] = &[
    "allow-scripts",
    "allow-same-origin",
    "allow-modals",
    "allow-forms",
    "allow-popups",
];
pub const MOBILE_USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1";
pub const MOBILE_PLATFORM: &str = "iPhone";
pub const MOBILE_TOUCH_POINTS: u32 = 5;
pub const PREVIEW_BIND_ADDR: &str = "127.0.0.1:0";
pub const TELEMETRY_PATH: &str = "/telemetry";
pub const MAX_TELEMETRY_BYTES: u64 = 64 * 1024;

// store
pub const STORE_DIR: &str = "pagesmith";
pub const STORE_FILE: &str = "projects.json";

// ui
pub const MAX_FILES_TO_SHOW: usize = 20;
