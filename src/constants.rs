/// Constants module to avoid magic numbers in the codebase

// Network Configuration
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

// Timeouts
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 60;

// UI Configuration
pub const UI_POLL_INTERVAL_MS: u64 = 50;
pub const UI_SCROLL_LINES: u16 = 3;
pub const UI_TABLE_PREVIEW_ROWS: usize = 10;
pub const UI_SIDEBAR_WIDTH: u16 = 32;

// Persistence
pub const SNAPSHOT_FILE_NAME: &str = "chat_sessions.json";

// Conversation seeding
pub const GREETING_MESSAGE: &str = "Hello! I'm your California Procurement Assistant. \
    Ask me anything about 346,000+ purchase records!";

// Suggested questions shown while a session only contains the greeting
pub const EXAMPLE_QUESTIONS: &[&str] = &[
    "How many purchases in 2014?",
    "Top 5 departments by spending",
    "Show LPA contracts",
    "IT purchases over $10,000",
];
