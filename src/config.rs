/// Configuration constants for the Analytics reporting API
pub mod api {
    /// Core Reporting API v3 endpoint
    pub const BASE_URL: &str = "https://www.googleapis.com/analytics/v3/data/ga";

    /// OAuth2 token endpoint used to refresh the access token
    pub const TOKEN_URL: &str = "https://www.googleapis.com/oauth2/v4/token";

    /// Separator for dimension and metric lists in the query string
    pub const LIST_SEPARATOR: &str = ",";
}

/// Environment variable names
pub mod env {
    /// Current bearer token (rewritten after every refresh)
    pub const CURRENT_TOKEN: &str = "GAUTH_CURRENT_TOKEN";
    pub const CLIENT_ID: &str = "GAUTH_CLIENT_ID";
    pub const CLIENT_SECRET: &str = "GAUTH_CLIENT_SECRET";
    pub const REFRESH_TOKEN: &str = "GAUTH_REFRESH_TOKEN";
    pub const GRANT_TYPE: &str = "GAUTH_GRANT_TYPE";
}

/// Export file layout
pub mod export {
    /// Field delimiter of the delimited output
    pub const DELIMITER: char = '\t';

    /// Extension of the delimited output
    pub const DELIMITED_EXT: &str = "tsv";

    /// Extension of the structured output
    pub const STRUCTURED_EXT: &str = "json";

    /// Suffix appended to the dataset name for the structured file
    pub const STRUCTURED_SUFFIX: &str = "_all";

    /// Suffix of the per-page snapshot directory
    pub const PAGES_DIR_SUFFIX: &str = "_pages";
}

/// Default values for CLI
pub mod defaults {
    use std::time::Duration;

    /// Report (view) identifier
    pub const IDS: &str = "ga:146624";

    pub const DIMENSIONS: &str =
        "ga:campaign,ga:sourceMedium,ga:country,ga:region,ga:city,ga:productName,ga:date";

    pub const METRICS: &str = "ga:itemQuantity,ga:itemRevenue,ga:localItemRevenue,ga:localProductRefundAmount,ga:productAddsToCart,ga:productDetailViews,ga:productListClicks";

    /// Grant type sent to the token endpoint
    pub const GRANT_TYPE: &str = "refresh_token";

    /// Re-attempts allowed per page request
    pub const MAX_RETRIES: u32 = 2;

    /// Pause before every continuation request (upstream is rate limited)
    pub const PAGE_DELAY: Duration = Duration::from_secs(1);

    /// Pause after a successful token refresh
    pub const REFRESH_COOLDOWN: Duration = Duration::from_secs(2);

    pub const EXPORT_DIR: &str = "exports";

    pub const NAME: &str = "google_ua_request";

    pub const LOG_FILE: &str = "logs.txt";

    pub const ENV_FILE: &str = ".env";

    /// Default log level
    pub const LOG_LEVEL: &str = "warn";
}
