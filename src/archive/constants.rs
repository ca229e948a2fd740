//! Top-level category directories found in a Facebook data export.

pub const LIKES_AND_REACTIONS: &str = "likes_and_reactions";
pub const SECURITY_AND_LOGIN_INFORMATION: &str = "security_and_login_information";
pub const PROFILE_INFORMATION: &str = "profile_information";
pub const OTHER_ACTIVITY: &str = "other_activity";
pub const APPS_AND_WEBSITES: &str = "apps_and_websites";
pub const ADS: &str = "ads";
pub const SAVED_ITEMS: &str = "saved_items";
pub const LOCATION_HISTORY: &str = "location_history";
pub const FOLLOWING_AND_FOLLOWERS: &str = "following_and_followers";
pub const PAGES: &str = "pages";
pub const GROUPS: &str = "groups";
pub const SEARCH_HISTORY: &str = "search_history";
pub const EVENTS: &str = "events";
pub const YOUR_PLACES: &str = "your_places";
pub const PHOTOS_AND_VIDEOS: &str = "photos_and_videos";
pub const PAYMENT_HISTORY: &str = "payment_history";
pub const POSTS: &str = "posts";
pub const COMMENTS: &str = "comments";
pub const FRIENDS: &str = "friends";
pub const MESSAGES: &str = "messages";
pub const MARKETPLACE: &str = "marketplace";
pub const ABOUT_YOU: &str = "about_you";
pub const CALLS_AND_MESSAGES: &str = "calls_and_messages";

/// Every category a complete export is expected to contain.
pub const EXPECTED_SUBDIRECTORIES: [&str; 23] = [
    LIKES_AND_REACTIONS,
    SECURITY_AND_LOGIN_INFORMATION,
    PROFILE_INFORMATION,
    OTHER_ACTIVITY,
    APPS_AND_WEBSITES,
    ADS,
    SAVED_ITEMS,
    LOCATION_HISTORY,
    FOLLOWING_AND_FOLLOWERS,
    PAGES,
    GROUPS,
    SEARCH_HISTORY,
    EVENTS,
    YOUR_PLACES,
    PHOTOS_AND_VIDEOS,
    PAYMENT_HISTORY,
    POSTS,
    COMMENTS,
    FRIENDS,
    MESSAGES,
    MARKETPLACE,
    ABOUT_YOU,
    CALLS_AND_MESSAGES,
];

/// Entry whose presence marks the deprecated HTML export format.
pub const LEGACY_HTML_INDEX: &str = "index.html";
