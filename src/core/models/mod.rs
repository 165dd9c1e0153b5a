pub mod user;

pub use user::{
    NewUser, NotificationPreferences, PrivacySettings, ProfileVisibility, SocialLinks, Theme, User, UserPreferences,
    UserProfile, UserSortField, UserUpdate,
};
