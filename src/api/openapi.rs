use utoipa::OpenApi;

use crate::{
    api::models::{ErrorResponse, MessageResponse, UserResponse, UsersResponse},
    core::models::{
        NewUser, NotificationPreferences, PrivacySettings, ProfileVisibility, SocialLinks, Theme, User,
        UserPreferences, UserProfile, UserSortField, UserUpdate,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::get_users,
        super::handlers::create_user,
        super::handlers::update_user,
        super::handlers::delete_user
    ),
    components(schemas(
        NewUser,
        UserUpdate,
        UserResponse,
        UsersResponse,
        MessageResponse,
        ErrorResponse,
        User,
        UserProfile,
        SocialLinks,
        UserPreferences,
        NotificationPreferences,
        PrivacySettings,
        Theme,
        ProfileVisibility,
        UserSortField
    )),
    info(
        title = "Linkor Users API",
        description = "User records for the Linkor freelancing marketplace",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
