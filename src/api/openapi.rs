//! OpenAPI documentation served through Swagger UI.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, category_handler, notification_handler, payment_history_handler,
};
use crate::services::{NotificationDispatch, RegistrationResponse, TokenResponse};
use crate::types::{PagedCategories, PagedNotifications, PagedPaymentHistories};
use domain::{
    AccountResponse, CategoryResponse, NotificationResponse, PaymentHistoryResponse,
    PaymentStatus, Role,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bar Booking API",
        version = "0.1.0",
        description = "Accounts, categories, notifications and payment history for bar bookings"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        auth_handler::login_with_google,
        auth_handler::verify_otp,
        category_handler::list_categories,
        category_handler::get_category,
        category_handler::create_category,
        category_handler::update_category,
        category_handler::delete_category,
        notification_handler::get_notifications,
        notification_handler::unread_count,
        notification_handler::mark_as_read,
        notification_handler::create_notification,
        payment_history_handler::get_by_bar,
        payment_history_handler::get_by_customer,
    ),
    components(
        schemas(
            Role,
            PaymentStatus,
            AccountResponse,
            CategoryResponse,
            NotificationResponse,
            PaymentHistoryResponse,
            PagedCategories,
            PagedNotifications,
            PagedPaymentHistories,
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::GoogleLoginRequest,
            auth_handler::VerifyOtpRequest,
            RegistrationResponse,
            TokenResponse,
            category_handler::CreateCategoryRequest,
            category_handler::UpdateCategoryRequest,
            notification_handler::CreateNotificationRequest,
            notification_handler::UnreadCountResponse,
            NotificationDispatch,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, sign-in and OTP verification"),
        (name = "Categories", description = "Category management"),
        (name = "Notifications", description = "Notification delivery and read tracking"),
        (name = "Payment histories", description = "Payment history by bar or customer")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}
