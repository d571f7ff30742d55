use browser::Browser;
use tracing::info;

use crate::{
    errors::StorefrontError,
    pages::base::{BasePage, SHORT_ELEMENT_TIMEOUT, VALIDATION_TIMEOUT},
};

#[derive(Debug, Clone, Copy)]
enum LoginUi {
    EmailInput,
    PasswordInput,
    RememberMe,
    LoginButton,
    ForgotPassword,
    RegisterButton,
    ValidationError,
    FieldValidationError,
    LogoutLink,
}

impl LoginUi {
    const fn css(self) -> &'static str {
        match self {
            LoginUi::EmailInput => "#Email",
            LoginUi::PasswordInput => "#Password",
            LoginUi::RememberMe => "#RememberMe",
            LoginUi::LoginButton => "input.button-1.login-button",
            LoginUi::ForgotPassword => ".forgot-password a",
            LoginUi::RegisterButton => "input.button-1.register-button",
            LoginUi::ValidationError => ".validation-summary-errors",
            LoginUi::FieldValidationError => ".field-validation-error",
            LoginUi::LogoutLink => "a.ico-logout",
        }
    }
}

pub struct LoginPage<'a, B: Browser> {
    base: BasePage<'a, B>,
}

impl<'a, B: Browser> LoginPage<'a, B> {
    pub fn new(base: BasePage<'a, B>) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &BasePage<'a, B> {
        &self.base
    }

    pub async fn go_to_login_page(&self) -> Result<(), StorefrontError> {
        self.base.navigate("/login").await?;
        self.base.wait_for_page_load().await
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<(), StorefrontError> {
        info!("Logging in as {email}");

        self.base.fill_input(LoginUi::EmailInput.css(), email).await?;
        self.base
            .fill_input(LoginUi::PasswordInput.css(), password)
            .await?;

        if remember_me {
            self.base
                .browser()
                .set_checked(LoginUi::RememberMe.css(), true)
                .await?;
        }

        self.base.click_element(LoginUi::LoginButton.css()).await?;
        self.base.wait_for_page_load().await
    }

    /// A logout link only renders for an authenticated session
    pub async fn is_login_successful(&self) -> Result<bool, StorefrontError> {
        self.base
            .appears_within(LoginUi::LogoutLink.css(), SHORT_ELEMENT_TIMEOUT)
            .await
    }

    pub async fn get_validation_error(&self) -> Result<Option<String>, StorefrontError> {
        self.visible_text(LoginUi::ValidationError).await
    }

    pub async fn get_field_error(&self) -> Result<Option<String>, StorefrontError> {
        self.visible_text(LoginUi::FieldValidationError).await
    }

    pub async fn go_to_register(&self) -> Result<(), StorefrontError> {
        self.base
            .click_element(LoginUi::RegisterButton.css())
            .await?;
        self.base.wait_for_page_load().await
    }

    pub async fn click_forgot_password(&self) -> Result<(), StorefrontError> {
        self.base
            .click_element(LoginUi::ForgotPassword.css())
            .await?;
        self.base.wait_for_page_load().await
    }

    async fn visible_text(&self, region: LoginUi) -> Result<Option<String>, StorefrontError> {
        if !self
            .base
            .appears_within(region.css(), VALIDATION_TIMEOUT)
            .await?
        {
            return Ok(None);
        }

        self.base.get_text(region.css()).await
    }
}
