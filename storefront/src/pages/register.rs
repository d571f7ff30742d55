use browser::Browser;
use common::fixtures::{Gender, UserData};
use tracing::info;

use crate::{
    errors::StorefrontError,
    pages::base::{BasePage, SHORT_ELEMENT_TIMEOUT, VALIDATION_TIMEOUT},
};

const REGISTRATION_COMPLETED: &str = "your registration completed";

#[derive(Debug, Clone, Copy)]
enum RegisterUi {
    GenderMale,
    GenderFemale,
    FirstName,
    LastName,
    Email,
    Password,
    ConfirmPassword,
    RegisterButton,
    Result,
    ContinueButton,
    ValidationError,
}

impl RegisterUi {
    const fn css(self) -> &'static str {
        match self {
            RegisterUi::GenderMale => "#gender-male",
            RegisterUi::GenderFemale => "#gender-female",
            RegisterUi::FirstName => "#FirstName",
            RegisterUi::LastName => "#LastName",
            RegisterUi::Email => "#Email",
            RegisterUi::Password => "#Password",
            RegisterUi::ConfirmPassword => "#ConfirmPassword",
            RegisterUi::RegisterButton => "#register-button",
            RegisterUi::Result => ".result",
            RegisterUi::ContinueButton => "input.button-1.register-continue-button",
            RegisterUi::ValidationError => ".validation-summary-errors",
        }
    }
}

pub struct RegisterPage<'a, B: Browser> {
    base: BasePage<'a, B>,
}

impl<'a, B: Browser> RegisterPage<'a, B> {
    pub fn new(base: BasePage<'a, B>) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &BasePage<'a, B> {
        &self.base
    }

    pub async fn go_to_register_page(&self) -> Result<(), StorefrontError> {
        self.base.navigate("/register").await?;
        self.base.wait_for_page_load().await
    }

    /// Fills and submits the form, the password goes into both fields
    pub async fn register_user(&self, user: &UserData) -> Result<(), StorefrontError> {
        info!("Registering {}", user.email);

        let browser = self.base.browser();

        match user.gender {
            Some(Gender::Male) => browser.set_checked(RegisterUi::GenderMale.css(), true).await?,
            Some(Gender::Female) => {
                browser
                    .set_checked(RegisterUi::GenderFemale.css(), true)
                    .await?
            }
            None => {}
        }

        self.base
            .fill_input(RegisterUi::FirstName.css(), &user.first_name)
            .await?;
        self.base
            .fill_input(RegisterUi::LastName.css(), &user.last_name)
            .await?;
        self.base
            .fill_input(RegisterUi::Email.css(), &user.email)
            .await?;
        self.base
            .fill_input(RegisterUi::Password.css(), &user.password)
            .await?;
        self.base
            .fill_input(RegisterUi::ConfirmPassword.css(), &user.password)
            .await?;

        self.base
            .click_element(RegisterUi::RegisterButton.css())
            .await?;
        self.base.wait_for_page_load().await
    }

    pub async fn is_registration_successful(&self) -> Result<bool, StorefrontError> {
        if !self
            .base
            .appears_within(RegisterUi::Result.css(), SHORT_ELEMENT_TIMEOUT)
            .await?
        {
            return Ok(false);
        }

        Ok(self
            .get_result_message()
            .await?
            .is_some_and(|message| message.to_lowercase().contains(REGISTRATION_COMPLETED)))
    }

    pub async fn get_result_message(&self) -> Result<Option<String>, StorefrontError> {
        self.base.get_text(RegisterUi::Result.css()).await
    }

    pub async fn click_continue(&self) -> Result<(), StorefrontError> {
        self.base
            .click_element(RegisterUi::ContinueButton.css())
            .await?;
        self.base.wait_for_page_load().await
    }

    pub async fn get_validation_error(&self) -> Result<Option<String>, StorefrontError> {
        if !self
            .base
            .appears_within(RegisterUi::ValidationError.css(), VALIDATION_TIMEOUT)
            .await?
        {
            return Ok(None);
        }

        self.base.get_text(RegisterUi::ValidationError.css()).await
    }
}
