//! 登录 / 注册流程

use tracing::{error, info};

use crate::clients::{AuthClient, AuthSession, SignUpOutcome};
use crate::error::{ApiError, AppError};
use crate::models::Notice;

/// 注册表单
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

pub struct AuthFlow {
    auth: AuthClient,
    session: Option<AuthSession>,
}

impl AuthFlow {
    pub fn new(auth: AuthClient) -> Self {
        Self {
            auth,
            session: None,
        }
    }

    pub fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    pub async fn sign_up(&mut self, form: &SignUpForm) -> Notice {
        let result = self
            .auth
            .sign_up(&form.email, &form.password, &form.first_name, &form.last_name)
            .await;

        match result {
            Ok(SignUpOutcome::SignedIn(session)) => {
                self.session = Some(session);
                sign_up_succeeded()
            }
            Ok(SignUpOutcome::ConfirmationRequired(user)) => {
                info!("📧 等待邮箱验证: {}", user.id);
                sign_up_succeeded()
            }
            Err(e) => {
                error!("❌ 注册失败: {}", e);
                failure_notice("Sign Up Failed", &e)
            }
        }
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Notice {
        match self.auth.sign_in(email, password).await {
            Ok(session) => {
                self.session = Some(session);
                Notice::info("Welcome back!", "You've been signed in successfully.")
            }
            Err(e) => {
                error!("❌ 登录失败: {}", e);
                failure_notice("Sign In Failed", &e)
            }
        }
    }

    /// 退出登录；远端失败时本地会话照样清掉
    pub async fn sign_out(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = self.auth.sign_out(&session).await {
                error!("❌ 退出登录失败: {}", e);
            }
        }
    }
}

fn sign_up_succeeded() -> Notice {
    Notice::info(
        "Success!",
        "Account created successfully. Please check your email for verification.",
    )
}

const UNEXPECTED: &str = "An unexpected error occurred. Please try again.";

/// 后端拒绝请求时用 `title` 并原样展示后端消息；
/// 网络等意外错误统一用 "Error"
fn failure_notice(title: &str, err: &AppError) -> Notice {
    match err {
        AppError::Api(ApiError::BadResponse { message, .. }) => Notice::destructive(
            title,
            message.clone().unwrap_or_else(|| UNEXPECTED.to_string()),
        ),
        _ => Notice::destructive("Error", UNEXPECTED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_rejection_keeps_title_and_message() {
        let err = AppError::bad_response("auth/v1/token", 400, Some("Invalid login credentials".into()));
        let notice = failure_notice("Sign In Failed", &err);
        assert_eq!(notice.title, "Sign In Failed");
        assert_eq!(notice.description, "Invalid login credentials");
        assert!(notice.is_error());
    }

    #[test]
    fn unexpected_failure_uses_error_title() {
        let err = AppError::Other("socket closed".into());
        let notice = failure_notice("Sign Up Failed", &err);
        assert_eq!(notice.title, "Error");
        assert_eq!(notice.description, UNEXPECTED);
    }
}
