//! Auth and account lifecycle service
//!
//! Email-verified invite signup, bcrypt password storage, JWT sign-in.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

use crate::config::AuthConfig;
use crate::entity::company::DEFAULT_COMPANY_NAME;
use crate::entity::{company, invite, user};
use crate::error::{AppError, AppResult, OptionExt};
use crate::middleware::auth::encode_token;
use crate::middleware::CurrentUser;

fn generate_invite_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Result of the account availability check
#[derive(Debug)]
pub struct AccountCheck {
    pub email: String,
    pub invite_token: String,
}

/// Issued access token
#[derive(Debug)]
pub struct TokenInfo {
    pub access_token: String,
    pub token_type: &'static str,
}

pub struct AuthService {
    db: DatabaseConnection,
    auth: AuthConfig,
}

impl AuthService {
    pub fn new(db: DatabaseConnection, auth: AuthConfig) -> Self {
        Self { db, auth }
    }

    fn hash_password(&self, password: &str) -> AppResult<String> {
        bcrypt::hash(password, self.auth.bcrypt_cost)
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    async fn find_invite_by_email(&self, email: &str) -> AppResult<Option<invite::Model>> {
        Ok(invite::Entity::find()
            .filter(invite::Column::Email.eq(email))
            .one(&self.db)
            .await?)
    }

    /// Idempotent lookup-or-create of the shared "Default Company" row.
    /// The unique name constraint resolves the create race: the loser of a
    /// concurrent insert re-reads the winner's row.
    pub async fn get_or_create_default_company(&self) -> AppResult<i64> {
        if let Some(existing) = company::Entity::find()
            .filter(company::Column::Name.eq(DEFAULT_COMPANY_NAME))
            .one(&self.db)
            .await?
        {
            return Ok(existing.id);
        }

        let insert = company::Entity::insert(company::ActiveModel {
            name: Set(DEFAULT_COMPANY_NAME.to_string()),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(company::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec(&self.db)
        .await;

        match insert {
            Ok(res) => Ok(res.last_insert_id),
            Err(DbErr::RecordNotInserted) => {
                let existing = company::Entity::find()
                    .filter(company::Column::Name.eq(DEFAULT_COMPANY_NAME))
                    .one(&self.db)
                    .await?
                    .ok_or_else(|| {
                        AppError::InvalidState("default company vanished after conflict".into())
                    })?;
                Ok(existing.id)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Start signup: reject taken emails, issue (or refresh) an invite
    /// token parked under the default company.
    pub async fn check_account(&self, email: &str) -> AppResult<AccountCheck> {
        if self.find_user_by_email(email).await?.is_some() {
            return Err(AppError::Validation("Email already in use".into()));
        }

        let default_company_id = self.get_or_create_default_company().await?;

        let invite = self.find_invite_by_email(email).await?;
        let token = match invite {
            Some(inv) if !inv.is_verified => {
                let token = generate_invite_token();
                let mut active: invite::ActiveModel = inv.into();
                active.token = Set(token.clone());
                active.update(&self.db).await?;
                token
            }
            Some(inv) => inv.token,
            None => {
                let token = generate_invite_token();
                invite::ActiveModel {
                    email: Set(email.to_string()),
                    token: Set(token.clone()),
                    is_verified: Set(false),
                    company_id: Set(default_company_id),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?;
                token
            }
        };

        Ok(AccountCheck {
            email: email.to_string(),
            invite_token: token,
        })
    }

    /// Verify the emailed token.
    pub async fn sign_up(&self, email: &str, token: &str) -> AppResult<()> {
        let invite = self.find_invite_by_email(email).await?;
        let invite = match invite {
            Some(inv) if inv.token == token => inv,
            _ => {
                return Err(AppError::Validation(
                    "Invalid or missing verification code".into(),
                ))
            }
        };

        let mut active: invite::ActiveModel = invite.into();
        active.is_verified = Set(true);
        active.update(&self.db).await?;
        Ok(())
    }

    /// Finish signup: create the company and its first admin user.
    pub async fn sign_up_complete(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        company_name: &str,
        password: &str,
    ) -> AppResult<user::Model> {
        let invite = self.find_invite_by_email(email).await?;
        if !invite.map(|i| i.is_verified).unwrap_or(false) {
            return Err(AppError::Validation("Account not verified".into()));
        }

        let company_taken = company::Entity::find()
            .filter(company::Column::Name.eq(company_name))
            .one(&self.db)
            .await?
            .is_some();
        if company_taken {
            return Err(AppError::Conflict("Company name already in use".into()));
        }

        let hashed_password = self.hash_password(password)?;

        let txn = self.db.begin().await?;
        let new_company = company::ActiveModel {
            name: Set(company_name.to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let new_user = user::ActiveModel {
            email: Set(email.to_string()),
            hashed_password: Set(hashed_password),
            first_name: Set(first_name.to_string()),
            last_name: Set(last_name.to_string()),
            is_active: Set(true),
            is_admin: Set(true),
            company_id: Set(new_company.id),
            position_id: Set(None),
            department_id: Set(None),
            manager_id: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        tracing::info!(
            company_id = new_company.id,
            user_id = new_user.id,
            "company registered"
        );
        Ok(new_user)
    }

    /// Exchange credentials for a JWT.
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<TokenInfo> {
        let user = self
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| AppError::Validation("User with this email does not exist".into()))?;

        let valid = bcrypt::verify(password, &user.hashed_password).unwrap_or(false);
        if !valid {
            return Err(AppError::Validation("Incorrect password".into()));
        }
        if !user.is_active {
            return Err(AppError::PermissionDenied);
        }

        let access_token = encode_token(&user, &self.auth)?;
        Ok(TokenInfo {
            access_token,
            token_type: "Bearer",
        })
    }

    /// Admin invites an address into their company.
    pub async fn invite_employee(&self, caller: &CurrentUser, email: &str) -> AppResult<String> {
        if !caller.is_admin {
            return Err(AppError::PermissionDenied);
        }

        let token = generate_invite_token();
        match self.find_invite_by_email(email).await? {
            Some(inv) if inv.is_verified => {
                return Err(AppError::Validation("User already verified".into()))
            }
            Some(inv) => {
                let mut active: invite::ActiveModel = inv.into();
                active.token = Set(token.clone());
                active.update(&self.db).await?;
            }
            None => {
                invite::ActiveModel {
                    email: Set(email.to_string()),
                    token: Set(token.clone()),
                    is_verified: Set(false),
                    company_id: Set(caller.company_id),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?;
            }
        }
        Ok(token)
    }

    /// Admin creates an inactive employee record plus its invite. The
    /// account stays unusable until `confirm_invite` sets a password.
    pub async fn create_employee(
        &self,
        caller: &CurrentUser,
        email: &str,
        first_name: &str,
        last_name: &str,
        position_id: Option<i64>,
    ) -> AppResult<String> {
        if !caller.is_admin {
            return Err(AppError::PermissionDenied);
        }
        if self.find_user_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".into()));
        }
        if let Some(inv) = self.find_invite_by_email(email).await? {
            if inv.is_verified {
                return Err(AppError::Conflict("Invite already verified".into()));
            }
        }

        let token = generate_invite_token();
        // Placeholder hash; replaced when the invite is confirmed
        let temp_password = self.hash_password(&generate_invite_token())?;

        let txn = self.db.begin().await?;
        user::ActiveModel {
            email: Set(email.to_string()),
            hashed_password: Set(temp_password),
            first_name: Set(first_name.to_string()),
            last_name: Set(last_name.to_string()),
            is_active: Set(false),
            is_admin: Set(false),
            company_id: Set(caller.company_id),
            position_id: Set(position_id),
            department_id: Set(None),
            manager_id: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        match invite::Entity::find()
            .filter(invite::Column::Email.eq(email))
            .one(&txn)
            .await?
        {
            Some(inv) => {
                let mut active: invite::ActiveModel = inv.into();
                active.token = Set(token.clone());
                active.company_id = Set(caller.company_id);
                active.update(&txn).await?;
            }
            None => {
                invite::ActiveModel {
                    email: Set(email.to_string()),
                    token: Set(token.clone()),
                    is_verified: Set(false),
                    company_id: Set(caller.company_id),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
            }
        }
        txn.commit().await?;

        Ok(token)
    }

    /// Invited employee sets their password and activates the account.
    pub async fn confirm_invite(&self, email: &str, token: &str, password: &str) -> AppResult<()> {
        let invite = self
            .find_invite_by_email(email)
            .await?
            .ok_or_not_found("Invite not found")?;
        if invite.token != token {
            return Err(AppError::Validation("Invalid invite token".into()));
        }
        if invite.is_verified {
            return Err(AppError::Validation("Invite already used".into()));
        }

        let user = self
            .find_user_by_email(email)
            .await?
            .ok_or_not_found("User not found")?;

        let hashed_password = self.hash_password(password)?;

        let txn = self.db.begin().await?;
        let mut user_active: user::ActiveModel = user.into();
        user_active.hashed_password = Set(hashed_password);
        user_active.is_active = Set(true);
        user_active.update(&txn).await?;

        let mut invite_active: invite::ActiveModel = invite.into();
        invite_active.is_verified = Set(true);
        invite_active.update(&txn).await?;
        txn.commit().await?;

        Ok(())
    }

    /// Update profile fields; allowed for the user themselves or an admin.
    pub async fn update_user(
        &self,
        caller: &CurrentUser,
        user_id: i64,
        first_name: Option<String>,
        last_name: Option<String>,
        manager_id: Option<i64>,
    ) -> AppResult<user::Model> {
        if user_id != caller.id && !caller.is_admin {
            return Err(AppError::PermissionDenied);
        }
        let user = user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_not_found("User not found")?;
        if user.company_id != caller.company_id {
            return Err(AppError::NotFound("User not found".into()));
        }

        if first_name.is_none() && last_name.is_none() && manager_id.is_none() {
            return Err(AppError::BadRequest("No fields to update".into()));
        }

        let mut active: user::ActiveModel = user.into();
        if let Some(first_name) = first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = last_name {
            active.last_name = Set(last_name);
        }
        if let Some(manager_id) = manager_id {
            active.manager_id = Set(Some(manager_id));
        }
        Ok(active.update(&self.db).await?)
    }

    pub async fn update_email(
        &self,
        caller: &CurrentUser,
        user_id: i64,
        new_email: &str,
    ) -> AppResult<()> {
        if user_id != caller.id && !caller.is_admin {
            return Err(AppError::PermissionDenied);
        }
        if self.find_user_by_email(new_email).await?.is_some() {
            return Err(AppError::Conflict("Email already in use".into()));
        }
        let user = user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_not_found("User not found")?;
        if user.company_id != caller.company_id {
            return Err(AppError::NotFound("User not found".into()));
        }

        let mut active: user::ActiveModel = user.into();
        active.email = Set(new_email.to_string());
        active.update(&self.db).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_token_shape() {
        let a = generate_invite_token();
        let b = generate_invite_token();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
