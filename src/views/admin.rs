//! Admin screens: user management and the costume list

use crate::error::{Alert, ClientError, ClientResult};
use crate::models::{Costume, CostumeId, User, UserId, UserPayload, UserRole};
use crate::session::Session;

use super::ViewStatus;

const UNAUTHORIZED_ADMIN: &str = "Unauthorized. Please login as admin.";

#[derive(Debug, Default)]
pub struct AdminUsersView {
    users: Vec<User>,
    pub status: ViewStatus,
}

impl AdminUsersView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn reload(&mut self, session: &Session) -> ClientResult<()> {
        self.status.begin();
        let result = match session.require_role(UserRole::Admin) {
            Ok(_) => session.client().list_users().await,
            Err(e) => Err(e),
        };
        let result = self.status.finish(result, "Failed to load users");
        if let Err(ClientError::Unauthorized(_)) = &result {
            self.status.alert = Some(Alert::error(UNAUTHORIZED_ADMIN));
        }
        self.users = result?;
        Ok(())
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub async fn delete(&mut self, session: &Session, id: UserId) -> ClientResult<()> {
        self.status.begin();
        let result = match session.require_role(UserRole::Admin) {
            Ok(_) => session.client().delete_user(id).await,
            Err(e) => Err(e),
        };
        self.status.finish(result, "Unable to delete")?;
        tracing::info!(user_id = id, "User deleted");
        self.reload(session).await
    }
}

/// Create/edit form for a user account
#[derive(Debug, Clone)]
pub struct UserForm {
    editing: Option<UserId>,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub status: ViewStatus,
}

impl Default for UserForm {
    fn default() -> Self {
        Self {
            editing: None,
            name: String::new(),
            email: String::new(),
            password: String::new(),
            role: UserRole::Seller,
            status: ViewStatus::default(),
        }
    }
}

impl UserForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill from an existing account; the password starts empty
    pub fn edit(user: &User) -> Self {
        Self {
            editing: Some(user.id),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            ..Self::default()
        }
    }

    pub fn editing(&self) -> Option<UserId> {
        self.editing
    }

    /// Request body. Name and email are always required, a password only
    /// when creating; a blank password on update keeps the current one.
    pub fn payload(&self) -> ClientResult<UserPayload> {
        let name = self.name.trim();
        let email = self.email.trim();
        let password_missing = self.password.is_empty();
        if name.is_empty() || email.is_empty() || (self.editing.is_none() && password_missing) {
            return Err(ClientError::Validation("Please fill required fields".to_string()));
        }
        Ok(UserPayload {
            name: name.to_string(),
            email: email.to_string(),
            password: (!password_missing).then(|| self.password.clone()),
            role: self.role,
        })
    }

    pub async fn submit(&mut self, session: &Session) -> ClientResult<User> {
        let payload = match self.payload() {
            Ok(payload) => payload,
            Err(e) => {
                self.status.alert = Some(e.alert("Please fill required fields"));
                return Err(e);
            }
        };

        self.status.begin();
        let result = match session.require_role(UserRole::Admin) {
            Ok(_) => {
                let api = session.client();
                match self.editing {
                    Some(id) => api.update_user(id, &payload).await,
                    None => api.create_user(&payload).await,
                }
            }
            Err(e) => Err(e),
        };
        let saved = self.status.finish(result, "Unable to save")?;
        tracing::info!(
            user_id = saved.id,
            role = %saved.role,
            updated = self.editing.is_some(),
            "User saved"
        );
        self.editing = Some(saved.id);
        self.password.clear();
        Ok(saved)
    }
}

/// Every costume in the catalogue, with admin delete
#[derive(Debug, Default)]
pub struct AdminCostumesView {
    costumes: Vec<Costume>,
    pub status: ViewStatus,
}

impl AdminCostumesView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn reload(&mut self, session: &Session) -> ClientResult<()> {
        self.status.begin();
        let result = match session.require_role(UserRole::Admin) {
            Ok(_) => session.client().list_costumes().await,
            Err(e) => Err(e),
        };
        self.costumes = self.status.finish(result, "Failed to load costumes")?;
        Ok(())
    }

    pub fn costumes(&self) -> &[Costume] {
        &self.costumes
    }

    pub async fn delete(&mut self, session: &Session, id: CostumeId) -> ClientResult<()> {
        self.status.begin();
        let result = match session.require_role(UserRole::Admin) {
            Ok(_) => session.client().delete_costume(id).await,
            Err(e) => Err(e),
        };
        self.status.finish(result, "Unable to delete")?;
        tracing::info!(costume_id = id, "Costume deleted by admin");
        self.reload(session).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> User {
        User {
            id: 7,
            name: "Vera".to_string(),
            email: "vera@example.com".to_string(),
            role: UserRole::Admin,
        }
    }

    #[test]
    fn test_new_form_defaults_to_seller() {
        assert_eq!(UserForm::new().role, UserRole::Seller);
    }

    #[test]
    fn test_create_requires_password() {
        let form = UserForm {
            name: "Ned".to_string(),
            email: "ned@example.com".to_string(),
            ..UserForm::default()
        };
        match form.payload() {
            Err(ClientError::Validation(msg)) => assert_eq!(msg, "Please fill required fields"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_update_omits_blank_password() {
        let form = UserForm::edit(&existing());
        let payload = form.payload().unwrap();
        assert_eq!(payload.password, None);
        assert_eq!(payload.role, UserRole::Admin);

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "admin");
    }

    #[test]
    fn test_update_sends_new_password() {
        let mut form = UserForm::edit(&existing());
        form.password = "s3cret".to_string();
        assert_eq!(form.payload().unwrap().password.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_edit_requires_email() {
        let mut form = UserForm::edit(&existing());
        form.email = "  ".to_string();
        assert!(form.payload().is_err());
    }
}
