use crate::modules::user::domain::{CreateUserRequest, EmailTaken, InvalidUser, User, UserNotFound};
use crate::modules::user::repository::UserRepository;
use replyon::exception::Thrown;

#[derive(Default)]
pub struct UserService {
    repository: UserRepository,
}

impl UserService {
    pub async fn create(&self, req: CreateUserRequest) -> Result<User, Thrown> {
        if req.name.trim().is_empty() {
            return Err(InvalidUser("name must not be empty".to_string()).into());
        }
        if self.repository.find_by_email(&req.email).await.is_some() {
            return Err(EmailTaken(req.email).into());
        }
        Ok(self.repository.insert(req.name, req.email).await)
    }

    pub async fn get(&self, id: u64) -> Result<User, Thrown> {
        self.repository
            .find_by_id(id)
            .await
            .ok_or_else(|| UserNotFound(id).into())
    }
}
